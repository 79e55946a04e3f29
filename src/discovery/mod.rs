pub mod locator;

pub use locator::{LocatedRun, RunListing, RunLocator};
