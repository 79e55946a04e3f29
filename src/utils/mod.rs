pub mod constants;
pub mod progress;
pub mod time;

pub use constants::*;
pub use progress::ProgressReporter;
pub use time::{mjd_to_utc, parse_reference, truncate_to_hour, truncate_to_minute, utc_to_mjd};
