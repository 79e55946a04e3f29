pub mod cli;
pub mod config;
pub mod db;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;

pub use error::{ImportError, Result};
