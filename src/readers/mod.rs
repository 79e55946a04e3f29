use std::path::Path;

use crate::error::ImportError;

pub mod atmosphere;
pub mod wind;

pub use atmosphere::{AtmosphereProfile, AtmosphereReader};
pub use wind::{WindObservation, WindReader};

pub(crate) fn parse_error(path: &Path, line: usize, message: String) -> ImportError {
    ImportError::Parse {
        path: path.display().to_string(),
        line,
        message,
    }
}
