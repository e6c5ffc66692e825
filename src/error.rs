use std::path::PathBuf;
use std::result;

use thiserror::Error;

use crate::Row;

/// An error found somewhere in the capture chain.
///
/// Structural problems (a missing file, missing columns) abort the run. Data
/// quality problems such as bad dates or repeated keys never show up here,
/// they are only counted.
#[derive(Debug, Error)]
pub enum Error {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{stage}: missing required columns [{}]", .missing.join(", "))]
    Schema {
        stage: &'static str,
        missing: Vec<String>,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn missing_column(stage: &'static str, column: &str) -> Error {
        Error::Schema {
            stage,
            missing: vec![column.to_string()],
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

/// The type that actually flows the transformation chain. Either a row or an
/// error.
pub type RowResult = result::Result<Row, Error>;
