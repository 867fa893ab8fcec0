use std::path::PathBuf;

use ce_parser::ParseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransformError>;

/// Failure to transform one unit. No partial output is produced.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to emit code")]
    Emit(#[source] std::io::Error),

    #[error("emitted code is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("failed to serialize source map: {0}")]
    SourceMap(String),
}
