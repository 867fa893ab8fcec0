use thiserror::Error;

/// A source unit that could not be parsed. Fatal for that unit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to parse {path}:{line}: {message}")]
pub struct ParseError {
    /// Path (or display name) of the unit.
    pub path: String,
    /// 1-based line of the first error.
    pub line: usize,
    pub message: String,
}
