use thiserror::Error;

/// A runtime diagnostic. Every failure the evaluator can produce is a single
/// human-readable line keyed to the source line of the offending node, and
/// any failure aborts the whole program: errors bubble straight up to the
/// driver, which reports the diagnostic as the program's only output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Line {line}: {message}")]
pub struct RuntimeError {
    pub line: u32,
    pub message: String,
}

impl RuntimeError {
    pub fn new(line: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Shorthand for the `return Err(...)` sites that pepper the evaluator.
pub fn fail<T>(line: u32, message: impl Into<String>) -> Result<T> {
    Err(RuntimeError::new(line, message))
}
