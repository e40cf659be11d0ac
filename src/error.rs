use slot_buffer::SlotError;
use thiserror::Error;

pub type ArrayResult<T> = Result<T, ArrayError>;

/// Errors raised by [`StringArray`](crate::array::StringArray) operations.
///
/// Whenever one of these is returned the array is exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    #[error("index out of range: {index} (count {count})")]
    IndexOutOfRange { index: isize, count: usize },

    #[error("invalid capacity: {requested} (must be at least 1)")]
    InvalidCapacity { requested: isize },

    #[error("storage error: {0}")]
    Storage(#[from] SlotError),
}

/// Errors that abort a script run.
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("parse error at line {line}, column {column}: expected {expected}")]
    Parse {
        line: usize,
        column: usize,
        expected: String,
    },

    #[error("no array named `{0}`")]
    UnknownArray(String),

    #[error("an array named `{0}` already exists")]
    DuplicateArray(String),

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}
