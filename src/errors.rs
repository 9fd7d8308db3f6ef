use thiserror::Error;

// Errors raised by the name-based accessors and the runner. The typed
// get/set/reset surface never fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    // A stored entry exists under `key` but holds a different value type
    #[error("type mismatch for key `{key}`: expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
    },

    // Bad input handed to the runner
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

// Type alias for results that use `ContextError` as the error type
pub type Result<T> = std::result::Result<T, ContextError>;
