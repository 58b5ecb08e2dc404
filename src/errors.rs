use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("child index {index} out of range for node with {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("type mismatch: expected {expected}")]
    TypeMismatch { expected: &'static str },

    #[error("missing operation: {0} has nothing to apply")]
    MissingOperation(&'static str),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid outline at line {line}: {reason}")]
    Outline { line: usize, reason: String },

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

pub type TreeResult<T> = Result<T, TreeError>;
