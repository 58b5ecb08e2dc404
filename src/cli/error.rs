//! CLI-level errors (wraps tree errors)

use std::io;

use thiserror::Error;

use crate::errors::TreeError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                crate::exitcode::NOINPUT
            }
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Tree(e) => match e {
                TreeError::InvalidPath(_) | TreeError::IndexOutOfRange { .. } => {
                    crate::exitcode::USAGE
                }
                TreeError::Outline { .. } | TreeError::InvalidPayload(_) => {
                    crate::exitcode::DATAERR
                }
                TreeError::TypeMismatch { .. } | TreeError::MissingOperation(_) => {
                    crate::exitcode::SOFTWARE
                }
            },
        }
    }
}
