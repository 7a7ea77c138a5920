//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),

    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::Application(e.into())
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Io(_) => exitcode::IOERR,
            CliError::Application(e) => match e {
                ApplicationError::Domain(d) => match d {
                    DomainError::InvalidInput(_) => exitcode::USAGE,
                    DomainError::ParentNotFound(_) | DomainError::NodeNotFound(_) => {
                        exitcode::NOINPUT
                    }
                    DomainError::DuplicateName { .. }
                    | DomainError::CycleDetected { .. }
                    | DomainError::CannotDeleteRoot(_)
                    | DomainError::HasChildren(_) => exitcode::DATAERR,
                    DomainError::StaleNode(_) | DomainError::InvalidSeed(_) => {
                        exitcode::SOFTWARE
                    }
                },
                ApplicationError::EditModeDisabled(_) => exitcode::NOPERM,
                ApplicationError::Config { .. } => exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => exitcode::IOERR,
            },
        }
    }
}
