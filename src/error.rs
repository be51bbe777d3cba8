use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum DrushError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Missing required attribute: {0}")]
    MissingAttribute(&'static str),
    #[error("Exec error: {0}")]
    ExecError(String),
    #[error("Drush exited with code: {code}")]
    Halted { code: i32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DrushError {
    /// Exit code carried by a halted invocation, if any.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            DrushError::Halted { code } => Some(*code),
            _ => None,
        }
    }
}
