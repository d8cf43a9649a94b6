//! Error types for rule violations

/// Error types for game operations
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReversiError {
    /// The request itself is malformed: no backing cell, an empty color,
    /// a color moving out of turn, or bad construction parameters.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The request is well-formed but the current position forbids it.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl ReversiError {
    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        ReversiError::InvalidArgument(msg.into())
    }

    pub(crate) fn state(msg: impl Into<String>) -> Self {
        ReversiError::InvalidState(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ReversiError>;
