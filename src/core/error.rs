use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Construction failed: {0}")]
    ConstructionFailed(String),

    #[error("Index {0} out of bounds for list of length {1}")]
    IndexOutOfBounds(usize, usize),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

pub type Result<T> = std::result::Result<T, PersistError>;

impl<T> From<std::sync::PoisonError<T>> for PersistError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl PersistError {
    /// Returns `true` for errors raised while a mapping is being loaded.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigurationError(_))
    }

    /// Returns `true` if a collection of the wrong type was handed to the mapping.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch(_))
    }
}
