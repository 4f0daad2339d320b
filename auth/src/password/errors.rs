use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Random source failure: {0}")]
    RandomSourceFailure(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format: {0}")]
    InvalidHashFormat(String),

    #[error("Invalid salt: {0}")]
    InvalidSalt(String),

    #[error("Password does not match")]
    Mismatch,
}
