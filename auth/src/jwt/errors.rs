use thiserror::Error;

/// Error type for JWT operations.
///
/// Validation failures keep their cause (structure, signature, expiry) so
/// callers can log it; none of them should be shown to clients.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token is expired")]
    Expired,

    #[error("Invalid signing secret: {0}")]
    InvalidSecret(String),
}
