use auth::AuthenticationError;
use auth::JwtError;
use thiserror::Error;

/// Error for authentication and session token operations.
///
/// Variants keep the internal cause for logging. The HTTP layer collapses all
/// of them into a single unauthorized response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Password does not match")]
    BadPassword,

    #[error("Stored credentials are unusable: {0}")]
    CorruptCredentials(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Token is malformed: {0}")]
    TokenMalformed(String),

    #[error("Token signature is invalid")]
    TokenSignatureInvalid,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),
}

impl AuthError {
    /// True for every failure that rejects a username/password pair.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            AuthError::UserNotFound(_)
                | AuthError::BadPassword
                | AuthError::CorruptCredentials(_)
                | AuthError::StorageUnavailable(_)
        )
    }

    /// True for every failure that rejects a presented token.
    pub fn is_token_failure(&self) -> bool {
        matches!(
            self,
            AuthError::TokenMalformed(_) | AuthError::TokenSignatureInvalid | AuthError::TokenExpired
        )
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Malformed(msg) => AuthError::TokenMalformed(msg),
            JwtError::SignatureInvalid => AuthError::TokenSignatureInvalid,
            JwtError::Expired => AuthError::TokenExpired,
            JwtError::EncodingFailed(msg) | JwtError::InvalidSecret(msg) => {
                AuthError::TokenIssuance(msg)
            }
        }
    }
}

impl From<AuthenticationError> for AuthError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => AuthError::BadPassword,
            AuthenticationError::PasswordError(e) => AuthError::CorruptCredentials(e.to_string()),
            AuthenticationError::JwtError(e) => AuthError::from(e),
        }
    }
}
