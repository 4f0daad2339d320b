use async_trait::async_trait;
use auth::Identity;
use auth::SessionClaims;

use crate::domain::auth::errors::AuthError;
use crate::domain::user::models::User;

/// Port for credential verification and session tokens.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify a username/password pair.
    ///
    /// # Returns
    /// The stored user the credentials belong to
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this username
    /// * `BadPassword` - Password does not match
    /// * `CorruptCredentials` - Stored hash or salt cannot be used
    /// * `StorageUnavailable` - Lookup failed
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Issue a signed session token for an identity.
    ///
    /// # Errors
    /// * `TokenIssuance` - Token encoding failed
    fn issue_token(&self, identity: &Identity) -> Result<String, AuthError>;

    /// Validate a session token and return its claims.
    ///
    /// # Errors
    /// * `TokenMalformed` - Token cannot be parsed
    /// * `TokenSignatureInvalid` - Signature does not match
    /// * `TokenExpired` - Token is past its expiry
    fn validate_token(&self, token: &str) -> Result<SessionClaims, AuthError>;
}
