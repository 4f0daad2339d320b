use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::claims::Identity;
use super::claims::SessionClaims;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// Issues and validates stateless session tokens.
///
/// Holds only the signing secret and the token lifetime. A token is valid
/// while its signature matches and `exp` has not passed; nothing is stored
/// server side.
pub struct TokenService {
    handler: JwtHandler,
    ttl: Duration,
}

impl TokenService {
    pub const DEFAULT_TTL_HOURS: i64 = 24;

    /// Create a token service.
    ///
    /// # Arguments
    /// * `secret` - Process-wide signing secret
    /// * `ttl` - Lifetime of issued tokens
    ///
    /// # Errors
    /// * `InvalidSecret` - Secret is too short
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, JwtError> {
        Ok(Self {
            handler: JwtHandler::new(secret)?,
            ttl,
        })
    }

    /// Issue a token for an identity, expiring `ttl` from now.
    pub fn issue(&self, identity: &Identity) -> Result<String, JwtError> {
        let claims = SessionClaims::for_identity(identity, Utc::now(), self.ttl);
        self.handler.encode(&claims)
    }

    /// Issue a token with an explicit absolute expiry.
    pub fn issue_expiring_at(
        &self,
        identity: &Identity,
        expires_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = SessionClaims::expiring_at(identity, Utc::now(), expires_at);
        self.handler.encode(&claims)
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be parsed
    /// * `SignatureInvalid` - Signed with another secret or tampered with
    /// * `Expired` - Validated after `exp`
    pub fn validate(&self, token: &str) -> Result<SessionClaims, JwtError> {
        self.handler.decode(token)
    }
}
