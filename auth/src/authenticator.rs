use crate::jwt::Identity;
use crate::jwt::JwtError;
use crate::jwt::SessionClaims;
use crate::jwt::TokenService;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::password::SALT_LENGTH;

/// Authentication coordinator combining salted password hashing and session tokens.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_service: TokenService,
}

/// Freshly derived credentials for storage.
///
/// Salt and hash are always produced together so a password change can be
/// written in one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedCredentials {
    pub password_hash: String,
    pub salt: String,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl From<PasswordError> for AuthenticationError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Mismatch => AuthenticationError::InvalidCredentials,
            other => AuthenticationError::PasswordError(other),
        }
    }
}

impl Authenticator {
    /// Create a new authenticator.
    pub fn new(password_hasher: PasswordHasher, token_service: TokenService) -> Self {
        Self {
            password_hasher,
            token_service,
        }
    }

    /// Generate a new salt and hash the password with it.
    ///
    /// # Errors
    /// * `RandomSourceFailure` - Salt generation failed
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_credentials(&self, password: &str) -> Result<HashedCredentials, PasswordError> {
        let salt = self.password_hasher.generate_salt()?;
        let password_hash = self.password_hasher.hash_password(password, &salt)?;

        Ok(HashedCredentials {
            password_hash,
            salt,
        })
    }

    /// Verify a password against stored credentials.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash or salt is unusable
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
        salt: &str,
    ) -> Result<(), AuthenticationError> {
        self.password_hasher
            .verify_password(stored_hash, password, salt)
            .map_err(AuthenticationError::from)
    }

    /// Spend the same hashing work as a verification without any stored
    /// credentials. Used when the user does not exist.
    pub fn verify_against_decoy(&self, password: &str) {
        let decoy_salt = "00".repeat(SALT_LENGTH);
        let _ = self.password_hasher.hash_password(password, &decoy_salt);
    }

    /// Issue a session token for an authenticated identity.
    pub fn issue_token(&self, identity: &Identity) -> Result<String, JwtError> {
        self.token_service.issue(identity)
    }

    /// Validate a session token.
    ///
    /// # Errors
    /// * `Malformed`, `SignatureInvalid`, `Expired` - see [`TokenService::validate`]
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, JwtError> {
        self.token_service.validate(token)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(
            PasswordHasher::with_params(8, 1, 1).unwrap(),
            TokenService::new(b"test_secret_key_at_least_32_bytes!", Duration::hours(24))
                .unwrap(),
        )
    }

    #[test]
    fn test_hash_credentials_and_verify() {
        let authenticator = authenticator();

        let credentials = authenticator
            .hash_credentials("sec123")
            .expect("Failed to hash credentials");

        assert_eq!(credentials.salt.len(), SALT_LENGTH * 2);
        assert_eq!(
            authenticator.verify_password(
                "sec123",
                &credentials.password_hash,
                &credentials.salt
            ),
            Ok(())
        );
    }

    #[test]
    fn test_verify_wrong_password() {
        let authenticator = authenticator();
        let credentials = authenticator.hash_credentials("sec123").unwrap();

        let result = authenticator.verify_password(
            "wrongpass",
            &credentials.password_hash,
            &credentials.salt,
        );
        assert_eq!(result, Err(AuthenticationError::InvalidCredentials));
    }

    #[test]
    fn test_hash_credentials_uses_fresh_salt() {
        let authenticator = authenticator();

        let first = authenticator.hash_credentials("sec123").unwrap();
        let second = authenticator.hash_credentials("sec123").unwrap();

        assert_ne!(first.salt, second.salt);
        assert_ne!(first.password_hash, second.password_hash);
    }

    #[test]
    fn test_verify_corrupt_hash() {
        let result = authenticator().verify_password("sec123", "garbage", &"00".repeat(32));
        assert!(matches!(
            result,
            Err(AuthenticationError::PasswordError(
                PasswordError::InvalidHashFormat(_)
            ))
        ));
    }

    #[test]
    fn test_issue_and_validate_token() {
        let authenticator = authenticator();
        let identity = Identity::new("user123", "johndoe", "client");

        let token = authenticator
            .issue_token(&identity)
            .expect("Failed to issue token");
        let claims = authenticator
            .validate_token(&token)
            .expect("Failed to validate token");

        assert_eq!(claims.identity(), identity);
    }

    #[test]
    fn test_validate_invalid_token() {
        let result = authenticator().validate_token("invalid.token.here");
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }
}
