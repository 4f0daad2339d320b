use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Identity;
use auth::SessionClaims;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::user::ports::UserRepository;

/// Verifies credentials against stored users and manages session tokens.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    fn reject_unknown_user(&self, username: &str, password: &str) -> AuthError {
        // Same hashing cost as a real verification
        self.authenticator.verify_against_decoy(password);
        AuthError::UserNotFound(username.to_string())
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let Ok(parsed_username) = Username::new(username.to_string()) else {
            return Err(self.reject_unknown_user(username, password));
        };

        let user = match self.repository.find_by_username(&parsed_username).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(self.reject_unknown_user(username, password)),
            Err(e) => {
                tracing::error!(error = %e, "User lookup failed during authentication");
                return Err(AuthError::StorageUnavailable(e.to_string()));
            }
        };

        self.authenticator
            .verify_password(password, &user.password_hash, &user.salt)
            .map_err(|e| {
                let err = AuthError::from(e);
                if let AuthError::CorruptCredentials(reason) = &err {
                    tracing::error!(user_id = %user.id, reason = %reason, "Stored credentials are unusable");
                }
                err
            })?;

        tracing::info!(user_id = %user.id, "User authenticated");

        Ok(user)
    }

    fn issue_token(&self, identity: &Identity) -> Result<String, AuthError> {
        self.authenticator
            .issue_token(identity)
            .map_err(AuthError::from)
    }

    fn validate_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.authenticator
            .validate_token(token)
            .map_err(AuthError::from)
    }
}
