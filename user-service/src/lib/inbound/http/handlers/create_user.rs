use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::RoleError;
use crate::user::errors::UsernameError;

/// Public registration.
///
/// Admin accounts cannot be self-registered.
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let command = body.try_into_command()?;

    if command.role.is_admin() {
        tracing::warn!(username = %command.username, "Registration with admin role refused");
        return Err(ApiError::Forbidden(
            "Admin accounts cannot be self-registered".to_string(),
        ));
    }

    state
        .user_service
        .create_user(command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for creating a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    username: String,
    email: String,
    password: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    role: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateUserRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),

    #[error("Password must not be empty")]
    EmptyPassword,
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ParseCreateUserRequestError> {
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        if self.password.is_empty() {
            return Err(ParseCreateUserRequestError::EmptyPassword);
        }
        let role = self.role.map(Role::new).transpose()?.unwrap_or_default();

        Ok(CreateUserCommand::new(username, email, self.password)
            .with_names(self.first_name, self.last_name)
            .with_role(role))
    }
}

impl From<ParseCreateUserRequestError> for ApiError {
    fn from(err: ParseCreateUserRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(role: Option<&str>, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: "johndoe".to_string(),
            email: "john.doe@example.com".to_string(),
            password: password.to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn test_role_defaults_to_client() {
        let command = request(None, "sec123").try_into_command().unwrap();
        assert_eq!(command.role, Role::default());
        assert_eq!(command.first_name, "John");
    }

    #[test]
    fn test_custom_role_is_kept() {
        let command = request(Some("trainer"), "sec123").try_into_command().unwrap();
        assert_eq!(command.role.as_str(), "trainer");
    }

    #[test]
    fn test_invalid_fields_rejected() {
        assert!(matches!(
            request(Some("Not A Role"), "sec123").try_into_command(),
            Err(ParseCreateUserRequestError::Role(_))
        ));
        assert!(matches!(
            request(None, "").try_into_command(),
            Err(ParseCreateUserRequestError::EmptyPassword)
        ));
    }
}
