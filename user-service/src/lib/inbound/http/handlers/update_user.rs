use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// HTTP request body for updating a user (raw JSON)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, ApiError> {
        // Validation happens here - errors are converted via UserError's #[from]
        let username = self
            .username
            .map(Username::new)
            .transpose()
            .map_err(UserError::from)?;
        let email = self
            .email
            .map(EmailAddress::new)
            .transpose()
            .map_err(UserError::from)?;
        let role = self
            .role
            .map(Role::new)
            .transpose()
            .map_err(UserError::from)?;

        if self.password.as_deref() == Some("") {
            return Err(ApiError::UnprocessableEntity(
                "Password must not be empty".to_string(),
            ));
        }

        Ok(UpdateUserCommand {
            username,
            email,
            first_name: self.first_name,
            last_name: self.last_name,
            role,
            password: self.password,
        })
    }
}

/// HTTP request body for replacing a user's profile (raw JSON)
///
/// Profile fields are required. Role and password are left untouched when
/// omitted.
#[derive(Debug, Deserialize)]
pub struct ReplaceUserRequest {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>,
    pub password: Option<String>,
}

impl From<ReplaceUserRequest> for UpdateUserRequest {
    fn from(req: ReplaceUserRequest) -> Self {
        Self {
            username: Some(req.username),
            email: Some(req.email),
            first_name: Some(req.first_name),
            last_name: Some(req.last_name),
            role: req.role,
            password: req.password,
        }
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    apply_update(&state, &caller, &id, req).await
}

pub async fn replace_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(req): Json<ReplaceUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    apply_update(&state, &caller, &id, req.into()).await
}

async fn apply_update(
    state: &AppState,
    caller: &AuthenticatedUser,
    id: &str,
    req: UpdateUserRequest,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id = UserId::from_string(id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if !caller.can_manage(&user_id) {
        tracing::warn!(caller = %caller.user_id, target = %user_id, "Update refused");
        return Err(ApiError::Forbidden(
            "Not allowed to modify this user".to_string(),
        ));
    }

    let command = req.try_into_command()?;

    if command.role.is_some() && !caller.is_admin() {
        tracing::warn!(caller = %caller.user_id, "Role change refused");
        return Err(ApiError::Forbidden(
            "Only admins may change roles".to_string(),
        ));
    }

    state
        .user_service
        .update_user(&user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
