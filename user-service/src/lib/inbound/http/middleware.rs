use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Extension type to store the authenticated caller in request extensions.
///
/// Built from the stored user record, so the role reflects the current
/// record rather than the one captured at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: Username,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Whether the caller may modify or delete the given user.
    pub fn can_manage(&self, target: &UserId) -> bool {
        self.user_id == *target || self.role.is_admin()
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Middleware that validates session tokens and resolves the caller.
///
/// Any token problem, or a token whose user no longer exists, yields the
/// same 401. A storage failure while resolving the user yields 500.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?.to_owned();

    let claims = state.auth_service.validate_token(&token)?;

    let username = Username::new(claims.username.clone()).map_err(|e| {
        tracing::warn!(reason = %e, "Token carries an invalid username");
        ApiError::unauthorized()
    })?;

    let user = state
        .user_service
        .get_user_by_username(&username)
        .await
        .map_err(|e| match e {
            UserError::NotFoundByUsername(_) => {
                tracing::warn!(username = %username, "Token refers to a user that no longer exists");
                ApiError::unauthorized()
            }
            other => {
                tracing::error!(error = %other, "User lookup failed during session check");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        })?;

    if user.id.to_string() != claims.user_id {
        tracing::warn!(username = %username, "Token user id does not match stored user");
        return Err(ApiError::unauthorized());
    }

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        role: user.role,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            tracing::warn!(reason = "missing authorization header", "Session token rejected");
            ApiError::unauthorized()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        tracing::warn!(reason = "non-ascii authorization header", "Session token rejected");
        ApiError::unauthorized()
    })?;

    // Auth scheme names are case-insensitive
    auth_str
        .split_once(' ')
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            tracing::warn!(reason = "expected bearer scheme", "Session token rejected");
            ApiError::unauthorized()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: UserId::new(),
            username: Username::new("johndoe".to_string()).unwrap(),
            role,
        }
    }

    #[test]
    fn test_can_manage_self() {
        let user = caller(Role::default());
        assert!(user.can_manage(&user.user_id));
        assert!(!user.can_manage(&UserId::new()));
    }

    #[test]
    fn test_admin_can_manage_anyone() {
        let admin = caller(Role::admin());
        assert!(admin.can_manage(&UserId::new()));
        assert!(admin.is_admin());
    }

    #[test]
    fn test_extract_token() {
        let req = Request::builder()
            .header(http::header::AUTHORIZATION, "Bearer abc.def.ghi")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(extract_token_from_header(&req), Ok("abc.def.ghi"));

        for header in ["bearer abc.def.ghi", "BEARER abc.def.ghi"] {
            let req = Request::builder()
                .header(http::header::AUTHORIZATION, header)
                .body(axum::body::Body::empty())
                .unwrap();
            assert_eq!(extract_token_from_header(&req), Ok("abc.def.ghi"));
        }

        let req = Request::builder()
            .header(http::header::AUTHORIZATION, "Bearerabc.def.ghi")
            .body(axum::body::Body::empty())
            .unwrap();
        assert!(extract_token_from_header(&req).is_err());

        let req = Request::builder()
            .header(http::header::AUTHORIZATION, "Basic am9objpzZWMxMjM=")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(
            extract_token_from_header(&req),
            Err(ApiError::unauthorized())
        );

        let req = Request::builder()
            .header(http::header::AUTHORIZATION, "Bearer ")
            .body(axum::body::Body::empty())
            .unwrap();
        assert!(extract_token_from_header(&req).is_err());

        let req = Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();
        assert!(extract_token_from_header(&req).is_err());
    }
}
