use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity of an authenticated user, as carried inside a session token.
///
/// `role` is an opaque label: it is copied from the credential record into
/// the token and back without interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub username: String,
    pub role: String,
}

impl Identity {
    pub fn new(user_id: impl ToString, username: impl ToString, role: impl ToString) -> Self {
        Self {
            user_id: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
        }
    }
}

/// Session token payload.
///
/// Serialized as `{"user_id", "username", "role", "iat", "exp"}` with
/// timestamps in Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: String,
    pub username: String,
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Create claims for an identity, expiring `ttl` after `issued_at`.
    pub fn for_identity(identity: &Identity, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self::expiring_at(identity, issued_at, issued_at + ttl)
    }

    /// Create claims with an explicit absolute expiry.
    pub fn expiring_at(
        identity: &Identity,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: identity.user_id.clone(),
            username: identity.username.clone(),
            role: identity.role.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Identity carried by these claims.
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            role: self.role.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity::new("user123", "alice", "client")
    }

    #[test]
    fn test_for_identity() {
        let now = Utc::now();
        let claims = SessionClaims::for_identity(&identity(), now, Duration::hours(24));

        assert_eq!(claims.user_id, "user123");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "client");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert_eq!(claims.identity(), identity());
    }

    #[test]
    fn test_wire_field_names() {
        let claims = SessionClaims::expiring_at(
            &identity(),
            DateTime::from_timestamp(1_000, 0).unwrap(),
            DateTime::from_timestamp(2_000, 0).unwrap(),
        );

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["user_id"], "user123");
        assert_eq!(json["username"], "alice");
        assert_eq!(json["role"], "client");
        assert_eq!(json["iat"], 1_000);
        assert_eq!(json["exp"], 2_000);
    }
}
