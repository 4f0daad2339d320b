//! Authentication utilities library
//!
//! Provides the credential and session primitives used by the user service:
//! - Salted password hashing (Argon2id over password + per-user salt)
//! - Stateless session tokens (HS256 JWT with user id, username, role and expiry)
//! - Authentication coordination
//!
//! Storage is not part of this crate. The service defines its own ports and
//! feeds stored hashes and salts in.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let salt = hasher.generate_salt().unwrap();
//! let hash = hasher.hash_password("my_password", &salt).unwrap();
//! assert!(hasher.verify_password(&hash, "my_password", &salt).is_ok());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{Identity, TokenService};
//! use chrono::Duration;
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24)).unwrap();
//! let token = tokens.issue(&Identity::new("user123", "alice", "client")).unwrap();
//! let claims = tokens.validate(&token).unwrap();
//! assert_eq!(claims.username, "alice");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Identity, PasswordHasher, TokenService};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(
//!     PasswordHasher::new(),
//!     TokenService::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24)).unwrap(),
//! );
//!
//! // Register: derive salt and hash
//! let credentials = auth.hash_credentials("password123").unwrap();
//!
//! // Login: verify and issue a token
//! auth.verify_password("password123", &credentials.password_hash, &credentials.salt).unwrap();
//! let token = auth.issue_token(&Identity::new("user123", "alice", "client")).unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&token).unwrap();
//! assert_eq!(claims.user_id, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::HashedCredentials;
pub use jwt::Identity;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SessionClaims;
pub use jwt::TokenService;
pub use password::PasswordError;
pub use password::PasswordHasher;
