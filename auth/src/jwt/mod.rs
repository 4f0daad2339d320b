pub mod claims;
pub mod errors;
pub mod handler;
pub mod service;

pub use claims::Identity;
pub use claims::SessionClaims;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use handler::MIN_SECRET_LENGTH;
pub use service::TokenService;
