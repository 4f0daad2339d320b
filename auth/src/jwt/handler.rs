use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Minimum accepted length of the HS256 signing secret, in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

/// JWT token handler for encoding and decoding tokens.
///
/// Generic over the claims type. Uses HS256 (HMAC with SHA-256). Expiry is
/// checked against the local clock with no leeway.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens, at least `MIN_SECRET_LENGTH` bytes
    ///
    /// # Errors
    /// * `InvalidSecret` - Secret is shorter than `MIN_SECRET_LENGTH`
    ///
    /// # Security Notes
    /// - Store secrets in environment variables or secure vaults, never in code
    /// - Rotating the secret invalidates every issued token
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(JwtError::InvalidSecret(format!(
                "secret must be at least {} bytes, got {}",
                MIN_SECRET_LENGTH,
                secret.len()
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        })
    }

    /// Encode claims into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// The signature is verified before the claims are looked at; the `exp`
    /// claim is required.
    ///
    /// # Errors
    /// * `Malformed` - Token structure, encoding or claims are invalid
    /// * `SignatureInvalid` - Signature does not match the payload
    /// * `Expired` - `exp` is in the past
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        decode::<T>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(map_jwt_error)
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> JwtError {
    match err.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidSignature => JwtError::SignatureInvalid,
        ErrorKind::InvalidToken => JwtError::Malformed("Malformed token".to_string()),
        ErrorKind::Base64(_) => JwtError::Malformed("Invalid base64 encoding".to_string()),
        ErrorKind::Json(_) => JwtError::Malformed("Invalid JSON in claims".to_string()),
        ErrorKind::Utf8(_) => JwtError::Malformed("Invalid UTF-8 in token".to_string()),
        ErrorKind::MissingRequiredClaim(claim) => {
            JwtError::Malformed(format!("Missing required claim: {}", claim))
        }
        ErrorKind::InvalidAlgorithm => JwtError::Malformed("Unexpected algorithm".to_string()),
        _ => JwtError::Malformed(err.to_string()),
    }
}
