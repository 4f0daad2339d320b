use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Number of random bytes in a per-user salt (hex-encoded to twice as many characters).
pub const SALT_LENGTH: usize = 32;

/// Salted password hashing.
///
/// Every user owns a random salt that is stored next to the hash. The hash is
/// computed with Argon2id over `password || salt`, using the salt bytes as the
/// Argon2 salt as well, so a given (password, salt, cost) triple always yields
/// the same PHC string.
///
/// The cost parameters are embedded in the PHC string, so changing them only
/// affects newly computed hashes.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a new password hasher with the Argon2 default cost
    /// (19 MiB memory, 2 iterations, 1 lane).
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Create a password hasher with a custom work factor.
    ///
    /// # Arguments
    /// * `memory_kib` - Memory cost in KiB
    /// * `iterations` - Number of passes
    /// * `parallelism` - Degree of parallelism
    ///
    /// # Errors
    /// * `HashingFailed` - Parameters are rejected by Argon2
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::HashingFailed(format!("Invalid parameters: {}", e)))?;

        Ok(Self { params })
    }

    /// Generate a fresh per-user salt.
    ///
    /// # Returns
    /// `SALT_LENGTH` bytes from the operating system CSPRNG, hex-encoded
    ///
    /// # Errors
    /// * `RandomSourceFailure` - The OS random source could not be read
    pub fn generate_salt(&self) -> Result<String, PasswordError> {
        let mut bytes = [0u8; SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| PasswordError::RandomSourceFailure(e.to_string()))?;

        Ok(hex::encode(bytes))
    }

    /// Hash a plaintext password with the given salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    /// * `salt` - Hex-encoded salt produced by [`PasswordHasher::generate_salt`]
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `InvalidSalt` - Salt is not a hex string of `SALT_LENGTH` bytes
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash_password(&self, password: &str, salt: &str) -> Result<String, PasswordError> {
        let salt_string = Self::argon2_salt(salt)?;

        self.argon2()
            .hash_password(Self::salted_input(password, salt).as_bytes(), &salt_string)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash and salt.
    ///
    /// The comparison of the recomputed digest is constant time.
    ///
    /// # Arguments
    /// * `stored_hash` - Stored password hash in PHC string format
    /// * `password` - Plaintext password to verify
    /// * `salt` - Hex-encoded salt stored with the hash
    ///
    /// # Errors
    /// * `Mismatch` - Password does not match
    /// * `InvalidHashFormat` - Stored hash is not a valid PHC string
    pub fn verify_password(
        &self,
        stored_hash: &str,
        password: &str,
        salt: &str,
    ) -> Result<(), PasswordError> {
        let parsed_hash = PasswordHash::new(stored_hash)
            .map_err(|e| PasswordError::InvalidHashFormat(e.to_string()))?;

        match self
            .argon2()
            .verify_password(Self::salted_input(password, salt).as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(()),
            Err(argon2::password_hash::Error::Password) => Err(PasswordError::Mismatch),
            Err(e) => Err(PasswordError::HashingFailed(e.to_string())),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn argon2_salt(salt: &str) -> Result<SaltString, PasswordError> {
        let bytes = hex::decode(salt).map_err(|e| PasswordError::InvalidSalt(e.to_string()))?;
        if bytes.len() != SALT_LENGTH {
            return Err(PasswordError::InvalidSalt(format!(
                "expected {} bytes, got {}",
                SALT_LENGTH,
                bytes.len()
            )));
        }

        SaltString::encode_b64(&bytes).map_err(|e| PasswordError::InvalidSalt(e.to_string()))
    }

    fn salted_input(password: &str, salt: &str) -> String {
        let mut input = String::with_capacity(password.len() + salt.len());
        input.push_str(password);
        input.push_str(salt);
        input
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
