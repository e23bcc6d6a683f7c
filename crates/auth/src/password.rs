//! Password hashing and verification (Argon2id, PHC strings).

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use thiserror::Error;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password must be at least 6 characters")]
    TooShort,

    #[error("invalid hash cost: {0}")]
    InvalidCost(String),

    #[error("stored password hash is malformed")]
    MalformedHash,

    #[error("hashing failed: {0}")]
    Hashing(String),
}

/// Adaptive cost parameters for new hashes.
///
/// `iterations` is the cost factor; memory stays at the Argon2 default unless
/// overridden. Existing hashes carry their own parameters and verify
/// regardless of the current setting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HashCost {
    pub iterations: u32,
    pub memory_kib: u32,
}

impl HashCost {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations,
            memory_kib: Params::DEFAULT_M_COST,
        }
    }

    pub fn with_memory_kib(mut self, memory_kib: u32) -> Self {
        self.memory_kib = memory_kib;
        self
    }

    fn hasher(&self) -> Result<Argon2<'static>, PasswordError> {
        let params = Params::new(self.memory_kib, self.iterations, 1, None)
            .map_err(|e| PasswordError::InvalidCost(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for HashCost {
    fn default() -> Self {
        Self::new(Params::DEFAULT_T_COST)
    }
}

/// Hash a plaintext password with a fresh random salt.
pub fn hash(plaintext: &str, cost: HashCost) -> Result<String, PasswordError> {
    if plaintext.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }

    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| PasswordError::Hashing(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Hashing(e.to_string()))?;

    let phc = cost
        .hasher()?
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hashing(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Check a plaintext password against a stored PHC hash.
///
/// `Ok(false)` means a well-formed hash that does not match.
pub fn verify(plaintext: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| PasswordError::MalformedHash)?;

    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(_) => Err(PasswordError::MalformedHash),
    }
}

#[cfg(test)]
pub(crate) fn test_cost() -> HashCost {
    HashCost::new(1).with_memory_kib(64)
}
