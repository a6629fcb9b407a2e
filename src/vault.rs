use bcrypt::{BcryptError, DEFAULT_COST};
use thiserror::Error;

/// Lowest cost bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest cost bcrypt accepts.
pub const MAX_COST: u32 = 31;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("password hashing failed: {0}")]
    Hash(#[source] BcryptError),
    #[error("malformed password digest: {0}")]
    MalformedDigest(String),
}

/// One-way password hashing with a fixed bcrypt cost.
#[derive(Debug, Clone, Copy)]
pub struct Vault {
    cost: u32,
}

impl Vault {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hashes `password` with a fresh salt. The digest is the bcrypt string as bytes.
    pub fn hash(&self, password: &str) -> Result<Vec<u8>, VaultError> {
        bcrypt::hash(password, self.cost)
            .map(String::into_bytes)
            .map_err(VaultError::Hash)
    }

    /// Checks `password` against a stored digest.
    ///
    /// A mismatch is `Ok(false)`; only a digest that cannot be parsed is an error.
    pub fn verify(&self, digest: &[u8], password: &str) -> Result<bool, VaultError> {
        let digest = std::str::from_utf8(digest)
            .map_err(|e| VaultError::MalformedDigest(e.to_string()))?;

        bcrypt::verify(password, digest).map_err(|e| VaultError::MalformedDigest(e.to_string()))
    }
}

impl Default for Vault {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> Vault {
        Vault::new(MIN_COST)
    }

    #[test]
    fn hash_then_verify() {
        let vault = vault();
        let digest = vault.hash("hunter2").unwrap();

        assert!(vault.verify(&digest, "hunter2").unwrap());
        assert!(!vault.verify(&digest, "hunter3").unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let vault = vault();
        assert_ne!(vault.hash("pw").unwrap(), vault.hash("pw").unwrap());
    }

    #[test]
    fn malformed_digest_is_an_error() {
        let err = vault().verify(b"not-a-bcrypt-hash", "pw").unwrap_err();
        assert!(matches!(err, VaultError::MalformedDigest(_)));
    }

    #[test]
    fn out_of_range_cost_fails_to_hash() {
        let err = Vault::new(2).hash("pw").unwrap_err();
        assert!(matches!(err, VaultError::Hash(_)));
    }
}
