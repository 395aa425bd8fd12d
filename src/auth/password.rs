//! Password hashing and verification.
use bcrypt::{hash, verify};
use crate::errors::{AppError, FieldViolation};

/// Default minimum plaintext length accepted by [`CredentialHasher::hash`].
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Salted one-way hashing of user passwords (bcrypt).
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    cost: u32,
    min_length: usize,
}

impl CredentialHasher {
    /// `min_length` is clamped to at least 1, so an empty password is always rejected.
    pub fn new(cost: u32, min_length: usize) -> Self {
        Self {
            cost,
            min_length: min_length.max(1),
        }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Hash a plaintext password. Two calls on the same input yield different
    /// hashes because bcrypt draws a fresh salt every time.
    pub fn hash(&self, plain: &str) -> Result<String, AppError> {
        if plain.chars().count() < self.min_length {
            return Err(AppError::Validation(vec![FieldViolation::new(
                "password",
                format!("password must be at least {} characters", self.min_length),
            )]));
        }
        hash(plain, self.cost)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
    }

    /// Hash of a fixed value at the configured cost, verified against on a
    /// login miss so a missing account costs as much as a wrong password.
    pub fn decoy(&self) -> Result<String, AppError> {
        hash("decoy credential for unknown accounts", self.cost)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
    }

    /// Verify a plaintext against a stored hash. A corrupted hash is a mismatch.
    pub fn verify(&self, plain: &str, hashed: &str) -> bool {
        verify(plain, hashed).unwrap_or(false)
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST, MIN_PASSWORD_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(4, MIN_PASSWORD_LENGTH)
    }

    #[test]
    fn test_hash_then_verify() {
        let hasher = hasher();
        let hashed = hasher.hash("supersecret").unwrap();

        assert!(hasher.verify("supersecret", &hashed));
        assert!(!hasher.verify("supersecreT", &hashed));
        assert!(!hasher.verify("", &hashed));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = hasher();
        let first = hasher.hash("supersecret").unwrap();
        let second = hasher.hash("supersecret").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("supersecret", &first));
        assert!(hasher.verify("supersecret", &second));
    }

    #[test]
    fn test_short_and_empty_passwords_rejected() {
        let hasher = hasher();
        assert!(matches!(hasher.hash("short"), Err(AppError::Validation(_))));
        assert!(matches!(hasher.hash(""), Err(AppError::Validation(_))));

        let lenient = CredentialHasher::new(4, 0);
        assert_eq!(lenient.min_length(), 1);
        assert!(lenient.hash("").is_err());
        assert!(lenient.hash("x").is_ok());
    }

    #[test]
    fn test_corrupted_hash_is_a_mismatch() {
        let hasher = hasher();
        assert!(!hasher.verify("supersecret", "not-a-bcrypt-hash"));
        assert!(!hasher.verify("supersecret", ""));

        let mut hashed = hasher.hash("supersecret").unwrap();
        hashed.truncate(hashed.len() - 5);
        assert!(!hasher.verify("supersecret", &hashed));
    }
}
