//! Credential hashing at the write boundary.
//!
//! The stored secret is an Argon2 PHC string produced here right before
//! persistence. Nothing in the system verifies credentials (authentication
//! was removed), so there is deliberately no verify counterpart.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

/// Minimum accepted credential length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Errors from credential hashing.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The hashing primitive failed.
    #[error("failed to hash credential")]
    Hash,
}

/// Hash a credential with Argon2 and a fresh random salt.
///
/// # Errors
///
/// Returns `CredentialError::Hash` if the underlying primitive fails.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| CredentialError::Hash)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use argon2::password_hash::PasswordHash;

    #[test]
    fn test_hash_is_phc_string() {
        let hash = hash_password("123456").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(PasswordHash::new(&hash).is_ok());
    }

    #[test]
    fn test_hash_never_equals_input() {
        let hash = hash_password("123456").unwrap();
        assert_ne!(hash, "123456");
    }

    #[test]
    fn test_hash_salts_differ_per_call() {
        let first = hash_password("123456").unwrap();
        let second = hash_password("123456").unwrap();
        assert_ne!(first, second);
    }
}
