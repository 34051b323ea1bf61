use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand_core::OsRng;

use crate::errors::ServiceError;

/// Hash a plaintext password with Argon2id into PHC string format.
pub fn hash_password(plain: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| ServiceError::hash("hash_password", e.to_string()))?;
    Ok(hash.to_string())
}

/// Constant-time verification of a plaintext password against a stored
/// PHC digest. A mismatch is `Ok(false)`, not an error.
pub fn verify_password(plain: &str, digest: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(digest)
        .map_err(|e| ServiceError::hash("parse_digest", e.to_string()))?;

    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ServiceError::hash("verify_password", e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_produces_phc_format() {
        let digest = hash_password("secret password 123").unwrap();
        assert!(digest.starts_with("$argon2"));
    }

    #[test]
    fn verify_accepts_matching_password() {
        let digest = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &digest).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let digest = hash_password("correct horse battery").unwrap();
        assert!(!verify_password("wrong horse", &digest).unwrap());
    }

    #[test]
    fn same_password_hashes_differently_per_salt() {
        let a = hash_password("repeatable input").unwrap();
        let b = hash_password("repeatable input").unwrap();
        assert_ne!(a, b);
    }
}
