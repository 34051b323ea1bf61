use crate::errors::ServiceError;
use crate::services::hasher;

/// Known-breached passwords, rejected regardless of length or format.
/// Case-sensitive exact match.
const BREACHED_PASSWORDS: [&str; 12] = [
    "PasswordForJanuary",
    "PasswordForFebruary",
    "PasswordForMarch",
    "PasswordForApril",
    "PasswordForMay",
    "PasswordForJune",
    "PasswordForJuly",
    "PasswordForAugust",
    "PasswordForSeptember",
    "PasswordForOctober",
    "PasswordForNovember",
    "PasswordForDecember",
];

/// Password policy engine. Minimum length 12 is enforced at the DTO
/// boundary; the denylist and same-password checks live here.
#[derive(Default)]
pub struct PasswordPolicy;

impl PasswordPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Rejects candidates found in the breached-password denylist.
    pub fn validate_new_password(&self, candidate: &str) -> Result<(), ServiceError> {
        if BREACHED_PASSWORDS.contains(&candidate) {
            return Err(ServiceError::BreachedPassword);
        }
        Ok(())
    }

    /// Rejects a password change when the candidate matches the stored
    /// digest.
    pub fn reject_unchanged(&self, candidate: &str, current_hash: &str) -> Result<(), ServiceError> {
        if hasher::verify_password(candidate, current_hash)? {
            return Err(ServiceError::MatchingPassword);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breached_passwords_are_rejected() {
        let policy = PasswordPolicy::new();
        for pw in BREACHED_PASSWORDS {
            assert!(matches!(
                policy.validate_new_password(pw),
                Err(ServiceError::BreachedPassword)
            ));
        }
    }

    #[test]
    fn denylist_match_is_case_sensitive() {
        let policy = PasswordPolicy::new();
        assert!(policy.validate_new_password("passwordforjanuary").is_ok());
        assert!(policy.validate_new_password("a perfectly fine password").is_ok());
    }

    #[test]
    fn unchanged_password_is_rejected() {
        let policy = PasswordPolicy::new();
        let digest = hasher::hash_password("currentSecret123").unwrap();
        assert!(matches!(
            policy.reject_unchanged("currentSecret123", &digest),
            Err(ServiceError::MatchingPassword)
        ));
        assert!(policy.reject_unchanged("differentSecret456", &digest).is_ok());
    }
}
