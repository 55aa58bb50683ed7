//! Argon2id credential storage for player accounts.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use spinvault_core::error::CoreError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// PHC-encoded Argon2id hash with a fresh salt.
pub fn hash(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// `Ok(false)` on a wrong password; `Err` only for an unreadable stored hash.
pub fn matches(password: &str, stored: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Signup policy. Length is counted in characters, not bytes.
pub fn check_policy(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_matches_only_its_password() {
        let stored = hash("spin-to-win-2026").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(matches("spin-to-win-2026", &stored).unwrap());
        assert!(!matches("spin-to-lose", &stored).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(matches("whatever", "plaintext").is_err());
    }

    #[test]
    fn policy_counts_characters() {
        assert!(check_policy("seven77").is_err());
        assert!(check_policy("eight888").is_ok());
        // Eight characters, fifteen bytes.
        assert!(check_policy("ééééééé1").is_ok());
    }
}
