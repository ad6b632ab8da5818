//! Password value object - one-way salted hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::{AppError, AppResult};

/// Hashed password. Holds the PHC string, never the plaintext.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash the plain text with a fresh random salt.
    ///
    /// # Errors
    /// `AppError::Encryption` if the hashing primitive fails. Strength is not checked.
    pub fn hash(plain_text: &str) -> AppResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::encryption(e.to_string()))?;
        Ok(Self {
            hash: hash.to_string(),
        })
    }

    /// Wrap an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Compare a plain text password against this hash.
    ///
    /// A malformed stored hash never matches.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Self::argon2()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                false
            }
        }
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let password = Password::hash("secret").unwrap();

        assert_ne!(password.as_str(), "secret");
        assert!(password.verify("secret"));
        assert!(!password.verify("Secret"));
    }

    #[test]
    fn test_password_from_hash() {
        let hash = Password::hash("pw1").unwrap().into_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify("pw1"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let pass1 = Password::hash("same").unwrap();
        let pass2 = Password::hash("same").unwrap();

        // Different salts produce different hashes
        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify("same"));
        assert!(pass2.verify("same"));
    }

    #[test]
    fn test_short_passwords_are_accepted() {
        // Strength policy is not enforced here
        assert!(Password::hash("x").is_ok());
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let password = Password::from_hash("plaintext".to_string());
        assert!(!password.verify("plaintext"));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = Password::hash("secret").unwrap();
        assert!(format!("{:?}", password).contains("[REDACTED]"));
    }
}
