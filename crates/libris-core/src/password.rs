//! Argon2id password hashing.
//!
//! Account creation and login both go through [`Passwords`], so the cost
//! parameters and the pepper rule live in one place. The pepper, when set,
//! is prepended to the plaintext before hashing or verification.

use std::borrow::Cow;
use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};

use crate::error::{LibrisError, LibrisResult};

/// OWASP recommended Argon2id cost: 19 MiB memory, 2 passes, 1 lane.
pub const MEMORY_COST_KIB: u32 = 19_456;
pub const TIME_COST: u32 = 2;
pub const PARALLELISM: u32 = 1;

/// Hashes and verifies passwords with a fixed Argon2id configuration.
#[derive(Clone, Default)]
pub struct Passwords {
    pepper: Option<String>,
}

impl fmt::Debug for Passwords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Passwords")
            .field("pepper", &self.pepper.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Passwords {
    pub fn new(pepper: Option<String>) -> Self {
        Self { pepper }
    }

    fn argon2() -> LibrisResult<Argon2<'static>> {
        let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
            .map_err(|e| LibrisError::Crypto(format!("argon2 params error: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn peppered<'a>(&self, password: &'a str) -> Cow<'a, [u8]> {
        match &self.pepper {
            Some(pepper) => Cow::Owned(format!("{pepper}{password}").into_bytes()),
            None => Cow::Borrowed(password.as_bytes()),
        }
    }

    /// Produce a PHC string with a fresh random salt.
    pub fn hash(&self, password: &str) -> LibrisResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()?
            .hash_password(&self.peppered(password), &salt)
            .map_err(|e| LibrisError::Crypto(format!("password hash error: {e}")))?;
        Ok(hash.to_string())
    }

    /// `Ok(false)` on mismatch; `Err(Crypto)` when `hash` is not a valid
    /// PHC string.
    pub fn verify(&self, password: &str, hash: &str) -> LibrisResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| LibrisError::Crypto(format!("invalid hash format: {e}")))?;

        match Self::argon2()?.verify_password(&self.peppered(password), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(LibrisError::Crypto(format!("verify error: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_uses_owasp_argon2id_params() {
        let hash = Passwords::default().hash("hunter2").unwrap();
        assert!(
            hash.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"),
            "unexpected PHC prefix: {hash}"
        );
    }

    #[test]
    fn hash_then_verify() {
        let passwords = Passwords::default();
        let hash = passwords.hash("hunter2").unwrap();

        assert!(passwords.verify("hunter2", &hash).unwrap());
        assert!(!passwords.verify("hunter3", &hash).unwrap());
    }

    #[test]
    fn salts_differ() {
        let passwords = Passwords::default();
        assert_ne!(
            passwords.hash("hunter2").unwrap(),
            passwords.hash("hunter2").unwrap()
        );
    }

    #[test]
    fn pepper_must_match() {
        let peppered = Passwords::new(Some("pepper!".into()));
        let hash = peppered.hash("hunter2").unwrap();

        assert!(peppered.verify("hunter2", &hash).unwrap());
        assert!(!Passwords::default().verify("hunter2", &hash).unwrap());
        assert!(
            !Passwords::new(Some("other".into()))
                .verify("hunter2", &hash)
                .unwrap()
        );
    }

    #[test]
    fn malformed_hash_is_a_crypto_error() {
        let result = Passwords::default().verify("pw", "not-a-hash");
        assert!(matches!(result, Err(LibrisError::Crypto(_))));
    }

    #[test]
    fn debug_redacts_pepper() {
        let rendered = format!("{:?}", Passwords::new(Some("s3cret".into())));
        assert!(!rendered.contains("s3cret"));
    }
}
