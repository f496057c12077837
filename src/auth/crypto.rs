//! # Cryptographic Utilities
//!
//! Salted password credentials and constant-time comparison.
//!
//! A credential is stored as `"<salt>|<hex digest>"` where
//! `digest = SHA-256(name || password || salt)`. The salt is not secret; it
//! only defeats precomputed tables.

use std::fmt;

use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::errors::{AuthError, AuthResult};

/// Separator between the salt and the digest
pub const SEPARATOR: char = '|';

/// Number of letters in a generated salt
pub const SALT_LEN: usize = 5;

const SALT_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A parsed password credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub salt: String,
    pub digest: String,
}

impl Credential {
    /// Derive a credential with a freshly generated salt
    pub fn derive(name: &str, password: &str) -> Self {
        Self::derive_with_salt(name, password, &make_salt())
    }

    /// Derive a credential with an explicit salt
    pub fn derive_with_salt(name: &str, password: &str, salt: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update(password.as_bytes());
        hasher.update(salt.as_bytes());

        Self {
            salt: salt.to_string(),
            digest: hex::encode(hasher.finalize()),
        }
    }

    /// Parse a stored `"<salt>|<digest>"` string
    pub fn parse(stored: &str) -> AuthResult<Self> {
        let (salt, digest) = stored
            .split_once(SEPARATOR)
            .ok_or(AuthError::InvalidCredentialFormat)?;

        Ok(Self {
            salt: salt.to_string(),
            digest: digest.to_string(),
        })
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.salt, SEPARATOR, self.digest)
    }
}

/// Generate a random salt of [`SALT_LEN`] ASCII letters
pub fn make_salt() -> String {
    let mut rng = rand::thread_rng();
    (0..SALT_LEN)
        .map(|_| SALT_ALPHABET[rng.gen_range(0..SALT_ALPHABET.len())] as char)
        .collect()
}

/// Derive a storable credential string for `(name, password)`
pub fn hash_password(name: &str, password: &str) -> String {
    Credential::derive(name, password).to_string()
}

/// Verify a password against a stored credential string
///
/// A malformed credential never verifies.
pub fn verify_password(name: &str, password: &str, stored: &str) -> bool {
    match Credential::parse(stored) {
        Ok(credential) => {
            let candidate = Credential::derive_with_salt(name, password, &credential.salt);
            constant_time_str_eq(&candidate.to_string(), stored)
        }
        Err(_) => false,
    }
}

/// Constant-time comparison of two byte slices
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Constant-time comparison of two strings
pub fn constant_time_str_eq(a: &str, b: &str) -> bool {
    constant_time_eq(a.as_bytes(), b.as_bytes())
}
