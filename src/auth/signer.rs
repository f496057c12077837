//! # Cookie Signer
//!
//! Tamper-evident tokens of the form `"<value>|<hex HMAC-SHA256>"`.
//!
//! The value travels in plaintext; the signature only prevents forgery.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::{ConfigError, ConfigResult, CookieSecret};

use super::crypto::{constant_time_str_eq, SEPARATOR};

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies cookie values with the process-wide secret
#[derive(Clone)]
pub struct CookieSigner {
    mac: HmacSha256,
}

impl CookieSigner {
    /// Key a signer with the configured secret
    pub fn new(secret: &CookieSecret) -> ConfigResult<Self> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| ConfigError::InvalidSecret("secret cannot key HMAC".to_string()))?;
        Ok(Self { mac })
    }

    /// Produce `"<value>|<signature>"`
    pub fn sign(&self, value: &str) -> String {
        format!("{}{}{}", value, SEPARATOR, self.signature(value))
    }

    /// Return the embedded value iff the token's signature is authentic
    ///
    /// The signature is the text after the last separator; hex never
    /// contains one, so any value (including one with `|`) round-trips.
    pub fn verify(&self, token: &str) -> Option<String> {
        let (value, signature) = token.rsplit_once(SEPARATOR)?;
        let expected = self.signature(value);

        if constant_time_str_eq(&expected, signature) {
            Some(value.to_string())
        } else {
            None
        }
    }

    fn signature(&self, value: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(value.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for CookieSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CookieSigner { .. }")
    }
}
