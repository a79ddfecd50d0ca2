//! Invite token secrets
//!
//! The shareable secret is only ever held in memory. The store keeps the
//! SHA-256 digest of it (lower-case hex), and redemption looks tokens up by
//! hashing whatever the guest presents.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Number of random bytes in a generated secret
pub const SECRET_BYTES: usize = 32;

/// Plaintext invite secret (never persisted)
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSecret(String);

impl TokenSecret {
    /// Generate a new random secret
    pub fn generate() -> Self {
        let mut bytes = [0u8; SECRET_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Wrap a secret presented by a guest
    pub fn from_plaintext(plaintext: impl Into<String>) -> Self {
        Self(plaintext.into())
    }

    /// Hash of the secret as stored
    pub fn hash(&self) -> TokenHash {
        TokenHash::of(self.0.trim())
    }

    /// The plaintext, for handing to the issuer exactly once
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Consume into the plaintext string
    pub fn into_plaintext(self) -> String {
        self.0
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(<redacted>)")
    }
}

/// Stored digest of a token secret
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenHash(String);

impl TokenHash {
    /// Hash arbitrary plaintext
    pub fn of(plaintext: &str) -> Self {
        Self(format!("{:x}", Sha256::digest(plaintext.as_bytes())))
    }

    /// Wrap a digest loaded from storage
    pub fn from_stored(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
