//! Content-addressable cache keys.
//!
//! A [`ContentKey`] is the SHA-256 digest of an ordered sequence of string
//! parts concatenated without a separator. Keys are stable across runs and
//! processes, which is what lets them act as primary and secondary keys in
//! the on-disk rating cache.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of a [`ContentKey`] digest in bytes.
pub const KEY_LEN: usize = 32;

/// SHA-256 digest identifying a media identity or a raw filename.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentKey(#[serde(with = "hex::serde")] [u8; KEY_LEN]);

impl ContentKey {
    /// Derive a key from `parts`, hashed in order with no separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediascore_common::ContentKey;
    ///
    /// let a = ContentKey::derive(["The Matrix", "1999"]);
    /// let b = ContentKey::derive(["The Matrix1999"]);
    /// assert_eq!(a, b);
    /// ```
    pub fn derive<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part.as_ref().as_bytes());
        }
        Self(hasher.finalize().into())
    }

    /// Rebuild a key from raw digest bytes read back from storage.
    pub fn from_slice(bytes: &[u8]) -> crate::Result<Self> {
        let digest: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            crate::Error::invalid_input(format!(
                "content key must be {} bytes, got {}",
                KEY_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(digest))
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Lowercase hex rendering of the digest.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentKey({})", &self.to_hex()[..12])
    }
}
