//! Ed25519 signature type.

use crate::{IdentityError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 64]);

impl Signature {
    /// The length of a signature in bytes.
    pub const LEN: usize = 64;

    /// Creates a signature from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of this signature.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Parses a signature from its hex form.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidSignature`] if the input is not
    /// 128 hex characters.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|_| IdentityError::InvalidSignature)?;
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| IdentityError::InvalidSignature)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(self.0))
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            crate::bytes::deserialize_array(deserializer).map(Self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_hex_roundtrip() {
        let sig = Signature::from_bytes([42u8; 64]);
        let parsed = Signature::from_hex(&sig.to_string()).unwrap();
        assert_eq!(sig, parsed);
    }

    #[test]
    fn signature_rejects_truncated_hex() {
        assert!(Signature::from_hex(&"ab".repeat(63)).is_err());
        assert!(Signature::from_hex("not hex").is_err());
    }

    #[test]
    fn signature_roundtrips_through_bincode() {
        let sig = Signature::from_bytes([7u8; 64]);
        let encoded = bincode::serialize(&sig).unwrap();
        let decoded: Signature = bincode::deserialize(&encoded).unwrap();
        assert_eq!(sig, decoded);
    }

    #[test]
    fn signature_bincode_rejects_short_input() {
        let encoded = bincode::serialize(&vec![7u8; 63]).unwrap();
        assert!(bincode::deserialize::<Signature>(&encoded).is_err());
    }

    #[test]
    fn signature_serde_json() {
        let sig = Signature::from_bytes([1u8; 64]);
        let json = serde_json::to_string(&sig).unwrap();
        let sig2: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, sig2);
    }
}
