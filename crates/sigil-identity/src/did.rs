//! `did:key` identifiers for Ed25519 public keys.
//!
//! A `did:key` embeds the public key itself:
//!
//! ```text
//! did:key:z<base58btc(0xed 0x01 || public_key)>
//! ```
//!
//! `0xed 0x01` is the unsigned-varint multicodec tag for `ed25519-pub` and
//! `z` is the multibase prefix for base58btc.

use crate::{IdentityError, PublicKey, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scheme and method prefix of every key DID.
pub const DID_KEY_PREFIX: &str = "did:key:";

const MULTIBASE_BASE58BTC: char = 'z';
const ED25519_PUB_MULTICODEC: [u8; 2] = [0xed, 0x01];

/// A validated Ed25519 `did:key` identifier.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Did {
    value: String,
    public_key: PublicKey,
}

impl Did {
    /// Derives the DID for a public key. Same key, same DID.
    #[must_use]
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let mut bytes = Vec::with_capacity(ED25519_PUB_MULTICODEC.len() + PublicKey::LEN);
        bytes.extend_from_slice(&ED25519_PUB_MULTICODEC);
        bytes.extend_from_slice(public_key.as_bytes());

        let value = format!(
            "{DID_KEY_PREFIX}{MULTIBASE_BASE58BTC}{}",
            bs58::encode(bytes).into_string()
        );
        Self {
            value,
            public_key: *public_key,
        }
    }

    /// Parses a `did:key` string and recovers the embedded public key.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidDid`] if the string is not an
    /// Ed25519 `did:key` in base58btc.
    pub fn parse(s: &str) -> Result<Self> {
        let encoded = s
            .strip_prefix(DID_KEY_PREFIX)
            .ok_or_else(|| IdentityError::InvalidDid(format!("missing \"{DID_KEY_PREFIX}\" prefix")))?;
        let encoded = encoded.strip_prefix(MULTIBASE_BASE58BTC).ok_or_else(|| {
            IdentityError::InvalidDid("only base58btc (\"z\") multibase is supported".into())
        })?;
        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| IdentityError::InvalidDid(e.to_string()))?;

        let key_bytes = bytes
            .strip_prefix(&ED25519_PUB_MULTICODEC)
            .ok_or_else(|| IdentityError::InvalidDid("not an ed25519-pub multicodec key".into()))?;
        let public_key = PublicKey::from_bytes(key_bytes)
            .map_err(|e| IdentityError::InvalidDid(e.to_string()))?;

        let did = Self::from_public_key(&public_key);
        if did.value != s {
            return Err(IdentityError::InvalidDid("non-canonical encoding".into()));
        }
        Ok(did)
    }

    /// Returns the DID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the public key embedded in this DID.
    #[must_use]
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Returns the id of the key's verification method, `<did>#<fragment>`.
    #[must_use]
    pub fn verification_method(&self) -> String {
        let fragment = &self.value[DID_KEY_PREFIX.len()..];
        format!("{}#{fragment}", self.value)
    }
}

impl fmt::Debug for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Did({})", self.value)
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Did {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl Serialize for Did {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for Did {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Keypair;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const RFC8032_PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
    const RFC8032_DID: &str = "did:key:z6MktwupdmLXVVqTzCw4i46r4uGyosGXRnR3XjN4Zq7oMMsw";

    fn rfc8032_key() -> PublicKey {
        PublicKey::from_bytes(&hex::decode(RFC8032_PUBLIC).unwrap()).unwrap()
    }

    #[test]
    fn derives_golden_did() {
        let did = Did::from_public_key(&rfc8032_key());
        assert_eq!(did.as_str(), RFC8032_DID);
    }

    #[test]
    fn ed25519_dids_start_with_z6mk() {
        let did = Did::from_public_key(&Keypair::generate().unwrap().public_key());
        assert!(did.as_str().starts_with("did:key:z6Mk"));
    }

    #[test]
    fn parse_recovers_public_key() {
        let did = Did::parse(RFC8032_DID).unwrap();
        assert_eq!(did.public_key(), &rfc8032_key());
        assert_eq!(did.to_string(), RFC8032_DID);
    }

    #[test]
    fn parse_rejects_other_methods() {
        assert!(Did::parse("did:web:example.com").is_err());
        assert!(Did::parse("did:key:uABC").is_err());
        assert!(Did::parse("did:key:z0OIl").is_err());
    }

    #[test]
    fn parse_rejects_other_key_types() {
        // secp256k1-pub multicodec (0xe7 0x01) with a 33-byte key.
        let mut bytes = vec![0xe7, 0x01];
        bytes.extend_from_slice(&[2u8; 33]);
        let s = format!("did:key:z{}", bs58::encode(bytes).into_string());
        let err = Did::parse(&s).unwrap_err();
        assert!(err.to_string().contains("ed25519-pub"));
    }

    #[test]
    fn verification_method_fragment() {
        let did = Did::parse(RFC8032_DID).unwrap();
        assert_eq!(
            did.verification_method(),
            format!("{RFC8032_DID}#z6MktwupdmLXVVqTzCw4i46r4uGyosGXRnR3XjN4Zq7oMMsw")
        );
    }

    #[test]
    fn serde_as_plain_string() {
        let did = Did::parse(RFC8032_DID).unwrap();
        let json = serde_json::to_string(&did).unwrap();
        assert_eq!(json, format!("\"{RFC8032_DID}\""));
        let back: Did = serde_json::from_str(&json).unwrap();
        assert_eq!(back, did);
    }

    proptest! {
        #[test]
        fn derivation_is_deterministic(secret in any::<[u8; 32]>()) {
            let kp = Keypair::from_secret_bytes(&secret).unwrap();
            let first = Did::from_public_key(&kp.public_key());
            let second = Did::from_public_key(&kp.public_key());
            prop_assert_eq!(first.as_str(), second.as_str());
            prop_assert_eq!(Did::parse(first.as_str()).unwrap(), first);
        }
    }
}
