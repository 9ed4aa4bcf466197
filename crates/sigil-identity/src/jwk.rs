//! JSON Web Key encoding of Ed25519 key material (RFC 8037).
//!
//! The persisted key record is a single OKP JWK:
//!
//! ```json
//! {"kty":"OKP","crv":"Ed25519","x":"<base64url>","d":"<base64url>"}
//! ```
//!
//! Members other than the four above are kept as-is so a record written by
//! another tool survives a load untouched.

use crate::{IdentityError, Keypair, PublicKey, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key type for octet key pairs.
pub const KTY_OKP: &str = "OKP";

/// Curve name for Ed25519.
pub const CRV_ED25519: &str = "Ed25519";

/// An Ed25519 key in JWK form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type, always `OKP`.
    pub kty: String,
    /// Curve, always `Ed25519`.
    pub crv: String,
    /// Public key, base64url without padding.
    pub x: String,
    /// Private key, base64url without padding. Absent for public-only keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    /// Any further members (`kid`, `alg`, `use`, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Jwk {
    /// Encodes a full keypair, private part included.
    #[must_use]
    pub fn from_keypair(keypair: &Keypair) -> Self {
        let mut jwk = Self::from_public_key(&keypair.public_key());
        let secret = keypair.secret_bytes();
        jwk.d = Some(URL_SAFE_NO_PAD.encode(&secret[..]));
        jwk
    }

    /// Encodes a public key only.
    #[must_use]
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self {
            kty: KTY_OKP.to_string(),
            crv: CRV_ED25519.to_string(),
            x: URL_SAFE_NO_PAD.encode(public_key.as_bytes()),
            d: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Parses and validates a JWK document.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidJwk`] if the text is not JSON, lacks
    /// a required member, or is not an Ed25519 OKP key.
    pub fn parse(text: &str) -> Result<Self> {
        let jwk: Self =
            serde_json::from_str(text).map_err(|e| IdentityError::InvalidJwk(e.to_string()))?;
        jwk.validate()?;
        Ok(jwk)
    }

    /// Serializes to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidJwk`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| IdentityError::InvalidJwk(e.to_string()))
    }

    /// Returns whether the private component is present.
    #[must_use]
    pub fn has_private_key(&self) -> bool {
        self.d.is_some()
    }

    /// Decodes the public key from `x`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidJwk`] if `x` is not base64url or is
    /// not a valid Ed25519 point.
    pub fn public_key(&self) -> Result<PublicKey> {
        let bytes = decode_member("x", &self.x)?;
        PublicKey::from_bytes(&bytes).map_err(|e| IdentityError::InvalidJwk(e.to_string()))
    }

    /// Decodes the full keypair and checks that `d` matches `x`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidJwk`] if `d` is missing or malformed,
    /// or if it derives a different public key than `x`.
    pub fn keypair(&self) -> Result<Keypair> {
        let d = self
            .d
            .as_deref()
            .ok_or_else(|| IdentityError::InvalidJwk("missing private key member \"d\"".into()))?;
        let secret = zeroize::Zeroizing::new(decode_member("d", d)?);
        let keypair = Keypair::from_secret_bytes(&secret)
            .map_err(|_| IdentityError::InvalidJwk("\"d\" is not a 32-byte key".into()))?;

        if keypair.public_key() != self.public_key()? {
            return Err(IdentityError::InvalidJwk(
                "private key does not match public key \"x\"".into(),
            ));
        }
        Ok(keypair)
    }

    fn validate(&self) -> Result<()> {
        if self.kty != KTY_OKP {
            return Err(IdentityError::InvalidJwk(format!(
                "unsupported kty \"{}\", expected \"{KTY_OKP}\"",
                self.kty
            )));
        }
        if self.crv != CRV_ED25519 {
            return Err(IdentityError::InvalidJwk(format!(
                "unsupported crv \"{}\", expected \"{CRV_ED25519}\"",
                self.crv
            )));
        }
        self.public_key().map(|_| ())
    }
}

fn decode_member(name: &str, value: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|e| IdentityError::InvalidJwk(format!("member \"{name}\": {e}")))
}

impl fmt::Debug for Jwk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jwk")
            .field("kty", &self.kty)
            .field("crv", &self.crv)
            .field("x", &self.x)
            .field("d", &self.d.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}
