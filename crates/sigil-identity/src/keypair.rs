//! Ed25519 keypair for signing and verification.

use crate::{IdentityError, PublicKey, Result, Signature};
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

/// An Ed25519 keypair for signing and verification.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// The length of a secret key in bytes.
    pub const SECRET_LEN: usize = 32;

    /// Generates a new random keypair from the operating system's CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::KeyGeneration`] if the entropy source fails.
    pub fn generate() -> Result<Self> {
        Self::generate_from(&mut OsRng)
    }

    /// Generates a new keypair from the given random source.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::KeyGeneration`] if `rng` cannot produce bytes.
    pub fn generate_from<R: RngCore>(rng: &mut R) -> Result<Self> {
        let mut secret = Zeroizing::new([0u8; 32]);
        rng.try_fill_bytes(&mut secret[..])
            .map_err(|e| IdentityError::KeyGeneration(e.to_string()))?;

        let signing_key = SigningKey::from_bytes(&secret);
        Ok(Self { signing_key })
    }

    /// Creates a keypair from a secret key (32 bytes).
    ///
    /// # Errors
    ///
    /// Returns an error if the secret key is invalid.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::SECRET_LEN {
            return Err(IdentityError::InvalidSecretKey);
        }

        let mut secret = Zeroizing::new([0u8; 32]);
        secret.copy_from_slice(bytes);

        let signing_key = SigningKey::from_bytes(&secret);
        Ok(Self { signing_key })
    }

    /// Returns the public key for this keypair.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.signing_key.verifying_key())
    }

    /// Signs a message with this keypair.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature {
        let sig = self.signing_key.sign(message);
        Signature::from_bytes(sig.to_bytes())
    }

    /// Verifies a signature against a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature is invalid.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        self.public_key().verify(message, signature)
    }

    /// Returns the secret key bytes.
    ///
    /// # Security
    ///
    /// Handle with care. The returned buffer is zeroized when dropped.
    #[must_use]
    pub fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl Clone for Keypair {
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}
