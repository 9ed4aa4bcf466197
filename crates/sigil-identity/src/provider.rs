//! Key generation and DID derivation primitives.

use crate::{Did, Keypair, PublicKey, Result};

/// The two primitives the key store needs from a crypto backend.
pub trait KeyProvider {
    /// Generates a fresh keypair.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IdentityError::KeyGeneration`] if no key could be made.
    fn generate_keypair(&self) -> Result<Keypair>;

    /// Derives the DID for a public key. Must be a pure function.
    fn derive_did(&self, public_key: &PublicKey) -> Did;
}

/// Ed25519 keys from the OS CSPRNG, identified by `did:key`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519DidKey;

impl KeyProvider for Ed25519DidKey {
    fn generate_keypair(&self) -> Result<Keypair> {
        Keypair::generate()
    }

    fn derive_did(&self, public_key: &PublicKey) -> Did {
        Did::from_public_key(public_key)
    }
}
