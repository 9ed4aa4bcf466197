//! # Sigil Identity
//!
//! Persistent Ed25519 identity for a Sigil agent.
//!
//! An agent owns one keypair, stored as a JWK at a fixed path. Its
//! decentralized identifier is a `did:key` recomputed from the public key
//! on every load, never stored.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sigil_identity::KeyStore;
//!
//! let identity = KeyStore::new(".agent_key.jwk").load_or_create()?;
//! println!("running as {}", identity.did());
//!
//! let signature = identity.sign(b"hello");
//! assert!(identity.did().public_key().verify(b"hello", &signature).is_ok());
//! # Ok::<(), sigil_identity::IdentityError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bytes;
mod did;
mod error;
mod jwk;
mod keypair;
mod provider;
mod public_key;
mod signature;
mod store;

pub use did::{Did, DID_KEY_PREFIX};
pub use error::{IdentityError, Result};
pub use jwk::{Jwk, CRV_ED25519, KTY_OKP};
pub use keypair::Keypair;
pub use provider::{Ed25519DidKey, KeyProvider};
pub use public_key::PublicKey;
pub use signature::Signature;
pub use store::{AgentIdentity, KeyStore, DEFAULT_KEY_PATH};

/// Loads the identity at [`DEFAULT_KEY_PATH`], creating it on first run.
///
/// # Errors
///
/// See [`KeyStore::load_or_create`].
pub fn load_or_create_identity() -> Result<AgentIdentity> {
    KeyStore::default_location().load_or_create()
}
