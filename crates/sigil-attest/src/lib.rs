//! # Sigil Attest
//!
//! Integrity fingerprints of the agent's own code.
//!
//! A [`Fingerprint`] is the SHA-256 of an artifact's bytes, recomputed on
//! every call. It says which code is on disk. On its own it proves nothing
//! about the code that is running. An [`Attestation`] signs the digest with
//! the agent's identity key, so verifiers can tie it to a DID.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sigil_attest::{Attestation, Fingerprinter};
//! use sigil_identity::KeyStore;
//!
//! let identity = KeyStore::default_location().load_or_create()?;
//! let fingerprint = Fingerprinter::current_exe()?.fingerprint()?;
//!
//! let attestation = Attestation::issue(&identity, &fingerprint);
//! assert!(attestation.verify().is_ok());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attestation;
mod error;
mod fingerprint;

pub use attestation::{Attestation, ATTESTATION_DOMAIN};
pub use error::{AttestError, Result};
pub use fingerprint::{fingerprint_file, Fingerprint, FingerprintStatus, Fingerprinter};
