//! Error types for fingerprinting and attestation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fingerprinting or attesting.
#[derive(Debug, Error)]
pub enum AttestError {
    /// The fingerprinted artifact could not be located or read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// The artifact path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A digest string was not 64 hex characters.
    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    /// The attestation signature does not match its contents.
    #[error("attestation verification failed: {0}")]
    Verification(#[from] sigil_identity::IdentityError),
}

/// A specialized Result type for attestation operations.
pub type Result<T> = std::result::Result<T, AttestError>;
