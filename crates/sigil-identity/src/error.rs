//! Error types for identity operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The signature verification failed.
    #[error("signature verification failed")]
    InvalidSignature,

    /// The public key is malformed.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// The secret key is malformed.
    #[error("invalid secret key")]
    InvalidSecretKey,

    /// Key generation failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// The string is not a well-formed Ed25519 `did:key` identifier.
    #[error("invalid did: {0}")]
    InvalidDid(String),

    /// The document is not a well-formed Ed25519 JWK.
    #[error("invalid jwk: {0}")]
    InvalidJwk(String),

    /// The persisted key record exists but cannot be used.
    ///
    /// The record is left untouched; the agent must not start under a
    /// different identity.
    #[error("key store at {path} is unusable: {reason}")]
    Storage {
        /// Location of the key record.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },
}

impl IdentityError {
    /// Creates a storage error for the given path.
    #[must_use]
    pub fn storage(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Storage {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns whether this error concerns the persisted key record.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

/// A specialized Result type for identity operations.
pub type Result<T> = std::result::Result<T, IdentityError>;
