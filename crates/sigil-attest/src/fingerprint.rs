//! SHA-256 fingerprints of the agent's own code.

use crate::{AttestError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};

/// A SHA-256 digest of an artifact's bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// The length of a fingerprint in bytes.
    pub const LEN: usize = 32;

    /// Computes the fingerprint of the given data.
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the digest as lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a fingerprint from hex.
    ///
    /// # Errors
    ///
    /// Returns [`AttestError::InvalidFingerprint`] unless `s` is 64 hex
    /// characters.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| AttestError::InvalidFingerprint(e.to_string()))?;
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            AttestError::InvalidFingerprint(format!("expected {} bytes", Self::LEN))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Outcome of fingerprinting at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FingerprintStatus {
    /// The artifact was read and hashed.
    Available(Fingerprint),
    /// The artifact could not be read; the agent runs without attestation.
    Unavailable {
        /// Why the fingerprint is missing.
        reason: String,
    },
}

impl FingerprintStatus {
    /// Returns the fingerprint, if any.
    #[must_use]
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        match self {
            Self::Available(fp) => Some(fp),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Fingerprints one artifact on disk.
///
/// Every call re-reads the file; nothing is cached.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    path: PathBuf,
}

impl Fingerprinter {
    /// Creates a fingerprinter for the artifact at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a fingerprinter for the running executable.
    ///
    /// # Errors
    ///
    /// Returns [`AttestError::Read`] if the executable path is unknown.
    pub fn current_exe() -> Result<Self> {
        let path = std::env::current_exe().map_err(|source| AttestError::Read {
            path: PathBuf::from("<current executable>"),
            source,
        })?;
        Ok(Self::new(path))
    }

    /// Returns the artifact path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hashes the artifact's current bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AttestError::Read`] if the artifact cannot be read.
    pub fn fingerprint(&self) -> Result<Fingerprint> {
        let bytes = std::fs::read(&self.path).map_err(|source| AttestError::Read {
            path: self.path.clone(),
            source,
        })?;
        let fp = Fingerprint::compute(&bytes);
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), fingerprint = %fp, "Computed fingerprint");
        Ok(fp)
    }

    /// Like [`Fingerprinter::fingerprint`], but a read failure becomes
    /// [`FingerprintStatus::Unavailable`] instead of an error.
    #[must_use]
    pub fn status(&self) -> FingerprintStatus {
        match self.fingerprint() {
            Ok(fp) => FingerprintStatus::Available(fp),
            Err(e) => {
                tracing::warn!(error = %e, "Fingerprint unavailable");
                FingerprintStatus::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Fingerprints the file at `path`.
///
/// # Errors
///
/// Returns [`AttestError::Read`] if the file cannot be read.
pub fn fingerprint_file(path: impl AsRef<Path>) -> Result<Fingerprint> {
    Fingerprinter::new(path.as_ref()).fingerprint()
}
