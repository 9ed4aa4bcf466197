//! Persistent key store.
//!
//! The store owns exactly one key record on disk. The first call to
//! [`KeyStore::load_or_create`] mints a keypair and writes it; every later
//! call only reads it. A record that exists but cannot be decoded is an
//! error, never a reason to mint a replacement.
//!
//! Two processes must not share one key path. The write uses a no-clobber
//! rename, so a racing second writer fails instead of replacing the key.

use crate::provider::{Ed25519DidKey, KeyProvider};
use crate::{Did, IdentityError, Jwk, Keypair, PublicKey, Result, Signature};
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Default key record location, relative to the working directory.
pub const DEFAULT_KEY_PATH: &str = ".agent_key.jwk";

/// The agent's established identity.
#[derive(Clone)]
pub struct AgentIdentity {
    did: Did,
    keypair: Keypair,
    jwk: Jwk,
    record: String,
}

impl AgentIdentity {
    /// Returns the agent's DID.
    #[must_use]
    pub fn did(&self) -> &Did {
        &self.did
    }

    /// Returns the signing keypair.
    #[must_use]
    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// Returns the public key.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// Returns the decoded key record.
    #[must_use]
    pub fn jwk(&self) -> &Jwk {
        &self.jwk
    }

    /// Returns the key record exactly as stored on disk.
    #[must_use]
    pub fn key_record(&self) -> &str {
        &self.record
    }

    /// Signs a message with the identity key.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.keypair.sign(message)
    }
}

impl fmt::Debug for AgentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentIdentity")
            .field("did", &self.did)
            .finish_non_exhaustive()
    }
}

/// File-backed store for a single identity key.
#[derive(Debug, Clone)]
pub struct KeyStore<P = Ed25519DidKey> {
    path: PathBuf,
    provider: P,
}

impl KeyStore {
    /// Creates a store for the record at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_provider(path, Ed25519DidKey)
    }

    /// Creates a store at [`DEFAULT_KEY_PATH`].
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(DEFAULT_KEY_PATH)
    }
}

impl<P: KeyProvider> KeyStore<P> {
    /// Creates a store that uses a custom key provider.
    pub fn with_provider(path: impl Into<PathBuf>, provider: P) -> Self {
        Self {
            path: path.into(),
            provider,
        }
    }

    /// Returns the record location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the identity, creating and persisting a new key on first run.
    ///
    /// # Errors
    ///
    /// - [`IdentityError::Storage`] if a record exists but is unreadable or
    ///   corrupt, or if the new record cannot be written.
    /// - [`IdentityError::KeyGeneration`] if no key could be generated.
    pub fn load_or_create(&self) -> Result<AgentIdentity> {
        match fs::read_to_string(&self.path) {
            Ok(record) => self.decode(record),
            Err(e) if e.kind() == ErrorKind::NotFound => self.create(),
            Err(e) => Err(IdentityError::storage(&self.path, e)),
        }
    }

    /// Loads an existing identity without ever creating one.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Storage`] if the record is missing,
    /// unreadable or corrupt.
    pub fn load(&self) -> Result<AgentIdentity> {
        let record =
            fs::read_to_string(&self.path).map_err(|e| IdentityError::storage(&self.path, e))?;
        self.decode(record)
    }

    fn decode(&self, record: String) -> Result<AgentIdentity> {
        let jwk = Jwk::parse(&record).map_err(|e| IdentityError::storage(&self.path, e))?;
        let keypair = jwk
            .keypair()
            .map_err(|e| IdentityError::storage(&self.path, e))?;
        let did = self.provider.derive_did(&keypair.public_key());

        tracing::info!(did = %did, path = %self.path.display(), "Loaded agent identity");
        Ok(AgentIdentity {
            did,
            keypair,
            jwk,
            record,
        })
    }

    fn create(&self) -> Result<AgentIdentity> {
        let keypair = self.provider.generate_keypair()?;
        let jwk = Jwk::from_keypair(&keypair);
        let record = jwk.to_json()?;

        self.persist(&record)?;

        let did = self.provider.derive_did(&keypair.public_key());
        tracing::info!(did = %did, path = %self.path.display(), "Created agent identity");
        Ok(AgentIdentity {
            did,
            keypair,
            jwk,
            record,
        })
    }

    /// Writes the record to a temp file beside the target, syncs it, then
    /// links it into place without replacing an existing file.
    fn persist(&self, record: &str) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| IdentityError::storage(&self.path, e))?;

        // NamedTempFile is created with mode 0600 on Unix.
        let mut tmp = tempfile::Builder::new()
            .prefix(".agent_key")
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|e| IdentityError::storage(&self.path, e))?;
        tmp.write_all(record.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| IdentityError::storage(&self.path, e))?;

        tmp.persist_noclobber(&self.path)
            .map_err(|e| IdentityError::storage(&self.path, e.error))?;
        sync_dir(&dir).map_err(|e| IdentityError::storage(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), "Persisted key record");
        Ok(())
    }
}

/// Flushes a directory entry so a new link survives power loss.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
