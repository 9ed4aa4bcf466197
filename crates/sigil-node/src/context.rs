//! Agent context established once at startup.

use sigil_attest::{Attestation, Fingerprint, FingerprintStatus, Fingerprinter};
use sigil_identity::{AgentIdentity, Did, IdentityError, KeyStore};

use crate::config::NodeConfig;

/// The agent's identity and code fingerprint, fixed for the process
/// lifetime.
///
/// Built by [`AgentContext::initialize`] before the server accepts
/// requests, then shared read-only behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AgentContext {
    identity: AgentIdentity,
    fingerprint: FingerprintStatus,
}

impl AgentContext {
    /// Assembles a context from parts.
    #[must_use]
    pub fn new(identity: AgentIdentity, fingerprint: FingerprintStatus) -> Self {
        Self {
            identity,
            fingerprint,
        }
    }

    /// Loads or creates the identity, then fingerprints the agent.
    ///
    /// # Errors
    ///
    /// Identity failures are fatal and returned. A fingerprint that cannot
    /// be computed is recorded as unavailable instead.
    pub fn initialize(config: &NodeConfig) -> Result<Self, IdentityError> {
        let identity = KeyStore::new(&config.key_path).load_or_create()?;

        let fingerprinter = match &config.fingerprint_path {
            Some(path) => Ok(Fingerprinter::new(path)),
            None => Fingerprinter::current_exe(),
        };
        let fingerprint = match fingerprinter {
            Ok(fingerprinter) => fingerprinter.status(),
            Err(e) => {
                tracing::warn!(error = %e, "Fingerprint unavailable");
                FingerprintStatus::Unavailable {
                    reason: e.to_string(),
                }
            }
        };

        match fingerprint.fingerprint() {
            Some(fp) => {
                tracing::info!(did = %identity.did(), fingerprint = %fp, "Agent context ready");
            }
            None => tracing::info!(did = %identity.did(), "Agent context ready without fingerprint"),
        }
        Ok(Self::new(identity, fingerprint))
    }

    /// Returns the agent identity.
    #[must_use]
    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    /// Returns the agent DID.
    #[must_use]
    pub fn did(&self) -> &Did {
        self.identity.did()
    }

    /// Returns the startup fingerprint status.
    #[must_use]
    pub fn fingerprint_status(&self) -> &FingerprintStatus {
        &self.fingerprint
    }

    /// Returns the fingerprint if one was computed.
    #[must_use]
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.fingerprint()
    }

    /// Issues a fresh attestation, if a fingerprint is available.
    #[must_use]
    pub fn attest(&self) -> Option<Attestation> {
        self.fingerprint()
            .map(|fp| Attestation::issue(&self.identity, fp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> NodeConfig {
        NodeConfig {
            key_path: dir.path().join("key.jwk"),
            fingerprint_path: Some(dir.path().join("agent.bin")),
            ..NodeConfig::default()
        }
    }

    #[test]
    fn initialize_is_stable_across_restarts() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("agent.bin"), b"abc").unwrap();
        let config = config(&dir);

        let first = AgentContext::initialize(&config).unwrap();
        let second = AgentContext::initialize(&config).unwrap();

        assert_eq!(first.did(), second.did());
        assert_eq!(
            first.fingerprint().unwrap().to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn missing_artifact_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let ctx = AgentContext::initialize(&config(&dir)).unwrap();

        assert!(ctx.fingerprint().is_none());
        assert!(ctx.attest().is_none());
        assert!(matches!(
            ctx.fingerprint_status(),
            FingerprintStatus::Unavailable { .. }
        ));
    }

    #[test]
    fn corrupt_key_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        std::fs::write(&config.key_path, "garbage").unwrap();

        let err = AgentContext::initialize(&config).unwrap_err();
        assert!(err.is_storage());
    }

    #[test]
    fn attestation_is_bound_to_identity() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("agent.bin"), b"code").unwrap();
        let ctx = AgentContext::initialize(&config(&dir)).unwrap();

        let att = ctx.attest().unwrap();
        assert_eq!(&att.did, ctx.did());
        assert!(att.verify().is_ok());
    }
}
