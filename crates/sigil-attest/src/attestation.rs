//! Signed statements binding a code fingerprint to an agent DID.

use crate::{Fingerprint, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sigil_identity::{AgentIdentity, Did, Signature};

/// Domain separator for attestation messages.
pub const ATTESTATION_DOMAIN: &str = "sigil-attestation:v1";

/// "Agent `did` was running code with digest `fingerprint` at `issued_at`",
/// signed by the agent's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// The attesting agent.
    pub did: Did,
    /// Digest of the agent's code.
    pub fingerprint: Fingerprint,
    /// Issue time, RFC 3339 in UTC.
    pub issued_at: DateTime<Utc>,
    /// Ed25519 signature over [`Attestation::signing_message`].
    pub signature: Signature,
}

impl Attestation {
    /// Issues an attestation timestamped now.
    #[must_use]
    pub fn issue(identity: &AgentIdentity, fingerprint: &Fingerprint) -> Self {
        Self::issue_at(identity, fingerprint, Utc::now())
    }

    /// Issues an attestation with an explicit timestamp.
    #[must_use]
    pub fn issue_at(
        identity: &AgentIdentity,
        fingerprint: &Fingerprint,
        issued_at: DateTime<Utc>,
    ) -> Self {
        // Sub-second precision does not survive every JSON round trip.
        let issued_at = truncate_to_seconds(issued_at);
        let message = signing_message(identity.did(), fingerprint, &issued_at);
        Self {
            did: identity.did().clone(),
            fingerprint: *fingerprint,
            issued_at,
            signature: identity.sign(message.as_bytes()),
        }
    }

    /// The exact bytes that are signed.
    #[must_use]
    pub fn signing_message(&self) -> String {
        signing_message(&self.did, &self.fingerprint, &self.issued_at)
    }

    /// Checks the signature against the key embedded in the DID.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AttestError::Verification`] if any field was altered
    /// or the signature was made by another key.
    pub fn verify(&self) -> Result<()> {
        self.did
            .public_key()
            .verify(self.signing_message().as_bytes(), &self.signature)?;
        Ok(())
    }
}

fn signing_message(did: &Did, fingerprint: &Fingerprint, issued_at: &DateTime<Utc>) -> String {
    format!(
        "{ATTESTATION_DOMAIN}:{did}:{fingerprint}:{}",
        issued_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

fn truncate_to_seconds(t: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(t.timestamp(), 0).unwrap_or(t)
}
