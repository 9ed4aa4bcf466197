//! CLI command implementations.

use sigil_attest::{fingerprint_file, AttestError, Attestation, Fingerprinter};
use sigil_github::{GithubError, ReadmeClient, ReadmeClientConfig};
use sigil_identity::{Did, IdentityError, Jwk, KeyStore};
use sigil_node::summary::{ExtractiveSummarizer, Summarizer};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Attest(#[from] AttestError),

    #[error(transparent)]
    Github(#[from] GithubError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Create the identity at `key_path` unless one already exists.
pub fn identity_init(out: &mut impl Write, key_path: &Path) -> Result<()> {
    tracing::info!(path = %key_path.display(), "Initializing identity");
    let existed = key_path.exists();
    let identity = KeyStore::new(key_path).load_or_create()?;

    if existed {
        writeln!(out, "Identity already present at {}", key_path.display())?;
    } else {
        writeln!(out, "Created identity at {}", key_path.display())?;
    }
    writeln!(out, "  DID: {}", identity.did())?;
    Ok(())
}

/// Show the identity stored at `key_path`. Never creates one.
pub fn identity_show(out: &mut impl Write, key_path: &Path) -> Result<()> {
    let identity = KeyStore::new(key_path).load()?;
    let public_jwk = Jwk::from_public_key(&identity.public_key());

    writeln!(out, "DID:        {}", identity.did())?;
    writeln!(out, "Method:     {}", identity.did().verification_method())?;
    writeln!(out, "Public Key: {}", identity.public_key())?;
    writeln!(out, "JWK:        {}", public_jwk.to_json()?)?;
    Ok(())
}

/// Decode a `did:key` and print the key it names.
pub fn did_inspect(out: &mut impl Write, did: &str) -> Result<()> {
    let did: Did = did.parse()?;

    writeln!(out, "DID:        {did}")?;
    writeln!(out, "Public Key: {}", did.public_key())?;
    writeln!(out, "Method:     {}", did.verification_method())?;
    Ok(())
}

/// Print the SHA-256 fingerprint of `path`, or of this executable.
pub fn fingerprint(out: &mut impl Write, path: Option<&Path>) -> Result<()> {
    let fp = match path {
        Some(path) => fingerprint_file(path)?,
        None => Fingerprinter::current_exe()?.fingerprint()?,
    };
    writeln!(out, "{fp}")?;
    Ok(())
}

/// Issue an attestation binding the identity at `key_path` to `artifact`.
pub fn attest(out: &mut impl Write, key_path: &Path, artifact: &Path) -> Result<()> {
    let identity = KeyStore::new(key_path).load()?;
    let fp = fingerprint_file(artifact)?;
    let attestation = Attestation::issue(&identity, &fp);
    tracing::info!(did = %identity.did(), fingerprint = %fp, "Issued attestation");

    writeln!(out, "{}", serde_json::to_string_pretty(&attestation)?)?;
    Ok(())
}

/// Check an attestation document.
pub fn verify(out: &mut impl Write, attestation_path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(attestation_path)?;
    let attestation: Attestation = serde_json::from_str(&text)?;
    attestation.verify()?;
    tracing::debug!(did = %attestation.did, "Attestation signature valid");

    writeln!(out, "Valid attestation")?;
    writeln!(out, "  DID:         {}", attestation.did)?;
    writeln!(out, "  Fingerprint: {}", attestation.fingerprint)?;
    writeln!(out, "  Issued:      {}", attestation.issued_at.to_rfc3339())?;
    Ok(())
}

/// Fetch a README and print its extractive summary.
pub fn readme(
    out: &mut impl Write,
    repo_url: &str,
    config: ReadmeClientConfig,
    max_chars: usize,
) -> Result<()> {
    tracing::info!(repo_url = %repo_url, api_base = %config.api_base, "Fetching README");
    let client = ReadmeClient::new(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let readme = runtime.block_on(client.fetch(repo_url))?;
    let summary = ExtractiveSummarizer::new(max_chars).summarize(&readme);

    writeln!(out, "{}", readme.display_name)?;
    if let Some(title) = &summary.title {
        writeln!(out, "  {title}")?;
    }
    writeln!(out)?;
    writeln!(out, "{}", summary.text)?;
    Ok(())
}
