//! End-to-end tests for the node HTTP API.

use async_trait::async_trait;
use axum::{body::Body, http::Request};
use serde_json::{json, Value};
use sigil_attest::{Attestation, FingerprintStatus};
use sigil_github::{GithubError, Readme, ReadmeSource, RepoRef};
use sigil_identity::{Did, KeyStore, Signature};
use sigil_node::api::{create_router, summary_signing_message, AppState, SummarizeResponse};
use sigil_node::config::NodeConfig;
use sigil_node::context::AgentContext;
use sigil_node::summary::ExtractiveSummarizer;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Serves READMEs from memory.
struct StubReadmes;

#[async_trait]
impl ReadmeSource for StubReadmes {
    async fn fetch_readme(&self, repo_url: &str) -> sigil_github::Result<Readme> {
        let repo = RepoRef::parse(repo_url)?;
        match repo.full_name().as_str() {
            "octocat/hello" => Ok(Readme {
                display_name: repo.full_name(),
                text: "# Hello\n\nA friendly greeting service.\n".into(),
            }),
            "octocat/broken" => Err(GithubError::Status {
                status: 500,
                message: "boom".into(),
            }),
            _ => Err(GithubError::NotFound(repo.full_name())),
        }
    }
}

fn create_test_app(dir: &TempDir, with_artifact: bool) -> axum::Router {
    if with_artifact {
        std::fs::write(dir.path().join("agent.bin"), b"abc").unwrap();
    }
    let config = NodeConfig {
        key_path: dir.path().join("key.jwk"),
        fingerprint_path: Some(dir.path().join("agent.bin")),
        ..NodeConfig::default()
    };
    let context = AgentContext::initialize(&config).unwrap();

    create_router(AppState {
        context: Arc::new(context),
        readmes: Arc::new(StubReadmes),
        summarizer: Arc::new(ExtractiveSummarizer::default()),
    })
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn summarize(repo_url: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/summarize")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "repo_url": repo_url }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, true);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, true);

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_identity_matches_key_file() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, true);

    let response = app.oneshot(get("/identity")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body = json_body(response).await;

    let stored = KeyStore::new(dir.path().join("key.jwk")).load().unwrap();
    assert_eq!(body["did"], stored.did().as_str());
    assert_eq!(body["public_key"], stored.public_key().to_string());
    assert_eq!(
        body["fingerprint"],
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );

    // The published JWK never carries the private member.
    assert_eq!(body["public_jwk"]["kty"], "OKP");
    assert_eq!(body["public_jwk"]["crv"], "Ed25519");
    assert!(body["public_jwk"].get("d").is_none());

    let vm = body["verification_method"].as_str().unwrap();
    assert!(vm.starts_with(stored.did().as_str()));
    assert!(vm.contains('#'));
}

#[tokio::test]
async fn test_identity_without_fingerprint() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, false);

    let response = app.oneshot(get("/identity")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body = json_body(response).await;
    assert!(body["fingerprint"].is_null());
}

#[tokio::test]
async fn test_attestation_verifies() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, true);

    let response = app.oneshot(get("/attestation")).await.unwrap();
    assert_eq!(response.status(), 200);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let attestation: Attestation = serde_json::from_slice(&body).unwrap();
    assert!(attestation.verify().is_ok());
    assert_eq!(
        attestation.fingerprint.to_hex(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[tokio::test]
async fn test_attestation_unavailable_without_fingerprint() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, false);

    let response = app.oneshot(get("/attestation")).await.unwrap();
    assert_eq!(response.status(), 503);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("fingerprint"));
}

#[tokio::test]
async fn test_summarize_is_signed_by_agent() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, true);

    let response = app
        .oneshot(summarize("https://github.com/octocat/hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let signed: SummarizeResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(signed.repo, "octocat/hello");
    assert_eq!(signed.title.as_deref(), Some("Hello"));
    assert_eq!(signed.summary, "A friendly greeting service.");
    assert!(signed.fingerprint.is_some());

    // Anyone holding the DID can check the signature.
    signed.verify().unwrap();
    let did: Did = signed.did.as_str().parse().unwrap();
    let message = summary_signing_message(&signed.repo, &signed.summary);
    did.public_key()
        .verify(message.as_bytes(), &signed.signature)
        .unwrap();

    let forged = Signature::from_bytes([0u8; 64]);
    assert!(did.public_key().verify(message.as_bytes(), &forged).is_err());
}

#[tokio::test]
async fn test_summary_signature_is_bound_to_repo() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, true);

    let response = app.oneshot(summarize("octocat/hello")).await.unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let mut signed: SummarizeResponse = serde_json::from_slice(&body).unwrap();
    signed.verify().unwrap();

    // The same text presented as another repository's summary fails.
    signed.repo = "octocat/other".into();
    assert!(signed.verify().is_err());

    // A bare signature over the text alone does not verify either.
    signed.repo = "octocat/hello".into();
    assert!(signed
        .did
        .public_key()
        .verify(signed.summary.as_bytes(), &signed.signature)
        .is_err());
}

#[tokio::test]
async fn test_summarize_accepts_scheme_less_url() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, true);

    let response = app
        .oneshot(summarize("github.com/octocat/hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = json_body(response).await;
    assert_eq!(body["repo"], "octocat/hello");
}

#[tokio::test]
async fn test_summarize_invalid_url() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, true);

    let response = app.oneshot(summarize("not a repo")).await.unwrap();
    assert_eq!(response.status(), 400);
    let body = json_body(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_summarize_missing_readme() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, true);

    let response = app.oneshot(summarize("octocat/missing")).await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_summarize_upstream_failure() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, true);

    let response = app.oneshot(summarize("octocat/broken")).await.unwrap();
    assert_eq!(response.status(), 502);
}

#[tokio::test]
async fn test_identity_survives_restart() {
    let dir = TempDir::new().unwrap();

    let first = json_body(
        create_test_app(&dir, true)
            .oneshot(get("/identity"))
            .await
            .unwrap(),
    )
    .await;
    let second = json_body(
        create_test_app(&dir, true)
            .oneshot(get("/identity"))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(first["did"], second["did"]);
}

#[test]
fn test_context_from_parts() {
    let dir = TempDir::new().unwrap();
    let identity = KeyStore::new(dir.path().join("key.jwk"))
        .load_or_create()
        .unwrap();
    let ctx = AgentContext::new(
        identity,
        FingerprintStatus::Unavailable {
            reason: "test".into(),
        },
    );
    assert!(ctx.attest().is_none());
}
