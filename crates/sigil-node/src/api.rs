//! HTTP API for the Sigil node.
//!
//! Publishes the agent's identity and attestation, and serves README
//! summaries signed by the agent key.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use sigil_attest::{Attestation, Fingerprint};
use sigil_github::{GithubError, ReadmeSource};
use sigil_identity::{Did, IdentityError, Jwk, Signature};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::context::AgentContext;
use crate::observability::{request_id_middleware, RequestId};
use crate::summary::Summarizer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Identity and fingerprint established at startup.
    pub context: Arc<AgentContext>,
    /// README source.
    pub readmes: Arc<dyn ReadmeSource>,
    /// Summarizer.
    pub summarizer: Arc<dyn Summarizer>,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl From<GithubError> for ApiError {
    fn from(err: GithubError) -> Self {
        match err {
            GithubError::InvalidRepoUrl(_) => ApiError::BadRequest(err.to_string()),
            GithubError::NotFound(_) => ApiError::NotFound(err.to_string()),
            GithubError::Status { .. } | GithubError::Network(_) => {
                ApiError::Upstream(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Public view of the agent identity.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityResponse {
    /// Agent DID.
    pub did: Did,
    /// Verification method id of the agent key.
    pub verification_method: String,
    /// Public key, hex.
    pub public_key: String,
    /// Public key as a JWK, without the private member.
    pub public_jwk: Jwk,
    /// Code fingerprint, when available.
    pub fingerprint: Option<Fingerprint>,
}

/// Request to summarize a repository.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeRequest {
    /// Repository URL or `owner/name`.
    pub repo_url: String,
}

/// Domain separator for summary signatures.
pub const SUMMARY_DOMAIN: &str = "sigil-summary:v1";

/// The exact bytes signed for a summary of `repo`.
///
/// `repo` is an `owner/name` and cannot contain `:`, so the message is
/// unambiguous.
#[must_use]
pub fn summary_signing_message(repo: &str, summary: &str) -> String {
    format!("{SUMMARY_DOMAIN}:{repo}:{summary}")
}

/// A signed summary.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    /// `owner/name`.
    pub repo: String,
    /// README title, if any.
    pub title: Option<String>,
    /// Summary text.
    pub summary: String,
    /// DID of the agent that produced the summary.
    pub did: Did,
    /// Code fingerprint of the agent, when available.
    pub fingerprint: Option<Fingerprint>,
    /// Signature over [`summary_signing_message`] of `repo` and `summary`.
    pub signature: Signature,
}

impl SummarizeResponse {
    /// Checks the signature against the key embedded in `did`.
    ///
    /// # Errors
    ///
    /// Returns an error if `repo` or `summary` was altered or another key
    /// signed them.
    pub fn verify(&self) -> Result<(), IdentityError> {
        let message = summary_signing_message(&self.repo, &self.summary);
        self.did
            .public_key()
            .verify(message.as_bytes(), &self.signature)
    }
}

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/identity", get(get_identity))
        .route("/attestation", get(get_attestation))
        .route("/summarize", post(summarize))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn get_identity(State(state): State<AppState>) -> Json<IdentityResponse> {
    let ctx = &state.context;
    let public_key = ctx.identity().public_key();

    Json(IdentityResponse {
        did: ctx.did().clone(),
        verification_method: ctx.did().verification_method(),
        public_key: public_key.to_string(),
        public_jwk: Jwk::from_public_key(&public_key),
        fingerprint: ctx.fingerprint().copied(),
    })
}

async fn get_attestation(State(state): State<AppState>) -> Result<Json<Attestation>, ApiError> {
    state
        .context
        .attest()
        .map(Json)
        .ok_or_else(|| ApiError::Unavailable("code fingerprint is not available".into()))
}

async fn summarize(
    State(state): State<AppState>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(req): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let readme = state.readmes.fetch_readme(&req.repo_url).await.map_err(|e| {
        tracing::warn!(
            request_id = %request_id,
            repo_url = %req.repo_url,
            error = %e,
            "README fetch failed"
        );
        ApiError::from(e)
    })?;

    let summary = state.summarizer.summarize(&readme);
    let ctx = &state.context;
    let message = summary_signing_message(&readme.display_name, &summary.text);
    let signature = ctx.identity().sign(message.as_bytes());

    tracing::info!(repo = %readme.display_name, chars = summary.text.len(), "Summarized README");
    Ok(Json(SummarizeResponse {
        repo: readme.display_name,
        title: summary.title,
        summary: summary.text,
        did: ctx.did().clone(),
        fingerprint: ctx.fingerprint().copied(),
        signature,
    }))
}
