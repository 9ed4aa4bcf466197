//! # Sigil Node
//!
//! Runtime for a README-summarizing agent with a stable cryptographic
//! identity.
//!
//! ## Startup
//!
//! ```text
//! NodeArgs ──► NodeConfig ──► AgentContext::initialize ──► create_router ──► serve
//!                               │
//!                               ├─ KeyStore::load_or_create   (fatal on error)
//!                               └─ Fingerprinter::status      (degrades on error)
//! ```
//!
//! The [`context::AgentContext`] is built exactly once, before the listener
//! is bound, and handed to the router by value. Handlers never reach for
//! global state.
//!
//! ## Quick Start
//!
//! ```bash
//! cargo run --bin sigil-node -- --listen-addr 127.0.0.1:8000
//! curl -X POST localhost:8000/summarize -H 'content-type: application/json' \
//!      -d '{"repo_url":"https://github.com/rust-lang/cargo"}'
//! ```
//!
//! ## Deployment
//!
//! Give every agent instance its own `--key-path`. Two processes sharing one
//! key file is unsupported.
//!
//! ## Modules
//!
//! - [`api`] - HTTP routes
//! - [`config`] - Node configuration
//! - [`context`] - Startup identity and fingerprint
//! - [`observability`] - Logging and request IDs
//! - [`summary`] - README summarization

pub mod api;
pub mod config;
pub mod context;
pub mod observability;
pub mod summary;
