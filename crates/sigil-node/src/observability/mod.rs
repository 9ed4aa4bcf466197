//! # Observability Module
//!
//! Structured logging and request tracing for the Sigil node.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use axum::{middleware, Router};
//! use sigil_node::observability::{init_logging, request_id_middleware, LogFormat};
//!
//! init_logging("info", LogFormat::Pretty);
//!
//! let app: Router<()> = Router::new()
//!     .layer(middleware::from_fn(request_id_middleware));
//! ```

mod logging;
mod middleware;

pub use logging::{init_logging, LogFormat};
pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
