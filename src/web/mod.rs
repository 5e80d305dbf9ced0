//! Webhook server module (Axum).

pub mod router;
pub mod server;

pub use router::{create_app_router, WebState};
pub use server::{run_server, WebServerConfig};
