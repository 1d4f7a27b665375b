//! Library root for `concierge-bot`.
//!
//! Concierge-bot is the backend for the AI Concierge service:
//! - Loads a flat, immutable configuration record from the environment
//! - Acknowledges every inbound Slack message over a socket-mode connection
//! - Serves a small HTTP API with a root banner and a database health probe
//!
//! The bot integrates with Slack for chat and SurrealDB for storage. The
//! architecture is built around extensible traits that allow for different
//! implementations of each service.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the concierge runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the database and chat clients
/// - Serves the HTTP API and the Slack socket-mode listener
pub async fn start(config: Config) -> Void {
    info!("Starting concierge-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider().install_default().unwrap();

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
