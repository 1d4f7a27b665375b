//! Runtime services and shared state for the concierge backend.

use std::net::SocketAddr;

use tokio::{net::TcpListener, signal};
use tracing::{info, instrument, warn};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{chat::ChatClient, db::DbClient, http},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the database client, the chat client, and the
/// configuration. It is designed to be trivially cloneable, allowing it to be
/// passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The database client instance.
    pub db: DbClient,
    /// The chat client instance, when Slack credentials are configured.
    pub chat: Option<ChatClient>,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the database.
        let db = DbClient::connect(&config).await?;

        // Initialize the slack client. Without an app token the HTTP API still
        // serves; with a bad one, authentication fails here, at connect time.
        let chat = if config.slack_app_token.is_empty() {
            warn!("SLACK_APP_TOKEN is not set; the Slack integration is disabled.");
            None
        } else {
            Some(ChatClient::slack(&config).await?)
        };

        Ok(Self { config, db, chat })
    }

    /// Serve the HTTP API and, when configured, the Slack socket-mode listener.
    pub async fn start(&self) -> Void {
        let app = http::router(self.db.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = TcpListener::bind(addr).await?;
        info!("HTTP API listening on {}.", addr);

        let server = async {
            axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(shutdown_signal())
                .await
                .map_err(crate::base::types::Err::from)
        };

        match &self.chat {
            Some(chat) => {
                tokio::try_join!(server, chat.start())?;
            }
            None => server.await?,
        }

        Ok(())
    }
}

/// Resolves when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C. Initiating graceful shutdown ..."),
        () = terminate => info!("Received SIGTERM. Initiating graceful shutdown ..."),
    }
}
