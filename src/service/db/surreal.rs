//! SurrealDB implementation of the session provider.
//!
//! The configured `DATABASE_URL` selects the engine: `sqlite:` URLs map to the
//! embedded file-backed store, `memory` to the in-memory engine, and
//! `ws://`/`wss://` endpoints to a remote node.

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use surrealdb::{
    Surreal,
    engine::any::{Any, connect},
};
use tracing::{info, instrument, trace};

use crate::base::{config::Config, types::Res};

use super::{DbClient, GenericDbClient};

// Extra methods on `DbClient` applied by the surreal implementation.

impl DbClient {
    /// Creates a new SurrealDB-backed client from the configured database URL.
    pub async fn connect(config: &Config) -> Res<Self> {
        let client = SurrealDbClient::new(&config.database_url).await?;
        Ok(Self { inner: Arc::new(client) })
    }

    /// Creates an in-memory client, primarily for tests.
    pub async fn memory() -> Res<Self> {
        let client = SurrealDbClient::new("memory").await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Structs.

/// A scoped database session.
///
/// Acquisition is bound to a single request: the session is released when the
/// handle is dropped, regardless of how the request exits.
pub struct DbSession {
    handle: Surreal<Any>,
}

impl Deref for DbSession {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl Drop for DbSession {
    fn drop(&mut self) {
        trace!("Database session released.");
    }
}

/// SurrealDB client implementation.
#[derive(Clone)]
struct SurrealDbClient {
    db: Surreal<Any>,
}

impl SurrealDbClient {
    /// Create a new client and open the underlying engine.
    #[instrument(name = "SurrealDbClient::new", skip_all)]
    pub async fn new(database_url: &str) -> Res<Self> {
        let endpoint = storage_endpoint(database_url);

        let db = connect(endpoint.as_str()).await?;
        db.use_ns("concierge").use_db("api").await?;

        info!("Database initialized successfully at `{}`.", endpoint);

        Ok(Self { db })
    }
}

#[async_trait]
impl GenericDbClient for SurrealDbClient {
    #[instrument(skip(self))]
    async fn acquire(&self) -> Res<DbSession> {
        // A reachable engine is the whole of the connectivity check; no query
        // is issued.
        self.db.health().await?;

        Ok(DbSession { handle: self.db.clone() })
    }
}

/// Translate the configured `DATABASE_URL` into a SurrealDB engine endpoint.
///
/// A `sqlite:` URL keeps its documented default shape (`sqlite:///./test.db`)
/// but is served by the embedded file-backed store at the same path. One
/// leading slash separates the scheme from the path, so `sqlite:///x` is the
/// relative path `./x` and `sqlite:////x` is the absolute path `/x`.
fn storage_endpoint(database_url: &str) -> String {
    if database_url == "memory" {
        return "mem://".to_string();
    }

    if let Some(rest) = database_url.strip_prefix("sqlite://") {
        let path = rest.strip_prefix('/').unwrap_or(rest);
        return format!("surrealkv://{path}");
    }

    database_url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_database_url_maps_to_embedded_store() {
        assert_eq!(storage_endpoint("sqlite:///./test.db"), "surrealkv://./test.db");
    }

    #[test]
    fn absolute_sqlite_paths_are_preserved() {
        assert_eq!(storage_endpoint("sqlite:////var/data/app.db"), "surrealkv:///var/data/app.db");
    }

    #[test]
    fn memory_maps_to_in_memory_engine() {
        assert_eq!(storage_endpoint("memory"), "mem://");
    }

    #[test]
    fn engine_endpoints_pass_through() {
        assert_eq!(storage_endpoint("mem://"), "mem://");
        assert_eq!(storage_endpoint("ws://localhost:8000"), "ws://localhost:8000");
    }

    #[tokio::test]
    async fn acquire_yields_a_session_for_a_reachable_engine() {
        let db = DbClient::memory().await.unwrap();

        let session = db.acquire().await.unwrap();
        drop(session);

        // A second acquisition works after the first was released.
        assert!(db.acquire().await.is_ok());
    }
}
