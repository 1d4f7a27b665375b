use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::Res;

pub use surreal::DbSession;

pub mod surreal;

// Traits.

/// Generic database client trait that clients must implement.
///
/// This trait defines the narrow session-provider surface the application
/// depends on: acquiring a scoped session bound to a single request's
/// lifetime. Implementing this trait allows different database backends to be
/// used with the concierge service.
#[async_trait]
pub trait GenericDbClient: Send + Sync + 'static {
    /// Acquire a scoped session, verifying the connection is usable.
    ///
    /// The session is released when the returned handle is dropped, on all
    /// exit paths of the request that acquired it.
    async fn acquire(&self) -> Res<DbSession>;
}

// Structs.

/// Database client for the concierge service.
///
/// This is trivially cloneable and can be passed around without the need for
/// `Arc` or `Mutex`.
#[derive(Clone)]
pub struct DbClient {
    /// The database client instance.
    pub inner: Arc<dyn GenericDbClient>,
}

impl Deref for DbClient {
    type Target = dyn GenericDbClient;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl DbClient {
    pub fn new(inner: Arc<dyn GenericDbClient>) -> Self {
        Self { inner }
    }
}
