//! HTTP API for the concierge service.
//!
//! Two read-only endpoints: a service banner at `/` and a database
//! connectivity probe at `/health`. Every response carries a fully permissive
//! CORS policy (any origin, method, and header, with credentials).

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{error, instrument};

use crate::service::db::DbClient;

// Response bodies.

#[derive(Debug, Serialize)]
struct RootResponse {
    message: &'static str,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
}

// Errors.

/// Error surface for the HTTP handlers.
///
/// Session-provider failures are not reinterpreted; they surface as a
/// service-unavailable response carrying the underlying message.
struct ApiError(crate::base::types::Err);

impl<E> From<E> for ApiError
where
    E: Into<crate::base::types::Err>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {:#}", self.0);
        (StatusCode::SERVICE_UNAVAILABLE, format!("{:#}", self.0)).into_response()
    }
}

// Router.

/// Create the application router.
pub fn router(db: DbClient) -> Router {
    // A literal `*` cannot be combined with credentials, so the permissive
    // policy mirrors whatever the request asks for.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new().route("/", get(root)).route("/health", get(health)).layer(cors).with_state(db)
}

// Handlers.

/// Service banner; consults nothing.
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "AI Concierge API",
        status: "running",
    })
}

/// Database connectivity probe.
///
/// An acquirable session is treated as sufficient evidence of connectivity;
/// no query is performed.
#[instrument(skip_all)]
async fn health(State(db): State<DbClient>) -> Result<Json<HealthResponse>, ApiError> {
    let _session = db.acquire().await?;

    Ok(Json(HealthResponse {
        status: "healthy",
        database: "connected",
    }))
}
