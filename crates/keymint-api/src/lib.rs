//! # keymint-api — License Issuing & Validation Service
//!
//! Axum HTTP service for issuing and validating software license keys,
//! backed by an in-memory store with optional Postgres persistence.
//!
//! ## API Surface
//!
//! | Method/Path              | Auth              | Module               |
//! |--------------------------|-------------------|----------------------|
//! | `POST /generate_license` | `Authorization`   | [`routes::licenses`] |
//! | `POST /check_license`    | none              | [`routes::licenses`] |
//! | `GET /`                  | none              | welcome text         |
//! | `GET /health/liveness`   | none              | liveness probe       |
//! | `GET /health/readiness`  | none              | readiness probe      |
//! | `GET /openapi.json`      | none              | [`openapi`]          |
//!
//! ## Middleware
//!
//! ```text
//! TraceLayer → AuthMiddleware (issuance route only) → Handler
//! ```

pub mod auth;
pub mod db;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the full application router.
///
/// Only `/generate_license` sits behind the auth middleware; validation is
/// deliberately open (the key itself is the credential). Health probes and
/// the OpenAPI spec are unauthenticated.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.secret_token.clone(),
    };

    // Issuance requires the shared secret.
    let issue = Router::new()
        .route("/generate_license", post(routes::licenses::generate_license))
        .layer(from_fn(auth::auth_middleware));

    // Open endpoints.
    let open = Router::new()
        .route("/check_license", post(routes::licenses::check_license))
        .route("/", get(home))
        .merge(openapi::router());

    let api = issue
        .merge(open)
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state.clone());

    // Unauthenticated health probes — readiness checks actual service health.
    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// GET / — Welcome text.
async fn home() -> &'static str {
    "Welcome to the License Checking System!"
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the application is ready to serve traffic.
///
/// Checks that the license store is accessible and, when a database pool
/// is configured, that the database answers a trivial query.
///
/// Returns 200 "ready" or 503 with a diagnostic message.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    // Verify the store's lock is acquirable.
    let _ = state.licenses.len();

    // Verify database connection (when configured).
    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!("Database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }

    (StatusCode::OK, "ready").into_response()
}
