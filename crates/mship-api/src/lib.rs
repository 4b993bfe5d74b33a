//! # mship-api — Axum HTTP Service for the Shipment Stack
//!
//! The service layer over the shipment engine and the shipment
//! manager. All state is in-memory, behind `parking_lot` locks; every
//! privileged mutation carries a role proof that the domain layer
//! verifies.
//!
//! ## API Surface
//!
//! | Prefix            | Module                 | Domain              |
//! |--------------------|-----------------------|---------------------|
//! | `/v1/shipments/*` | [`routes::shipments`] | Shipment engine     |
//! | `/v1/rules/*`     | [`routes::shipments`] | Phase rule lookups  |
//! | `/v1/orders/*`    | [`routes::orders`]    | Shipment manager    |
//!
//! Health probes (`/health/*`) are mounted alongside.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and
/// middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::shipments::router())
        .merge(routes::orders::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to
/// serve.
async fn readiness() -> &'static str {
    "ready"
}
