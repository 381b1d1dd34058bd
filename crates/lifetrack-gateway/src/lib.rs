//! LifeTrack HTTP/JSON Gateway.
//!
//! Exposes the LifeTrack service over a small REST API. Callers identify
//! themselves with the `x-lifetrack-user` header; resolving that header to
//! an acting user is the only authentication the gateway performs.

pub mod config;
pub mod error;
pub mod extract;
pub mod json;
pub mod routes;

pub use config::{Args, GatewayConfig};
pub use error::AppError;

use axum::Router;
use lifetrack_core::LifeTrack;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// LifeTrack service.
    pub service: LifeTrack,
}

impl AppState {
    /// Create new application state.
    pub fn new(service: LifeTrack) -> Self {
        Self { service }
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::users::routes())
        .merge(routes::catalog::routes())
        .merge(routes::templates::routes())
        .merge(routes::entries::routes())
        .merge(routes::profile::routes())
        .merge(routes::admin::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
