//! REST surface: `/api/spat`, `/api/nearby` and `/health`.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{Router, http::Method, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::meta::IntersectionMeta;
use crate::services::signal_api::SignalApi;

pub use error::ApiError;

/// Shared handler state. `signals` is `None` when no API key is configured;
/// `/api/spat` then answers 400 while `/api/nearby` keeps working.
#[derive(Clone)]
pub struct AppState {
    pub signals: Option<Arc<dyn SignalApi>>,
    pub meta: Arc<IntersectionMeta>,
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/spat", get(routes::get_spat))
        .route("/api/nearby", get(routes::get_nearby))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
