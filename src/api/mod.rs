use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use std::sync::{Arc, RwLock};

pub mod handlers;
pub mod responses;

pub fn router(state: Arc<RwLock<AppState>>) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/garages", get(handlers::list_garages))
        .route("/api/garages/{id}/history", get(handlers::get_history))
        .route("/api/garages/{id}/prediction", get(handlers::get_prediction))
        .route("/api/feed", post(handlers::post_feed))
        .with_state(state)
}
