//! HTTP API
//!
//! The server exposes the delivery surface only: sending campaign
//! mail plus the open-pixel and click-redirect tracking endpoints the
//! sent messages point back at.

pub mod health;
pub mod mail;
pub mod tracking;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/email/send", post(mail::send_email))
        .route("/api/email/track/{tracking_id}", get(tracking::open_pixel))
        .route("/api/email/click/{tracking_id}", get(tracking::click_redirect))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
