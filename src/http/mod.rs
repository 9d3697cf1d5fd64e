//! REST surface: axum router and shared handler state.

pub mod dto;
pub mod handlers;

use crate::acta::ActaRenderer;
use crate::auth::CredentialCheck;
use crate::db::Pool;
use axum::routing::{get, post};
use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub pool: Pool,
    pub acta: Arc<dyn ActaRenderer>,
    pub credentials: Arc<dyn CredentialCheck>,
}

/// Build the application router. Handlers receive `AppState` via extension.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/login", post(handlers::login))
        .route("/api/users", post(handlers::create_worker))
        .route("/api/users/{dni}", get(handlers::get_worker))
        .route("/api/deliveries", post(handlers::create_delivery))
        .route("/api/deliveries/{id}/acta", get(handlers::get_delivery_acta))
        .route("/api/deliveries/report", get(handlers::delivery_report))
        .route("/api/laundry", post(handlers::register_shipment))
        .route("/api/laundry/{key}/status", get(handlers::laundry_status))
        .route("/api/laundry/return", post(handlers::register_return))
        .route("/api/laundry/report", get(handlers::laundry_report))
        .route(
            "/api/uniform-returns",
            post(handlers::create_uniform_return),
        )
        .route(
            "/api/uniform-returns/report",
            get(handlers::uniform_return_report),
        )
        .route("/api/stats", get(handlers::stats))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
