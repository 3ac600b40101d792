pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::get,
    Router,
};
use config::session::SessionLayer;
use repositories::UserRepository;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub pool: sqlx::SqlitePool,
}

/// Assemble the full route tree. Kept out of `main` so handler tests can
/// drive the real router through `tower::ServiceExt`.
pub fn app(state: AppState, session_layer: SessionLayer) -> Router {
    let protected_routes = Router::new()
        .route("/dashboard", get(auth::handlers::dashboard_handler))
        .layer(axum_middleware::from_fn(auth::middleware::require_auth));

    let anonymous_routes = Router::new()
        .route(
            "/register",
            get(auth::handlers::register_page).post(auth::handlers::register_handler),
        )
        .route(
            "/login",
            get(auth::handlers::login_page).post(auth::handlers::login_handler),
        )
        .layer(axum_middleware::from_fn(
            auth::middleware::redirect_if_authenticated,
        ));

    Router::new()
        .route("/", get(auth::handlers::index_handler))
        .route("/logout", get(auth::handlers::logout_handler))
        .merge(anonymous_routes)
        .merge(protected_routes)
        .layer(session_layer)
        .with_state(state)
}
