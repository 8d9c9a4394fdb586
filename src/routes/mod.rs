use axum::{Router, middleware, routing::get};
use budget_tracker_core::controller::Controller;

use crate::app::controller::{AuthController, DashboardController};
use crate::app::middleware::auth::{AuthUser, JwtAuthenticator, auth_middleware};

/// The authentication route group: `/signup`, `/login` and the token-protected `/dashboard`.
///
/// Expects `DatabaseConnection` and `JwtAuthenticator` extensions to be layered on top.
pub fn auth() -> Router {
    let protected = DashboardController::router()
        .route_layer(middleware::from_fn(auth_middleware::<JwtAuthenticator, AuthUser>));

    Router::new()
        .merge(AuthController::router())
        .merge(protected)
}

pub fn routes() -> Router {
    Router::new()
        .merge(auth())
        .route("/api-docs/openapi.json", get(crate::docs::openapi_json))
}
