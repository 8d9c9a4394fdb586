use axum::Extension;
use budget_tracker_core::response::CoreResponse;

use crate::app::middleware::auth::AuthUser;
use crate::app::response::{DashboardResponse, DashboardResult, UserResponse};

/// Routes that require a bearer token. `routes::auth` wraps them in the auth middleware.
pub struct DashboardController;

#[budget_tracker_macros::controller(tag = "auth")]
impl DashboardController {
    #[budget_tracker_macros::get("/dashboard")]
    #[budget_tracker_macros::utoipa_response(response = DashboardResult)]
    pub async fn dashboard(Extension(user): Extension<AuthUser>) -> DashboardResult {
        tracing::debug!(user_id = user.id, "dashboard requested");

        CoreResponse::Ok(DashboardResponse {
            message: format!("Welcome to your dashboard, {}!", user.username),
            user: UserResponse::from(user),
        })
    }
}
