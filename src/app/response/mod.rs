use budget_tracker_core::response::CoreResponse;

use crate::app::middleware::auth::AuthUser;
use crate::app::model::user;

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct SimpleResponse {
    pub message: String
}

impl SimpleResponse {
    pub fn new(message: impl Into<String>) -> Self {
        SimpleResponse { message: message.into() }
    }
}

/// Public view of a user. Never carries the password hash.
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        UserResponse { id: model.id, email: model.email, username: model.username }
    }
}

impl From<AuthUser> for UserResponse {
    fn from(user: AuthUser) -> Self {
        UserResponse { id: user.id, email: user.email, username: user.username }
    }
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until `access_token` expires.
    pub expires_in: u64,
    pub user: UserResponse,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct DashboardResponse {
    pub message: String,
    pub user: UserResponse,
}

pub type AuthResult = CoreResponse<AuthResponse, SimpleResponse>;

pub type DashboardResult = CoreResponse<DashboardResponse, SimpleResponse>;
