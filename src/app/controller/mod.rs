mod auth;
mod dashboard;

pub use auth::{AuthController, AuthControllerApi, LoginRequest, SignupRequest};
pub use dashboard::{DashboardController, DashboardControllerApi};
