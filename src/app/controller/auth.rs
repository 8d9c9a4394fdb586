use axum::{Extension, Json};
use budget_tracker_core::auth::Authenticator;
use budget_tracker_core::response::CoreResponse;
use sea_orm::DatabaseConnection;

use crate::app::middleware::auth::{AuthUser, InvalidCredentials, JwtAuthenticator};
use crate::app::response::{AuthResponse, AuthResult, SimpleResponse, UserResponse};
use crate::app::service::account::{self, AccountError, NewAccount};

/// Missing fields deserialize as empty and are rejected with the blank-field `400`.
#[derive(Debug, Default, serde::Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, serde::Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AuthController;

#[budget_tracker_macros::controller(tag = "auth")]
impl AuthController {
    #[budget_tracker_macros::post("/signup")]
    #[budget_tracker_macros::utoipa_response(response = AuthResult)]
    pub async fn signup(
        Extension(db): Extension<DatabaseConnection>,
        Extension(authenticator): Extension<JwtAuthenticator>,
        Json(request): Json<SignupRequest>,
    ) -> AuthResult {
        let account = NewAccount {
            email: request.email,
            username: request.username,
            password: request.password,
        };

        let user = match account::register(&db, account).await {
            Ok(model) => AuthUser::from(model),
            Err(err @ AccountError::Invalid(_)) => {
                return CoreResponse::BadRequest(SimpleResponse::new(err.to_string()));
            }
            Err(err @ (AccountError::EmailTaken | AccountError::UsernameTaken)) => {
                return CoreResponse::Conflict(SimpleResponse::new(err.to_string()));
            }
            Err(err) => {
                tracing::error!("signup failed: {:?}", err);
                return internal_error();
            }
        };

        match issue(&authenticator, user).await {
            Some(response) => CoreResponse::Created(response),
            None => internal_error(),
        }
    }

    #[budget_tracker_macros::post("/login")]
    #[budget_tracker_macros::utoipa_response(response = AuthResult)]
    pub async fn login(
        Extension(authenticator): Extension<JwtAuthenticator>,
        Json(request): Json<LoginRequest>,
    ) -> AuthResult {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return CoreResponse::BadRequest(SimpleResponse::new("email and password are required"));
        }

        let user = match authenticator.attempt(request.email, request.password).await {
            Ok(user) => user,
            Err(err) if err.is::<InvalidCredentials>() => {
                return CoreResponse::Unauthorized(SimpleResponse::new("Invalid credentials"));
            }
            Err(err) => {
                tracing::error!("login failed: {:?}", err);
                return internal_error();
            }
        };

        match issue(&authenticator, user).await {
            Some(response) => CoreResponse::Ok(response),
            None => internal_error(),
        }
    }
}

async fn issue(authenticator: &JwtAuthenticator, user: AuthUser) -> Option<AuthResponse> {
    let access_token = match authenticator.generate_token(&user).await {
        Ok(token) => token,
        Err(err) => {
            tracing::error!("cannot sign access token for user {}: {:?}", user.id, err);
            return None;
        }
    };

    Some(AuthResponse {
        access_token,
        token_type: "Bearer".into(),
        expires_in: authenticator.token_lifetime().as_secs(),
        user: UserResponse::from(user),
    })
}

fn internal_error() -> AuthResult {
    CoreResponse::InternalServerError(SimpleResponse::new("internal server error"))
}
