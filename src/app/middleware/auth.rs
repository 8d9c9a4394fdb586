use std::time::Duration;

use axum::http::StatusCode;
use budget_tracker_core::auth::{AuthenticatableUser, Authenticator};
pub use budget_tracker_core::auth::auth_middleware;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};

use crate::app::model::user;
use crate::app::service::password;
use crate::config::AppConfig;

/// The authenticated caller, stored in request extensions by [`auth_middleware`].
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub username: String,
    password_hash: String,
}

impl From<user::Model> for AuthUser {
    fn from(model: user::Model) -> Self {
        AuthUser {
            id: model.id,
            email: model.email,
            username: model.username,
            password_hash: model.password_hash,
        }
    }
}

impl AuthenticatableUser for AuthUser {
    type Identifier = String;
    type Password = String;
    type Id = i32;

    fn get_id(&self) -> Self::Id {
        self.id
    }

    fn get_identifier(&self) -> Self::Identifier {
        self.email.clone()
    }

    fn get_password(&self) -> Self::Password {
        self.password_hash.clone()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid credentials")]
pub struct InvalidCredentials;

/// Issues and checks HS256 access tokens for users stored in `users`.
#[derive(Clone)]
pub struct JwtAuthenticator {
    db: DatabaseConnection,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_lifetime: Duration,
}

impl JwtAuthenticator {
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        let secret = config.jwt_secret_key.as_bytes();

        Self {
            db,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_lifetime: config.token_lifetime,
        }
    }

    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    fn claims_for(&self, user_id: i32) -> anyhow::Result<Claims> {
        let iat = chrono::Utc::now().timestamp().max(0) as u64;

        let exp = iat
            .checked_add(self.token_lifetime.as_secs())
            .ok_or_else(|| anyhow::anyhow!("token lifetime {:?} overflows the expiry claim", self.token_lifetime))?;

        Ok(Claims {
            sub: user_id.to_string(),
            iat,
            exp,
        })
    }

    /// Signature and expiry check only, no database access.
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
    }
}

impl Authenticator<AuthUser> for JwtAuthenticator {
    type Token = anyhow::Result<String>;

    async fn attempt(&self, email: String, password: String) -> anyhow::Result<AuthUser> {
        let Some(model) = user::find_by_email(&self.db, email.trim()).await? else {
            return Err(InvalidCredentials.into());
        };

        let user = AuthUser::from(model);

        if !password::verify_password(&password, &user.get_password())? {
            return Err(InvalidCredentials.into());
        }

        Ok(user)
    }

    async fn generate_token(&self, user: &AuthUser) -> Self::Token {
        let claims = self.claims_for(user.get_id())?;

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)?;

        Ok(token)
    }

    fn verify_header_name(&self) -> &'static str {
        "authorization"
    }

    fn extract_token<'a>(&self, header: &'a str) -> Option<&'a str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    async fn verify(&self, token: &str) -> Result<AuthUser, StatusCode> {
        let claims = self.decode(token).map_err(|err| {
            tracing::debug!("rejected access token: {}", err);
            StatusCode::UNAUTHORIZED
        })?;

        let id: i32 = claims.sub.parse().map_err(|_| StatusCode::UNAUTHORIZED)?;

        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|err| {
                tracing::error!("cannot load user {}: {:?}", id, err);
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(AuthUser::from(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::database;

    async fn authenticator(secret: &str) -> JwtAuthenticator {
        let config = AppConfig {
            jwt_secret_key: secret.into(),
            ..AppConfig::with_database_url("sqlite::memory:")
        };
        let db = database::connect(&config).await.unwrap();

        JwtAuthenticator::new(db, &config)
    }

    fn user(id: i32) -> AuthUser {
        AuthUser {
            id,
            email: "ada@example.com".into(),
            username: "ada".into(),
            password_hash: String::new(),
        }
    }

    #[tokio::test]
    async fn issued_token_carries_subject_and_lifetime() {
        let auth = authenticator("secret").await;
        let token = auth.generate_token(&user(7)).await.unwrap();

        let claims = auth.decode(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.exp - claims.iat, auth.token_lifetime().as_secs());
    }

    #[tokio::test]
    async fn overflowing_lifetime_fails_instead_of_panicking() {
        let mut auth = authenticator("secret").await;
        auth.token_lifetime = Duration::from_secs(u64::MAX);

        assert!(auth.generate_token(&user(1)).await.is_err());
    }

    #[tokio::test]
    async fn token_signed_with_another_key_is_rejected() {
        let issuer = authenticator("one").await;
        let verifier = authenticator("two").await;
        let token = issuer.generate_token(&user(1)).await.unwrap();

        assert!(verifier.decode(&token).is_err());
        assert_eq!(verifier.verify(&token).await.unwrap_err(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let auth = authenticator("secret").await;
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = Claims { sub: "1".into(), iat: now - 7200, exp: now - 3600 };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &auth.encoding_key).unwrap();

        assert!(auth.decode(&token).is_err());
    }

    #[tokio::test]
    async fn only_bearer_scheme_is_accepted() {
        let auth = authenticator("secret").await;

        assert_eq!(auth.extract_token("Bearer abc"), Some("abc"));
        assert_eq!(auth.extract_token("Bearer "), None);
        assert_eq!(auth.extract_token("Basic abc"), None);
        assert_eq!(auth.extract_token("abc"), None);
    }
}
