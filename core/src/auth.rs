use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};

/// A user that can be looked up by a login identifier and checked against a secret.
pub trait AuthenticatableUser {
    /// What the user types to log in (an email address, a username...).
    type Identifier;
    /// The stored secret, usually a password hash.
    type Password;
    type Id;

    fn get_identifier(&self) -> Self::Identifier;
    fn get_password(&self) -> Self::Password;
    fn get_id(&self) -> Self::Id;
}

pub trait Authenticator<T>
where
    T: AuthenticatableUser,
{
    type Token;

    /// Resolve credentials to a user, failing when they do not match.
    fn attempt(
        &self,
        identifier: T::Identifier,
        password: String,
    ) -> impl std::future::Future<Output = anyhow::Result<T>> + Send;
    fn generate_token(&self, user: &T) -> impl std::future::Future<Output = Self::Token> + Send;

    fn verify_header_name(&self) -> &'static str;

    /// Pull the raw token out of the header value. The whole value by default.
    fn extract_token<'a>(&self, header: &'a str) -> Option<&'a str> {
        Some(header)
    }

    fn verify(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<T, StatusCode>> + Send;
}

/// Rejects requests without a valid token and stores the resolved user in the
/// request extensions.
///
/// The authenticator itself is expected as a request extension, so an
/// `Extension` layer must wrap the router this middleware is attached to.
#[tracing::instrument(level = "debug", skip(request, next))]
pub async fn auth_middleware<T, R>(mut request: Request, next: Next) -> Result<Response, StatusCode>
where
    T: Authenticator<R> + Send + Sync + 'static,
    R: AuthenticatableUser + Send + Sync + Clone + 'static,
{
    let Some(authenticator) = request.extensions().get::<T>() else {
        tracing::error!("no Authenticator Extension available");

        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    };

    let Some(header) = request.headers().get(authenticator.verify_header_name()) else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(token) = authenticator.extract_token(header) else {
        tracing::debug!("malformed authentication header");

        return Err(StatusCode::UNAUTHORIZED);
    };

    let user = authenticator.verify(token).await?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
