use axum::{Extension, Router};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

use crate::app::middleware::auth::JwtAuthenticator;
use crate::bootstrap::{cors_layer, database};
use crate::config::AppConfig;

/// A fully wired application: configuration, its own database pool and
/// token manager, and the router serving them.
///
/// Nothing here is shared with other `Application`s; two instances built from
/// the same config only share whatever the database URL points at.
#[derive(Clone)]
pub struct Application {
    config: AppConfig,
    database: DatabaseConnection,
    router: Router,
}

impl Application {
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn database(&self) -> &DatabaseConnection {
        &self.database
    }

    /// A handle to the router, cheap to clone for tests or `axum::serve`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn into_router(self) -> Router {
        self.router
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        crate::bootstrap::init_server(self).await
    }
}

/// Builds one application instance.
///
/// Steps run in a fixed order: the config is validated, the database and
/// token manager are bound, the auth route group is attached, then the schema
/// is created if missing.
pub async fn create_app(config: AppConfig) -> anyhow::Result<Application> {
    config.validate()?;

    tracing::debug!(
        environment = ?config.environment,
        origins = ?config.cors_origins,
        "building application"
    );

    let database = database::connect(&config).await?;
    let authenticator = JwtAuthenticator::new(database.clone(), &config);
    tracing::debug!("extensions bound");

    let router = crate::routes::routes()
        .layer(Extension(database.clone()))
        .layer(Extension(authenticator))
        .layer(cors_layer(&config)?)
        .layer(TraceLayer::new_for_http());
    tracing::debug!("routes registered");

    database::create_all(&database).await?;

    tracing::info!("application ready");

    Ok(Application { config, database, router })
}
