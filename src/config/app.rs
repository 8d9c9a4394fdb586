use std::time::Duration;

use budget_tracker_core::config::ConfigBuilder;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SECRET_KEY: &str = "your-secret-key-change-in-production";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://budget_tracker.db?mode=rwc";
pub const DEFAULT_JWT_SECRET_KEY: &str = "jwt-secret-string-change-in-production";
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 15 * 60;
pub const MAX_TOKEN_LIFETIME_SECS: u64 = 30 * 24 * 60 * 60;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub environment: Environment,
    pub secret_key: String,
    pub database_url: String,
    /// Log every SQL statement sea-orm sends. Off unless asked for.
    pub database_log_statements: bool,
    pub jwt_secret_key: String,
    pub token_lifetime: Duration,
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: DEFAULT_PORT,
            environment: Environment::Development,
            secret_key: DEFAULT_SECRET_KEY.into(),
            database_url: DEFAULT_DATABASE_URL.into(),
            database_log_statements: false,
            jwt_secret_key: DEFAULT_JWT_SECRET_KEY.into(),
            token_lifetime: Duration::from_secs(DEFAULT_TOKEN_LIFETIME_SECS),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.into()],
        }
    }
}

impl AppConfig {
    /// Same settings as [`AppConfig::default`] against another database.
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        AppConfig {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// Builds the configuration from any key lookup, `std::env::var` in production.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            _ => Environment::Development,
        };

        let port = lookup("SERVER_PORT")
            .unwrap_or_else(|| {
                tracing::warn!("cannot read `SERVER_PORT` defaulting to `{}`", DEFAULT_PORT);

                DEFAULT_PORT.to_string()
            })
            .parse()
            .unwrap_or_else(|err| {
                tracing::error!("cannot parse `SERVER_PORT`. defaulting to {} {:?}", DEFAULT_PORT, err);
                DEFAULT_PORT
            });

        let secret_key = lookup("SECRET_KEY");

        // An explicit SECRET_KEY also signs tokens unless JWT_SECRET_KEY overrides it.
        let jwt_secret_key = lookup("JWT_SECRET_KEY")
            .or_else(|| secret_key.clone())
            .unwrap_or_else(|| DEFAULT_JWT_SECRET_KEY.into());

        let secret_key = secret_key.unwrap_or_else(|| DEFAULT_SECRET_KEY.into());

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            tracing::warn!("cannot read `DATABASE_URL` defaulting to `{}`", DEFAULT_DATABASE_URL);

            DEFAULT_DATABASE_URL.into()
        });

        let database_log_statements = match lookup("DATABASE_LOG_STATEMENTS") {
            Some(value) => parse_flag(&value).unwrap_or_else(|| {
                tracing::error!("cannot parse `DATABASE_LOG_STATEMENTS`: `{}`. defaulting to false", value);
                false
            }),
            None => false,
        };

        let token_lifetime = lookup("JWT_ACCESS_TOKEN_EXPIRES")
            .map(|value| {
                value.parse::<u64>().unwrap_or_else(|err| {
                    tracing::error!(
                        "cannot parse `JWT_ACCESS_TOKEN_EXPIRES`. defaulting to {} {:?}",
                        DEFAULT_TOKEN_LIFETIME_SECS,
                        err
                    );
                    DEFAULT_TOKEN_LIFETIME_SECS
                })
            })
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TOKEN_LIFETIME_SECS));

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_else(|| vec![DEFAULT_CORS_ORIGIN.into()]);

        let config = AppConfig {
            port,
            environment,
            secret_key,
            database_url,
            database_log_statements,
            jwt_secret_key,
            token_lifetime,
            cors_origins,
        };

        config.validate()?;

        Ok(config)
    }

    /// Checks invariants `from_lookup` enforces; also run on hand-built configs by `create_app`.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt_secret_key.is_empty() {
            anyhow::bail!("`JWT_SECRET_KEY` must not be empty");
        }

        let lifetime = self.token_lifetime.as_secs();
        if lifetime == 0 || lifetime > MAX_TOKEN_LIFETIME_SECS {
            anyhow::bail!(
                "`JWT_ACCESS_TOKEN_EXPIRES` must be between 1 and {} seconds, got {}",
                MAX_TOKEN_LIFETIME_SECS,
                lifetime
            );
        }

        if self.environment == Environment::Production {
            if self.secret_key == DEFAULT_SECRET_KEY {
                anyhow::bail!("`SECRET_KEY` must be changed from its default in production");
            }
            if self.jwt_secret_key == DEFAULT_JWT_SECRET_KEY {
                anyhow::bail!("`JWT_SECRET_KEY` must be changed from its default in production");
            }
        } else if self.secret_key == DEFAULT_SECRET_KEY || self.jwt_secret_key == DEFAULT_JWT_SECRET_KEY {
            tracing::warn!("running with a default secret key, set `SECRET_KEY` and `JWT_SECRET_KEY`");
        }

        Ok(())
    }
}

impl ConfigBuilder for AppConfig {
    fn build() -> anyhow::Result<Self> {
        AppConfig::from_lookup(|key| std::env::var(key).ok())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
