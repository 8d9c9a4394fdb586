mod cors;
pub mod database;
mod env;
mod factory;
mod server;
mod tracing;

pub use cors::cors_layer;
pub use factory::{Application, create_app};
pub use server::init_server;

pub async fn init_base() {
    let env = env::init_env().await;
    tracing::init_tracing().await;

    match env {
        Ok(Some(path)) => ::tracing::info!("loaded environment from {}", path.display()),
        Ok(None) => ::tracing::debug!("no `.env` file found"),
        Err(err) => ::tracing::warn!("cannot load `.env`: {}", err),
    }
}
