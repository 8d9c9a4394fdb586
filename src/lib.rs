pub mod app;
pub mod bootstrap;
pub mod config;
pub mod docs;
pub mod routes;

pub use bootstrap::{Application, create_app};
pub use config::AppConfig;
