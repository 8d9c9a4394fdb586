use std::net::SocketAddr;

use anyhow::Context;

use super::Application;

pub async fn init_server(app: Application) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], app.config().port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app.into_router())
        .await
        .context("server stopped unexpectedly")?;

    Ok(())
}
