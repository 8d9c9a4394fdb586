use budget_tracker::{bootstrap, config::AppConfig, docs};
use budget_tracker_core::config::ConfigBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrap::init_base().await;

    // `budget_tracker docs [path]` writes the OpenAPI document and exits.
    let mut args = std::env::args().skip(1);
    if args.next().as_deref() == Some("docs") {
        let path = args.next().unwrap_or_else(|| "api.json".into());

        return docs::generate_docs(path).await;
    }

    let config = AppConfig::build()?;

    let app = bootstrap::create_app(config).await?;

    app.serve().await
}
