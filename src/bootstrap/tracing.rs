
pub async fn init_tracing(){
    // RUST_LOG wins; "info" otherwise. `try_init` so tests and repeated calls don't panic.
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&default_level)),
        )
        .try_init();
}
