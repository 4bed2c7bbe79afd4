use invoice_analyzer::config::Config;
use invoice_analyzer::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (cfg, source) = Config::resolve(std::env::args().nth(1))?;

    // init tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.server.log_filter));
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter(filter)
        .init();

    info!(
        config = source.as_deref().unwrap_or("<defaults>"),
        bind_addr = %cfg.server.bind_addr,
        max_upload_bytes = cfg.server.max_upload_bytes,
        analyze_timeout_secs = cfg.server.analyze_timeout_secs,
        strategy = ?cfg.tables.strategy,
        "Starting FinSight invoice analyzer"
    );

    server::start_server(&cfg).await?;
    Ok(())
}
