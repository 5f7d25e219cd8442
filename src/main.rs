//! Customer Review Insights API server.

use review_insights::config::Config;
use review_insights::logging::init_logging;
use review_insights::server;

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level, &config.log_format);
    tracing::info!("Customer Review Insights API v{}", env!("CARGO_PKG_VERSION"));
    config.warn_missing();

    if let Err(e) = server::run(config).await {
        tracing::error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}
