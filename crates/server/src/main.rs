use std::process;

use folio_server::{config::Config, start_server};
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Environment misconfigured: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = start_server(config).await {
        error!("Server failed: {e}");
        process::exit(1);
    }
}
