use clap::Parser;
use gdgate::GatewayConfig;
use gdgate_engines::{EngineKind, Engines};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;

/// GoldenDict website gateway
#[derive(Debug, Parser)]
#[command(name = "gdgate-web", version, about)]
struct Args {
    /// Path to the INI configuration file
    #[arg(short = 'c', long = "config", default_value = "config.ini")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = GatewayConfig::load(&args.config)
        .map_err(|e| format!("Fail to load config file {}: {}", args.config.display(), e))?;

    let engines = Engines::from_config(&config)
        .map_err(|e| format!("Failed to initialize engines: {}", e))?;

    let addr = format!("0.0.0.0:{}", config.default.port);
    info!("📖 GoldenDict website gateway, listening on {}", addr);
    match config.default.proxy_url() {
        Some(proxy) => info!("    - proxy: {}", proxy),
        None => info!("    - proxy: disabled"),
    }
    for kind in EngineKind::ALL {
        if kind == EngineKind::Mock {
            continue;
        }
        let status = if engines.is_enabled(kind) {
            "enabled"
        } else {
            "disabled"
        };
        info!("    - {}: {}", kind, status);
    }

    let app = routes::router(engines);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
