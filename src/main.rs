use sniper_telemetry::{TelemetryConfig, TelemetryServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        r#"Sniper Telemetry - read-only dashboard API for the sniper bot

USAGE:
    sniper-telemetry [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    HOST                Server host (default: 0.0.0.0)
    PORT                Server port (default: 8080)
    DB_PATH             Path to the bot's SQLite database
    RUST_LOG            Log level filter

EXAMPLES:
    # Run with defaults
    sniper-telemetry

    # Run with config file
    sniper-telemetry --config config.json

    # Point at a different store
    DB_PATH=../pump-sniper-bot/sniper_bot.db sniper-telemetry
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sniper_telemetry=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = if let Some(path) = config_path {
        tracing::info!("Loading configuration from: {}", path);
        TelemetryConfig::from_file(&path)?
    } else {
        TelemetryConfig::default()
    };

    // Environment overrides
    if let Ok(host) = std::env::var("HOST") {
        config.server.host = host;
    }
    if let Ok(port) = std::env::var("PORT") {
        config.server.port = port.parse().unwrap_or(config.server.port);
    }
    if let Ok(db_path) = std::env::var("DB_PATH") {
        config.store_path = db_path.into();
    }

    tracing::info!("Starting telemetry server");
    tracing::info!("Store: {}", config.store_path.display());
    tracing::info!(
        "REST API: http://{}:{}/api/",
        config.server.host,
        config.server.port
    );
    tracing::info!("Available endpoints:");
    tracing::info!("  GET  /api/health");
    tracing::info!("  GET  /api/stats");
    tracing::info!("  GET  /api/positions");
    tracing::info!("  GET  /api/positions/active");
    tracing::info!("  GET  /api/recent-trades");
    tracing::info!("  GET  /api/ai-stream");
    tracing::info!("  POST /api/control/{{start,pause,sell-all}}");

    TelemetryServer::new(config).run().await
}
