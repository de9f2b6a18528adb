//! Sidekick — background coordinator for the sidebar extension.

use std::path::PathBuf;
use std::sync::Arc;

use sidekick_background::{Coordinator, ResponseEnvelope};
use sidekick_browser::{BrowserHost, CdpHost};
use sidekick_core::{CoordinatorConfig, SidekickConfig};
use sidekick_server::{build_router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn resolve_data_dir() -> PathBuf {
    std::env::var("SIDEKICK_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn print_help() {
    println!("Sidekick — sidebar extension background coordinator");
    println!();
    println!("Usage: sidekick [command]");
    println!();
    println!("Commands:");
    println!("  (none)            Start the relay server");
    println!("  toggle            Toggle the sidebar in the active tab");
    println!("  export-cookies    Export the active tab's cookies to the downloads directory");
    println!("  help              Show this help message");
    println!();
    println!("Environment:");
    println!("  SIDEKICK_DATA_DIR   data directory (default: data)");
    println!("  SIDEKICK_CDP_URL    DevTools endpoint (default: http://127.0.0.1:9222)");
    println!("  PORT                relay port (default: 3017)");
    println!("  RUST_LOG            log filter (default: info)");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str);

    if matches!(command, Some("--help" | "-h" | "help")) {
        print_help();
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = SidekickConfig::from_env(&data_dir)?;
    let mut coordinator_config = CoordinatorConfig::load(&config.data_paths.config_file);

    let host: Arc<dyn BrowserHost> =
        Arc::new(CdpHost::new(&config.cdp_url, &config.data_paths.downloads));
    let (coordinator, _event) = Coordinator::start(host, &mut coordinator_config, VERSION)?;

    match command {
        None => {}
        Some("toggle") => {
            let outcome = coordinator.relay.on_clicked_tab(args.get(2).map(String::as_str)).await;
            println!("{}", serde_json::to_string(&outcome)?);
            return Ok(());
        }
        Some("export-cookies") => {
            let envelope = ResponseEnvelope::from_result(coordinator.exporter.export().await);
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            std::process::exit(if envelope.success { 0 } else { 1 });
        }
        Some(other) => {
            eprintln!("Unknown command: {}. Use 'sidekick help' for usage.", other);
            std::process::exit(1);
        }
    }

    let port = config.port;
    let state = AppState::new(config, coordinator);
    let app = build_router(state);

    // Loopback only: the relay hands out cookies.
    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Sidekick relay listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
