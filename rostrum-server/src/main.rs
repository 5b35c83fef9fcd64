use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rostrum_core::{Analyzer, RostrumConfig};
use tokio::sync::{broadcast, RwLock};
use tracing_subscriber::{fmt, EnvFilter};

use rostrum_server::http::{self, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "rostrum.toml")]
    config: String,

    /// Validate config and snapshot, print a summary, then exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience — production uses real env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Init logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    // Load config
    let config = match RostrumConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Load the snapshot. This is the one fatal failure: without a readable
    // snapshot there is nothing to serve.
    let snapshot_path = PathBuf::from(&config.snapshot.path);
    let analyzer = match Analyzer::from_snapshot(&snapshot_path) {
        Ok(a) => a,
        Err(e) => {
            eprintln!(
                "Failed to load snapshot from {}: {}",
                snapshot_path.display(),
                e
            );
            eprintln!("Run `rostrum-cli refresh` (or POST /api/refresh) after seeding a snapshot.");
            std::process::exit(1);
        }
    };

    if args.check {
        println!("✅ Config loaded from {}", args.config);
        println!(
            "✅ Snapshot OK: {} talks from {}",
            analyzer.len(),
            snapshot_path.display()
        );
        return Ok(());
    }

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    let state = Arc::new(AppState {
        config,
        analyzer: RwLock::new(analyzer),
    });

    http::start_http_server(state, tx.subscribe()).await?;

    Ok(())
}
