//! Presence Node - HTTP service for presence checks
//!
//! This binary exposes the presence core over a JSON API:
//! - Geofence and distance checks against the configured office
//! - Fake-location detection for device location fixes
//! - Full presence-mark evaluation producing the outbound attendance request

mod server;

use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use presence_core::config::{LogFormat, LogLevel, LoggingConfig};
use presence_core::{PresenceConfig, PresenceGate};

#[derive(Parser)]
#[command(name = "presence-node")]
#[command(about = "Geofenced presence checks with fake-location detection")]
struct Args {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// HTTP server port (0 = auto-assign), overrides the config file
    #[arg(long)]
    http_port: Option<u16>,

    /// JSON file with the remote office settings record, replaces the
    /// configured office and start time
    #[arg(long)]
    office_settings: Option<PathBuf>,

    /// Display name for this node, overrides the config file
    #[arg(long, short)]
    name: Option<String>,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

/// Application state shared across handlers
pub struct AppState {
    /// Loaded configuration
    pub config: PresenceConfig,
    /// Gate built from the configuration
    pub gate: PresenceGate,
    /// Number of authenticity and presence evaluations served
    pub evaluations: AtomicU64,
    /// Node start time
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: PresenceConfig) -> Self {
        Self {
            gate: config.gate(),
            config,
            evaluations: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }
}

fn init_logging(logging: &LoggingConfig, verbose: bool) -> anyhow::Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        match logging.level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    };

    let builder = FmtSubscriber::builder().with_max_level(level);
    match logging.format {
        LogFormat::Full => tracing::subscriber::set_global_default(builder.finish())?,
        LogFormat::Compact => tracing::subscriber::set_global_default(builder.compact().finish())?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PresenceConfig::load(path)?,
        None => PresenceConfig::default(),
    };
    if let Some(port) = args.http_port {
        config.server.http_port = port;
    }
    if let Some(name) = args.name {
        config.server.name = name;
    }

    init_logging(&config.logging, args.verbose)?;

    if let Some(path) = &args.office_settings {
        config.apply_remote_file(path)?;
    }

    info!("Starting Presence Node: {}", config.server.name);
    info!(
        "Office geofence: {} at ({}, {}), radius {}m",
        config.office.name,
        config.office.center.latitude,
        config.office.center.longitude,
        config.office.max_radius_m
    );
    info!("Working day starts at {}", config.start_time);
    info!(
        "Fake-GPS block list: {} packages",
        config.authenticity.spoofing_apps.packages().len()
    );

    let bind_addr = format!("{}:{}", config.server.bind_address, config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    // Get the actual bound address (important when port was 0)
    let actual_port = listener.local_addr()?.port();

    info!("═══════════════════════════════════════════════════════════");
    info!("  Presence API listening on http://127.0.0.1:{}", actual_port);
    info!("  REST API: http://127.0.0.1:{}/api/", actual_port);
    info!("═══════════════════════════════════════════════════════════");

    let state = Arc::new(AppState::new(config));
    let app = server::create_router(state);
    axum::serve(listener, app).await?;

    Ok(())
}
