//! HTTP server for the SPaT signal dashboard.
//!
//! Serves reconciled signal countdowns for an intersection and a
//! nearby-intersection finder over a small JSON API.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use spat_dashboard::{
    api::{AppState, app},
    infra::tdata::{DEFAULT_PHASE_ENDPOINT, DEFAULT_TIMING_ENDPOINT, TDataClient},
    meta::{IntersectionMeta, META_FILE_CANDIDATES},
    services::signal_api::SignalApi,
};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser, Debug)]
#[command(name = "spat_dashboard")]
#[command(about = "Serves reconciled V2X signal countdowns", long_about = None)]
struct Cli {
    /// Address to bind the HTTP server to (host:port)
    #[arg(long, env = "SPAT_BIND", default_value = "0.0.0.0:3000")]
    bind: String,

    /// API key for the t-data gateway; /api/spat answers 400 without it
    #[arg(long, env = "TDATA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Directory holding itst-meta.json or data.json
    #[arg(long, env = "ITST_META_DIR", default_value = "data")]
    meta_dir: PathBuf,

    /// Remaining-time endpoint
    #[arg(long, env = "TDATA_TIMING_ENDPOINT", default_value = DEFAULT_TIMING_ENDPOINT)]
    timing_endpoint: String,

    /// Phase status endpoint
    #[arg(long, env = "TDATA_PHASE_ENDPOINT", default_value = DEFAULT_PHASE_ENDPOINT)]
    phase_endpoint: String,

    /// Rows requested per upstream page
    #[arg(long, default_value_t = 10)]
    num_rows: u32,

    /// Rewrite the metadata directory's source as a compact itst-meta.json and exit
    #[arg(long)]
    compact_meta: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/spat_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("spat_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    if cli.compact_meta {
        let meta = IntersectionMeta::load(&cli.meta_dir)?;
        meta.write_compact(cli.meta_dir.join(META_FILE_CANDIDATES[0]))?;
        return Ok(());
    }

    let meta = IntersectionMeta::load_or_empty(&cli.meta_dir);
    info!(meta_dir = %cli.meta_dir.display(), intersections = meta.len(), "Intersection metadata ready");

    let signals: Option<Arc<dyn SignalApi>> = match cli.api_key.filter(|k| !k.trim().is_empty()) {
        Some(key) => {
            let client = TDataClient::new(key.trim().to_string())?
                .with_endpoints(cli.timing_endpoint, cli.phase_endpoint)
                .with_num_of_rows(cli.num_rows);
            Some(Arc::new(client))
        }
        None => {
            warn!("TDATA_API_KEY not set, /api/spat will reject requests");
            None
        }
    };

    let state = AppState {
        signals,
        meta: Arc::new(meta),
    };

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
