//! swarmhook webhook server.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use swarmhook_api::shutdown::shutdown_signal;
use swarmhook_api::{AppState, routes};
use swarmhook_config::load_daemon_config;
use swarmhook_core::CommandRunner;
use swarmhook_executor::ProcessRunner;
use swarmhook_scheduler::IntervalScheduler;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swarmhook-server")]
#[command(about = "Redeploy Docker Swarm stacks and services on registry pushes", long_about = None)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(long, env = "SWARMHOOK_CONFIG", default_value = "./config.json")]
    config: PathBuf,

    /// Address to listen on
    #[arg(long, env = "SWARMHOOK_LISTEN", default_value = "127.0.0.1:8081")]
    listen: SocketAddr,

    /// Directory deployment and interval commands run from (defaults to the cwd)
    #[arg(long, env = "SWARMHOOK_WORKDIR")]
    workdir: Option<PathBuf>,

    /// Log output format
    #[arg(long, env = "SWARMHOOK_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match args.log_format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }

    // Configuration is all-or-nothing: a bad file stops startup.
    info!(path = %args.config.display(), "Loading configuration");
    let config = load_daemon_config(&args.config).inspect_err(|e| {
        error!(path = %args.config.display(), error = %e, "Invalid configuration");
    })?;
    info!(
        routes = config.routes.len(),
        intervals = config.intervals.len(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;

    let runner: Arc<dyn CommandRunner> = match &args.workdir {
        Some(dir) => Arc::new(ProcessRunner::with_working_dir(dir)),
        None => Arc::new(ProcessRunner::new()),
    };

    // Start interval jobs
    let scheduler = IntervalScheduler::new(runner.clone());
    scheduler.start(config.intervals).await?;

    // Build router
    let state = AppState::new(Arc::new(config.routes), runner);
    let app = routes::router(state).layer(TraceLayer::new_for_http());

    // Start server
    info!("Starting server on {}", args.listen);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    info!("Server stopped accepting requests");
    scheduler.stop().await;
    info!("Shutdown complete");

    served?;
    Ok(())
}
