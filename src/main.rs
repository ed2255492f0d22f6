use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use orbit_server::config::{AppConfig, CliConfig, FileConfig};
use orbit_server::server::{metrics, run_server, RequestsLoggingLevel, ServerConfig};
use orbit_server::spotify::{
    FixtureMusicSource, MusicSource, SpotifyWebClient, DEFAULT_SPOTIFY_API_BASE,
};
use orbit_server::ListeningAggregator;

#[derive(Parser, Debug)]
#[command(name = "orbit-server", version)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the CLI arguments.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 5173)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9092)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Serve fixture listening data; requests without a token are accepted.
    #[clap(long)]
    pub mock_mode: bool,

    /// Base URL of the Spotify Web API.
    #[clap(long, default_value = DEFAULT_SPOTIFY_API_BASE)]
    pub spotify_api_base: String,

    /// Timeout in seconds for Spotify requests.
    #[clap(long, default_value_t = 30)]
    pub spotify_timeout_sec: u64,

    /// How long a consolidated snapshot stays cached, in seconds.
    #[clap(long, default_value_t = 60)]
    pub cache_ttl_sec: u64,

    /// Maximum number of cached snapshots.
    #[clap(long, default_value_t = 1024)]
    pub cache_max_entries: usize,

    /// Interval in seconds between expired-snapshot pruning runs.
    #[clap(long, default_value_t = 300)]
    pub cache_prune_interval_sec: u64,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            port: self.port,
            metrics_port: self.metrics_port,
            logging_level: self.logging_level.clone(),
            mock_mode: self.mock_mode,
            spotify_api_base: self.spotify_api_base.clone(),
            spotify_timeout_sec: self.spotify_timeout_sec,
            cache_ttl_sec: self.cache_ttl_sec,
            cache_max_entries: self.cache_max_entries,
            cache_prune_interval_sec: self.cache_prune_interval_sec,
            frontend_dir_path: self.frontend_dir_path.clone(),
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}...", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Initializing metrics...");
    metrics::init_metrics();

    let source: Arc<dyn MusicSource> = if config.mock_mode {
        info!("Mock mode enabled, serving fixture listening data");
        Arc::new(FixtureMusicSource::new())
    } else {
        info!("Using Spotify Web API at {}", config.spotify.api_base);
        Arc::new(SpotifyWebClient::new(
            config.spotify.api_base.clone(),
            config.spotify_timeout(),
        )?)
    };

    let aggregator = Arc::new(ListeningAggregator::new(
        source,
        config.aggregator_settings(),
    ));
    aggregator.start();

    let result = run_server(
        ServerConfig::from(&config),
        aggregator.clone(),
        shutdown_signal(),
    )
    .await;

    aggregator.shutdown().await;
    info!("Bye");
    result
}
