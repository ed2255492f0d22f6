mod file_config;

pub use file_config::{CacheConfig, FileConfig, SpotifyConfig};

use crate::aggregator::AggregatorSettings;
use crate::server::RequestsLoggingLevel;
use crate::spotify::DEFAULT_SPOTIFY_API_BASE;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub mock_mode: bool,
    pub spotify_api_base: String,
    pub spotify_timeout_sec: u64,
    pub cache_ttl_sec: u64,
    pub cache_max_entries: usize,
    pub cache_prune_interval_sec: u64,
    pub frontend_dir_path: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: 5173,
            metrics_port: 9092,
            logging_level: RequestsLoggingLevel::default(),
            mock_mode: false,
            spotify_api_base: DEFAULT_SPOTIFY_API_BASE.to_string(),
            spotify_timeout_sec: 30,
            cache_ttl_sec: 60,
            cache_max_entries: 1024,
            cache_prune_interval_sec: 300,
            frontend_dir_path: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    /// Serve fixture listening data and accept requests without a token.
    pub mock_mode: bool,
    pub frontend_dir_path: Option<String>,

    pub spotify: SpotifySettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotifySettings {
    pub api_base: String,
    pub timeout_sec: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub ttl_sec: u64,
    pub max_entries: usize,
    pub prune_interval_sec: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        if port == metrics_port && port != 0 {
            bail!("port and metrics_port must differ (both are {})", port);
        }

        let logging_level = match file.logging_level {
            Some(s) => match parse_logging_level(&s) {
                Some(level) => level,
                None => bail!("Invalid logging_level in config file: {:?}", s),
            },
            None => cli.logging_level.clone(),
        };

        let mock_mode = file.mock_mode.unwrap_or(cli.mock_mode);
        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let spotify_file = file.spotify.unwrap_or_default();
        let spotify = SpotifySettings {
            api_base: spotify_file
                .api_base
                .unwrap_or_else(|| cli.spotify_api_base.clone())
                .trim_end_matches('/')
                .to_string(),
            timeout_sec: spotify_file.timeout_sec.unwrap_or(cli.spotify_timeout_sec),
        };
        if spotify.api_base.is_empty() {
            bail!("spotify api_base must not be empty");
        }
        if spotify.timeout_sec == 0 {
            bail!("spotify timeout_sec must be greater than zero");
        }

        let cache_file = file.cache.unwrap_or_default();
        let cache = CacheSettings {
            ttl_sec: cache_file.ttl_sec.unwrap_or(cli.cache_ttl_sec),
            max_entries: cache_file.max_entries.unwrap_or(cli.cache_max_entries),
            prune_interval_sec: cache_file
                .prune_interval_sec
                .unwrap_or(cli.cache_prune_interval_sec),
        };
        if cache.ttl_sec == 0 {
            bail!("cache ttl_sec must be greater than zero");
        }
        if cache.max_entries == 0 {
            bail!("cache max_entries must be greater than zero");
        }
        if cache.prune_interval_sec == 0 {
            bail!("cache prune_interval_sec must be greater than zero");
        }

        Ok(Self {
            port,
            metrics_port,
            logging_level,
            mock_mode,
            frontend_dir_path,
            spotify,
            cache,
        })
    }

    pub fn aggregator_settings(&self) -> AggregatorSettings {
        AggregatorSettings {
            cache_ttl: Duration::from_secs(self.cache.ttl_sec),
            cache_max_entries: self.cache.max_entries,
            prune_interval: Duration::from_secs(self.cache.prune_interval_sec),
        }
    }

    pub fn spotify_timeout(&self) -> Duration {
        Duration::from_secs(self.spotify.timeout_sec)
    }

    pub fn frontend_dir(&self) -> Option<PathBuf> {
        self.frontend_dir_path.as_ref().map(PathBuf::from)
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
