use super::RequestsLoggingLevel;
use crate::config::AppConfig;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub metrics_port: u16,
    pub frontend_dir_path: Option<String>,
    /// If true, requests without an access token fall back to
    /// [`MOCK_ACCESS_TOKEN`](super::session::MOCK_ACCESS_TOKEN).
    pub mock_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            logging_level: RequestsLoggingLevel::Path,
            port: 5173,
            metrics_port: 9092,
            frontend_dir_path: None,
            mock_mode: false,
        }
    }
}

impl From<&AppConfig> for ServerConfig {
    fn from(config: &AppConfig) -> Self {
        ServerConfig {
            logging_level: config.logging_level.clone(),
            port: config.port,
            metrics_port: config.metrics_port,
            frontend_dir_path: config.frontend_dir_path.clone(),
            mock_mode: config.mock_mode,
        }
    }
}
