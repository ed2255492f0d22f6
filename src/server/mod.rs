pub mod config;
mod error;
mod http_layers;
mod mail_routes;
mod mcp_routes;
pub mod metrics;
#[allow(clippy::module_inception)]
pub mod server;
pub mod session;
mod spotify_routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use http_layers::*;
pub use server::{make_app, make_metrics_app, run_server};
pub use session::SpotifyAccess;
