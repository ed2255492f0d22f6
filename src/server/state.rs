use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use crate::aggregator::ListeningAggregator;

use super::ServerConfig;

pub type GuardedAggregator = Arc<ListeningAggregator>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub aggregator: GuardedAggregator,
}

impl ServerState {
    pub fn new(config: ServerConfig, aggregator: GuardedAggregator) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            aggregator,
        }
    }
}

impl FromRef<ServerState> for GuardedAggregator {
    fn from_ref(input: &ServerState) -> Self {
        input.aggregator.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
