mod service;

pub use service::{AggregatorSettings, ListeningAggregator, DEFAULT_PRUNE_INTERVAL};
