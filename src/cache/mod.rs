mod consolidated_cache;

pub use consolidated_cache::{ConsolidatedCache, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL};
