//! Shared constants for end-to-end tests
//!
//! When fixture data or upstream credentials change, update only this file.
#![allow(dead_code)]

// ============================================================================
// Fixture listening data (mock mode)
// ============================================================================

/// Profile id served by the fixture source
pub const FIXTURE_USER_ID: &str = "mock_user_123";

/// Artists across all three windows, first-seen order
pub const FIXTURE_ARTIST_IDS: [&str; 3] = ["a1", "a2", "a3"];

/// Theme names synthesized from the fixture, in order
pub const FIXTURE_THEME_NAMES: [&str; 5] =
    ["Calm", "Motion", "Curiosity", "Exploration", "Calm"];

// ============================================================================
// Fake upstream
// ============================================================================

/// The only token the fake Spotify API accepts
pub const VALID_UPSTREAM_TOKEN: &str = "valid-token";

/// Profile id returned by the fake Spotify API
pub const UPSTREAM_USER_ID: &str = "upstream_user";

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for the server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Interval between readiness checks (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

/// Request timeout for test client (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
