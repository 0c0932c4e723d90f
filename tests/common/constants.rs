//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When fixture data changes, update only this file.

// ============================================================================
// Fixed Clock
// ============================================================================

/// The instant every test server considers to be "now" (RFC 3339).
pub const TEST_NOW: &str = "2025-01-01T00:00:00Z";

// ============================================================================
// Fixture Venues (ids follow insertion order)
// ============================================================================

pub const VENUE_HOP_ID: i64 = 1;
pub const VENUE_HOP_NAME: &str = "The Musical Hop";

pub const VENUE_PARK_ID: i64 = 2;
pub const VENUE_PARK_NAME: &str = "Park Square Live Music & Coffee";

pub const VENUE_PIANOS_ID: i64 = 3;
pub const VENUE_PIANOS_NAME: &str = "The Dueling Pianos Bar";

// ============================================================================
// Fixture Artists
// ============================================================================

pub const ARTIST_PETALS_ID: i64 = 1;
pub const ARTIST_PETALS_NAME: &str = "Guns N Petals";

pub const ARTIST_QUEVEDO_ID: i64 = 2;
pub const ARTIST_QUEVEDO_NAME: &str = "Matt Quevedo";

pub const ARTIST_SAX_ID: i64 = 3;
pub const ARTIST_SAX_NAME: &str = "The Wild Sax Band";

// ============================================================================
// Fixture Shows
// ============================================================================

/// Hop + Petals, before TEST_NOW
pub const SHOW_PAST_HOP: &str = "2019-05-21 21:30:00";

/// Park + Quevedo, before TEST_NOW
pub const SHOW_PAST_PARK: &str = "2019-06-15 23:00:00";

/// Park + Sax, after TEST_NOW
pub const SHOW_UPCOMING_PARK: [&str; 3] = [
    "2035-04-01 20:00:00",
    "2035-04-08 20:00:00",
    "2035-04-15 20:00:00",
];

pub const FIXTURE_VENUES_COUNT: usize = 3;
pub const FIXTURE_ARTISTS_COUNT: usize = 3;
pub const FIXTURE_SHOWS_COUNT: usize = 5;

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
