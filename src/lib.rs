//! Booking Directory Server Library
//!
//! Venues, artists and the shows that link them, served over HTTP.

pub mod clock;
pub mod config;
pub mod directory_store;
pub mod listing;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use directory_store::{DirectoryStore, SqliteDirectoryStore};
pub use server::{make_app, run_server, RequestsLoggingLevel};
