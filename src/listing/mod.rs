//! Read-time projections over directory records.
//!
//! Everything here is a pure function of its inputs and an explicit `now`;
//! nothing is written back to the store.

mod aggregate;
mod classify;
mod search;

pub use aggregate::{group_by_location, LocationGroup, VenueSummary};
pub use classify::{classify, count_upcoming, is_upcoming, Classified, Scheduled};
pub use search::{search, SearchHit, SearchResults, ShowOwner};
