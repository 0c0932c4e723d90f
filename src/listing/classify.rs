use crate::directory_store::{Show, ShowListing};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Anything that happens at a point in time.
pub trait Scheduled {
    fn start_time(&self) -> DateTime<Utc>;
}

impl Scheduled for Show {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl Scheduled for ShowListing {
    fn start_time(&self) -> DateTime<Utc> {
        self.show.start_time
    }
}

/// Shows split around a reference instant, each side in input order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Classified<S> {
    pub past: Vec<S>,
    pub upcoming: Vec<S>,
    pub past_count: usize,
    pub upcoming_count: usize,
}

/// A show starting exactly at `now` counts as upcoming.
pub fn is_upcoming<S: Scheduled>(show: &S, now: DateTime<Utc>) -> bool {
    show.start_time() >= now
}

pub fn classify<S: Scheduled>(
    shows: impl IntoIterator<Item = S>,
    now: DateTime<Utc>,
) -> Classified<S> {
    let (upcoming, past): (Vec<S>, Vec<S>) = shows
        .into_iter()
        .partition(|show| is_upcoming(show, now));
    Classified {
        past_count: past.len(),
        upcoming_count: upcoming.len(),
        past,
        upcoming,
    }
}

pub fn count_upcoming<'a, S: Scheduled + 'a>(
    shows: impl IntoIterator<Item = &'a S>,
    now: DateTime<Utc>,
) -> usize {
    shows
        .into_iter()
        .filter(|show| is_upcoming(*show, now))
        .count()
}
