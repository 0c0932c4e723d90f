use super::classify::count_upcoming;
use crate::directory_store::{Artist, ArtistWithShows, ShowListing, Venue, VenueWithShows};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A named record that owns a list of shows.
pub trait ShowOwner {
    type Record: Clone + Serialize;

    fn record(&self) -> &Self::Record;
    fn name(&self) -> &str;
    fn shows(&self) -> &[ShowListing];
}

impl ShowOwner for VenueWithShows {
    type Record = Venue;

    fn record(&self) -> &Venue {
        &self.venue
    }

    fn name(&self) -> &str {
        &self.venue.details.name
    }

    fn shows(&self) -> &[ShowListing] {
        &self.shows
    }
}

impl ShowOwner for ArtistWithShows {
    type Record = Artist;

    fn record(&self) -> &Artist {
        &self.artist
    }

    fn name(&self) -> &str {
        &self.artist.details.name
    }

    fn shows(&self) -> &[ShowListing] {
        &self.shows
    }
}

/// A matching record with its upcoming-show count alongside its own fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchHit<R> {
    #[serde(flatten)]
    pub record: R,
    pub num_upcoming_shows: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResults<R> {
    pub count: usize,
    pub data: Vec<SearchHit<R>>,
}

/// Case-insensitive substring search over record names.
///
/// An empty term matches every record. Hits keep input order.
pub fn search<O: ShowOwner>(
    records: &[O],
    term: &str,
    now: DateTime<Utc>,
) -> SearchResults<O::Record> {
    let needle = term.to_lowercase();
    let data: Vec<SearchHit<O::Record>> = records
        .iter()
        .filter(|record| record.name().to_lowercase().contains(&needle))
        .map(|record| SearchHit {
            record: record.record().clone(),
            num_upcoming_shows: count_upcoming(record.shows(), now),
        })
        .collect();

    SearchResults {
        count: data.len(),
        data,
    }
}
