//! Page documents returned by the directory routes.

use crate::directory_store::{Artist, ArtistId, ShowListing, Venue};
use crate::listing::{Classified, LocationGroup, SearchResults};
use serde::Serialize;

#[derive(Serialize)]
pub struct HomePage {
    pub page: &'static str,
    pub version: String,
    pub hash: String,
    pub uptime: String,
    pub flash: Option<String>,
    pub venues_count: usize,
    pub artists_count: usize,
    pub shows_count: usize,
}

#[derive(Serialize)]
pub struct VenuesPage {
    pub page: &'static str,
    pub areas: Vec<LocationGroup>,
}

#[derive(Serialize)]
pub struct ArtistSummary {
    pub id: ArtistId,
    pub name: String,
}

impl From<Artist> for ArtistSummary {
    fn from(artist: Artist) -> Self {
        ArtistSummary {
            id: artist.id,
            name: artist.details.name,
        }
    }
}

#[derive(Serialize)]
pub struct ArtistsPage {
    pub page: &'static str,
    pub artists: Vec<ArtistSummary>,
}

#[derive(Serialize)]
pub struct SearchPage<R> {
    pub page: &'static str,
    pub search_term: String,
    pub results: SearchResults<R>,
}

/// Past and upcoming shows of one venue or artist.
#[derive(Serialize)]
pub struct ShowsBreakdown {
    pub past_shows: Vec<ShowListing>,
    pub upcoming_shows: Vec<ShowListing>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl From<Classified<ShowListing>> for ShowsBreakdown {
    fn from(classified: Classified<ShowListing>) -> Self {
        ShowsBreakdown {
            past_shows: classified.past,
            upcoming_shows: classified.upcoming,
            past_shows_count: classified.past_count,
            upcoming_shows_count: classified.upcoming_count,
        }
    }
}

#[derive(Serialize)]
pub struct VenueDetailPage {
    pub page: &'static str,
    pub flash: Option<String>,
    pub venue: Venue,
    #[serde(flatten)]
    pub shows: ShowsBreakdown,
}

#[derive(Serialize)]
pub struct ArtistDetailPage {
    pub page: &'static str,
    pub flash: Option<String>,
    pub artist: Artist,
    #[serde(flatten)]
    pub shows: ShowsBreakdown,
}

#[derive(Serialize)]
pub struct ShowsPage {
    pub page: &'static str,
    pub shows: Vec<ShowListing>,
}
