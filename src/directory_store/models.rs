//! Directory records: venues, artists and the shows linking them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type VenueId = i64;
pub type ArtistId = i64;
pub type ShowId = i64;

/// Labels accepted in the `genres` field of venues and artists.
pub const GENRE_CHOICES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

/// Two-letter codes accepted in the `state` field.
pub const STATE_CHOICES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

const GENRES_DELIMITER: char = ',';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Venue,
    Artist,
    Show,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Venue => write!(f, "Venue"),
            EntityKind::Artist => write!(f, "Artist"),
            EntityKind::Show => write!(f, "Show"),
        }
    }
}

/// Genre labels of a venue or artist.
///
/// Stored as a single comma-delimited TEXT column; no selection is stored as
/// the empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genres(Vec<String>);

impl Genres {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Genres(labels.into_iter().map(Into::into).collect())
    }

    pub fn from_db_str(s: &str) -> Self {
        Genres(
            s.split(GENRES_DELIMITER)
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn to_db_string(&self) -> String {
        self.0.join(&GENRES_DELIMITER.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Writable fields of a venue, replaced as a whole on every update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueDetails {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub genres: Genres,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Venue {
    pub id: VenueId,
    #[serde(flatten)]
    pub details: VenueDetails,
}

/// Writable fields of an artist, replaced as a whole on every update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistDetails {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Genres,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Artist {
    pub id: ArtistId,
    #[serde(flatten)]
    pub details: ArtistDetails,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewShow {
    pub venue_id: VenueId,
    pub artist_id: ArtistId,
    pub start_time: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Show {
    pub id: ShowId,
    pub venue_id: VenueId,
    pub artist_id: ArtistId,
    pub start_time: DateTime<Utc>,
}

/// A show joined with the display fields of its venue and artist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    #[serde(flatten)]
    pub show: Show,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
}

#[derive(Clone, Debug)]
pub struct VenueWithShows {
    pub venue: Venue,
    pub shows: Vec<ShowListing>,
}

#[derive(Clone, Debug)]
pub struct ArtistWithShows {
    pub artist: Artist,
    pub shows: Vec<ShowListing>,
}
