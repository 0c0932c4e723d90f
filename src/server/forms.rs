//! Typed bindings for submitted forms.
//!
//! Each form accepts exactly the writable fields of its record and rejects
//! anything else. Blank optional fields are stored as absent, an unchecked
//! checkbox is simply missing from the submission.

use crate::directory_store::{
    ArtistDetails, ArtistId, Genres, NewShow, ValidationError, ValidationResult, VenueDetails,
    VenueId, GENRE_CHOICES, STATE_CHOICES,
};
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

const FALSE_CHECKBOX_VALUES: &[&str] = &["false", "n", "no", "off", "0"];

const NAIVE_START_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn checkbox(value: Option<String>) -> bool {
    match value {
        Some(v) => !FALSE_CHECKBOX_VALUES.contains(&v.trim().to_lowercase().as_str()),
        None => false,
    }
}

fn genres(values: Vec<String>) -> Genres {
    Genres::new(
        values
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()),
    )
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VenueForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub website: Option<String>,
    pub seeking_talent: Option<String>,
    pub seeking_description: Option<String>,
}

impl From<VenueForm> for VenueDetails {
    fn from(form: VenueForm) -> Self {
        VenueDetails {
            name: form.name.trim().to_string(),
            city: form.city.trim().to_string(),
            state: form.state.trim().to_string(),
            address: form.address.trim().to_string(),
            phone: optional(form.phone),
            image_link: optional(form.image_link),
            facebook_link: optional(form.facebook_link),
            genres: genres(form.genres),
            website: optional(form.website),
            seeking_talent: checkbox(form.seeking_talent),
            seeking_description: optional(form.seeking_description),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtistForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: Option<String>,
    pub seeking_description: Option<String>,
}

impl From<ArtistForm> for ArtistDetails {
    fn from(form: ArtistForm) -> Self {
        ArtistDetails {
            name: form.name.trim().to_string(),
            city: form.city.trim().to_string(),
            state: form.state.trim().to_string(),
            phone: optional(form.phone),
            genres: genres(form.genres),
            image_link: optional(form.image_link),
            facebook_link: optional(form.facebook_link),
            website: optional(form.website),
            seeking_venue: checkbox(form.seeking_venue),
            seeking_description: optional(form.seeking_description),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShowForm {
    #[serde(default)]
    pub artist_id: String,
    #[serde(default)]
    pub venue_id: String,
    #[serde(default)]
    pub start_time: String,
}

fn parse_reference(field: &str, raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::InvalidField {
            field: field.to_string(),
            reason: "required".to_string(),
        });
    }
    raw.parse().map_err(|_| ValidationError::InvalidField {
        field: field.to_string(),
        reason: format!("'{}' is not a valid id", raw),
    })
}

/// Accepts RFC 3339 or a naive date-time, which is taken as UTC.
///
/// Shows are stored with millisecond precision, so finer digits are dropped
/// here and the value handed to the store is the value read back.
pub fn parse_start_time(raw: &str) -> ValidationResult<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::EmptyField {
            field: "start_time",
        });
    }
    let parsed = match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(_) => NAIVE_START_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc()),
    };
    parsed
        .map(|start_time| start_time.trunc_subsecs(3))
        .ok_or_else(|| ValidationError::InvalidField {
            field: "start_time".to_string(),
            reason: format!("'{}' is not a recognized date and time", raw),
        })
}

impl TryFrom<ShowForm> for NewShow {
    type Error = ValidationError;

    fn try_from(form: ShowForm) -> ValidationResult<Self> {
        let venue_id: VenueId = parse_reference("venue_id", &form.venue_id)?;
        let artist_id: ArtistId = parse_reference("artist_id", &form.artist_id)?;
        Ok(NewShow {
            venue_id,
            artist_id,
            start_time: parse_start_time(&form.start_time)?,
        })
    }
}

/// What a client needs to render an empty or pre-filled form.
#[derive(Debug, Serialize)]
pub struct FormDescriptor<T: Serialize> {
    pub page: &'static str,
    pub action: String,
    pub fields: &'static [&'static str],
    pub genre_choices: &'static [&'static str],
    pub state_choices: &'static [&'static str],
    pub values: Option<T>,
}

pub const VENUE_FIELDS: &[&str] = &[
    "name",
    "city",
    "state",
    "address",
    "phone",
    "image_link",
    "facebook_link",
    "genres",
    "website",
    "seeking_talent",
    "seeking_description",
];

pub const ARTIST_FIELDS: &[&str] = &[
    "name",
    "city",
    "state",
    "phone",
    "genres",
    "image_link",
    "facebook_link",
    "website",
    "seeking_venue",
    "seeking_description",
];

pub const SHOW_FIELDS: &[&str] = &["artist_id", "venue_id", "start_time"];

impl<T: Serialize> FormDescriptor<T> {
    pub fn venue(page: &'static str, action: String, values: Option<T>) -> Self {
        Self::with_fields(page, action, VENUE_FIELDS, values)
    }

    pub fn artist(page: &'static str, action: String, values: Option<T>) -> Self {
        Self::with_fields(page, action, ARTIST_FIELDS, values)
    }

    fn with_fields(
        page: &'static str,
        action: String,
        fields: &'static [&'static str],
        values: Option<T>,
    ) -> Self {
        FormDescriptor {
            page,
            action,
            fields,
            genre_choices: GENRE_CHOICES,
            state_choices: STATE_CHOICES,
            values,
        }
    }
}

impl FormDescriptor<()> {
    pub fn show() -> Self {
        FormDescriptor {
            page: "new_show",
            action: "/shows/create".to_string(),
            fields: SHOW_FIELDS,
            genre_choices: &[],
            state_choices: &[],
            values: None,
        }
    }
}
