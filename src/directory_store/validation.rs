//! Validation for directory records.
//!
//! Every write goes through these checks before a transaction is opened.

use super::models::{ArtistDetails, EntityKind, Genres, VenueDetails, GENRE_CHOICES, STATE_CHOICES};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{field}' is required but was empty")]
    EmptyField { field: &'static str },

    #[error("Field '{field}' is invalid: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Unknown state '{0}'")]
    UnknownState(String),

    #[error("Unknown genre '{0}'")]
    UnknownGenre(String),

    #[error("Referenced {entity} '{id}' does not exist")]
    MissingReference { entity: EntityKind, id: i64 },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

fn require(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

fn validate_state(state: &str) -> ValidationResult<()> {
    if !STATE_CHOICES.contains(&state) {
        return Err(ValidationError::UnknownState(state.to_string()));
    }
    Ok(())
}

fn validate_genres(genres: &Genres) -> ValidationResult<()> {
    match genres.iter().find(|label| !GENRE_CHOICES.contains(label)) {
        Some(unknown) => Err(ValidationError::UnknownGenre(unknown.to_string())),
        None => Ok(()),
    }
}

pub fn validate_venue(venue: &VenueDetails) -> ValidationResult<()> {
    require("name", &venue.name)?;
    require("city", &venue.city)?;
    require("state", &venue.state)?;
    require("address", &venue.address)?;
    validate_state(&venue.state)?;
    validate_genres(&venue.genres)
}

pub fn validate_artist(artist: &ArtistDetails) -> ValidationResult<()> {
    require("name", &artist.name)?;
    require("city", &artist.city)?;
    require("state", &artist.state)?;
    validate_state(&artist.state)?;
    validate_genres(&artist.genres)
}
