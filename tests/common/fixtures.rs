//! Test fixture creation for the directory database

use super::constants::*;
use anyhow::Result;
use booking_directory_server::directory_store::{
    ArtistDetails, DirectoryStore, Genres, NewShow, SqliteDirectoryStore, VenueDetails,
};
use booking_directory_server::server::forms::parse_start_time;
use std::path::PathBuf;
use tempfile::TempDir;

fn venue(name: &str, city: &str, state: &str, address: &str, genres: &[&str]) -> VenueDetails {
    VenueDetails {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: address.to_string(),
        phone: Some("123-123-1234".to_string()),
        genres: Genres::new(genres.iter().copied()),
        seeking_talent: true,
        seeking_description: Some("We are on the lookout for a local artist.".to_string()),
        ..Default::default()
    }
}

fn artist(name: &str, city: &str, state: &str, genres: &[&str]) -> ArtistDetails {
    ArtistDetails {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        phone: Some("326-123-5000".to_string()),
        genres: Genres::new(genres.iter().copied()),
        image_link: Some(format!("https://images.example.com/{}.jpg", name.len())),
        ..Default::default()
    }
}

fn show(store: &SqliteDirectoryStore, venue_id: i64, artist_id: i64, at: &str) -> Result<()> {
    store.create_show(&NewShow {
        venue_id,
        artist_id,
        start_time: parse_start_time(at)?,
    })?;
    Ok(())
}

/// Creates a temporary directory database with 3 venues, 3 artists, 5 shows
/// Returns (temp_dir, db_path)
pub fn create_test_directory() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("directory.db");
    let store = SqliteDirectoryStore::new(&db_path)?;

    store.create_venue(&venue(
        VENUE_HOP_NAME,
        "San Francisco",
        "CA",
        "1015 Folsom Street",
        &["Jazz", "Reggae", "Classical", "Folk"],
    ))?;
    store.create_venue(&venue(
        VENUE_PARK_NAME,
        "San Francisco",
        "CA",
        "34 Whiskey Moore Ave",
        &["Rock n Roll", "Jazz", "Classical", "Folk"],
    ))?;
    store.create_venue(&venue(
        VENUE_PIANOS_NAME,
        "New York",
        "NY",
        "335 Delancey Street",
        &["Classical", "R&B", "Hip-Hop"],
    ))?;

    store.create_artist(&artist(ARTIST_PETALS_NAME, "San Francisco", "CA", &["Rock n Roll"]))?;
    store.create_artist(&artist(ARTIST_QUEVEDO_NAME, "New York", "NY", &["Jazz"]))?;
    store.create_artist(&artist(
        ARTIST_SAX_NAME,
        "San Francisco",
        "CA",
        &["Jazz", "Classical"],
    ))?;

    show(&store, VENUE_HOP_ID, ARTIST_PETALS_ID, SHOW_PAST_HOP)?;
    show(&store, VENUE_PARK_ID, ARTIST_QUEVEDO_ID, SHOW_PAST_PARK)?;
    for at in SHOW_UPCOMING_PARK {
        show(&store, VENUE_PARK_ID, ARTIST_SAX_ID, at)?;
    }

    Ok((dir, db_path))
}
