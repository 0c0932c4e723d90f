//! SQLite schema for the booking directory.

use crate::sqlite_column;
use anyhow::Result;
use rusqlite::Connection;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

const VENUES_TABLE: Table = Table {
    name: "venues",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("city", &SqlType::Text, non_null = true),
        sqlite_column!("state", &SqlType::Text, non_null = true),
        sqlite_column!("address", &SqlType::Text, non_null = true),
        sqlite_column!("phone", &SqlType::Text),
        sqlite_column!("image_link", &SqlType::Text),
        sqlite_column!("facebook_link", &SqlType::Text),
        sqlite_column!(
            "genres",
            &SqlType::Text,
            non_null = true,
            default_value = Some("''")
        ), // comma-delimited labels
        sqlite_column!("website", &SqlType::Text),
        sqlite_column!(
            "seeking_talent",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!("seeking_description", &SqlType::Text),
    ],
    indices: &[("idx_venues_location", "city, state")],
};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("city", &SqlType::Text, non_null = true),
        sqlite_column!("state", &SqlType::Text, non_null = true),
        sqlite_column!("phone", &SqlType::Text),
        sqlite_column!(
            "genres",
            &SqlType::Text,
            non_null = true,
            default_value = Some("''")
        ),
        sqlite_column!("image_link", &SqlType::Text),
        sqlite_column!("facebook_link", &SqlType::Text),
        sqlite_column!("website", &SqlType::Text),
        sqlite_column!(
            "seeking_venue",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!("seeking_description", &SqlType::Text),
    ],
    indices: &[],
};

const SHOW_VENUE_FK: ForeignKey = ForeignKey {
    foreign_table: "venues",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const SHOW_ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const SHOWS_TABLE: Table = Table {
    name: "shows",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "venue_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SHOW_VENUE_FK)
        ),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SHOW_ARTIST_FK)
        ),
        sqlite_column!("start_time", &SqlType::Integer, non_null = true), // unix millis, UTC
    ],
    indices: &[
        ("idx_shows_venue", "venue_id"),
        ("idx_shows_artist", "artist_id"),
        ("idx_shows_start_time", "start_time"),
    ],
};

/// Version 0 stored show start times in whole seconds.
fn migrate_start_times_to_millis(conn: &Connection) -> Result<()> {
    conn.execute("UPDATE shows SET start_time = start_time * 1000", [])?;
    Ok(())
}

pub const DIRECTORY_VERSIONED_SCHEMAS: &[VersionedSchema] = &[
    VersionedSchema {
        version: 0,
        tables: &[VENUES_TABLE, ARTISTS_TABLE, SHOWS_TABLE],
        migration: None,
    },
    VersionedSchema {
        version: 1,
        tables: &[VENUES_TABLE, ARTISTS_TABLE, SHOWS_TABLE],
        migration: Some(migrate_start_times_to_millis),
    },
];
