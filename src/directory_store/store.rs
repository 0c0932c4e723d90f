//! SQLite-backed directory store.

use super::error::{StoreError, StoreResult};
use super::models::*;
use super::schema::DIRECTORY_VERSIONED_SCHEMAS;
use super::trait_def::DirectoryStore;
use super::validation::{validate_artist, validate_venue, ValidationError};
use crate::sqlite_persistence::{VersionedSchema, BASE_DB_VERSION};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Params};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, image_link, facebook_link,
     genres, website, seeking_talent, seeking_description";

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, genres, image_link, facebook_link,
     website, seeking_venue, seeking_description";

const SHOW_LISTING_SELECT: &str =
    "SELECT s.id, s.venue_id, s.artist_id, s.start_time, v.name, v.image_link, a.name, a.image_link
     FROM shows s
     INNER JOIN venues v ON v.id = s.venue_id
     INNER JOIN artists a ON a.id = s.artist_id";

/// SQLite-backed store for venues, artists and shows.
///
/// All access goes through a single connection; every write runs in its own
/// `BEGIN IMMEDIATE` transaction and is rolled back on failure.
#[derive(Clone)]
pub struct SqliteDirectoryStore {
    conn: Arc<Mutex<Connection>>,
}

/// Brings the database at `conn` to the last of `schemas`, creating it from
/// scratch when it has no tables.
fn migrate_if_needed(conn: &mut Connection, schemas: &[VersionedSchema]) -> Result<()> {
    let latest_schema = schemas.last().context("No directory schema defined")?;

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!(
            "Creating directory db schema at version {}",
            latest_schema.version
        );
        latest_schema.create(conn)?;
        return Ok(());
    }

    let raw_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if raw_version < BASE_DB_VERSION as i64 {
        anyhow::bail!(
            "Database user_version {} was not written by this server",
            raw_version
        );
    }
    let db_version = (raw_version - BASE_DB_VERSION as i64) as usize;

    let current_schema = schemas
        .iter()
        .find(|s| s.version == db_version)
        .with_context(|| format!("Unknown directory database version {}", db_version))?;
    current_schema.validate(conn).with_context(|| {
        format!(
            "Directory database schema validation failed for version {}",
            db_version
        )
    })?;

    if db_version >= latest_schema.version {
        return Ok(());
    }

    let tx = conn.transaction()?;
    let mut current_version = db_version;
    for schema in schemas.iter().filter(|s| s.version > db_version) {
        info!(
            "Migrating directory db from version {} to {}",
            current_version, schema.version
        );
        if let Some(migration_fn) = schema.migration {
            migration_fn(&tx).with_context(|| {
                format!("Failed to run migration to version {}", schema.version)
            })?;
        }
        current_version = schema.version;
    }
    latest_schema.validate(&tx).with_context(|| {
        format!(
            "Directory database schema validation failed after migrating to version {}",
            current_version
        )
    })?;
    tx.pragma_update(None, "user_version", BASE_DB_VERSION + current_version)?;
    tx.commit()?;
    Ok(())
}

fn millis_to_datetime(column: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(column, millis))
}

impl SqliteDirectoryStore {
    /// Opens (or creates) the directory database at `db_path`.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open directory database at {:?}", path))?;
        Self::initialize(conn)
    }

    /// A store backed by a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(mut conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON;", [])?;
        migrate_if_needed(&mut conn, DIRECTORY_VERSIONED_SCHEMAS)?;
        Ok(SqliteDirectoryStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `op` inside an immediate transaction, committing on success and
    /// rolling back on any error.
    fn write_transaction<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let conn = self.conn.lock().unwrap();
        conn.execute("BEGIN IMMEDIATE", [])?;

        let result = f(&conn).and_then(|value| {
            conn.execute("COMMIT", [])?;
            Ok(value)
        });

        if let Err(err) = &result {
            debug!("Rolling back {}: {}", op, err);
            if let Err(rollback_err) = conn.execute("ROLLBACK", []) {
                warn!("Rollback of {} failed: {}", op, rollback_err);
            }
        }
        result
    }

    // =========================================================================
    // Row parsing
    // =========================================================================

    fn parse_venue_row(row: &rusqlite::Row) -> rusqlite::Result<Venue> {
        let genres: String = row.get(8)?;
        Ok(Venue {
            id: row.get(0)?,
            details: VenueDetails {
                name: row.get(1)?,
                city: row.get(2)?,
                state: row.get(3)?,
                address: row.get(4)?,
                phone: row.get(5)?,
                image_link: row.get(6)?,
                facebook_link: row.get(7)?,
                genres: Genres::from_db_str(&genres),
                website: row.get(9)?,
                seeking_talent: row.get(10)?,
                seeking_description: row.get(11)?,
            },
        })
    }

    fn parse_artist_row(row: &rusqlite::Row) -> rusqlite::Result<Artist> {
        let genres: String = row.get(5)?;
        Ok(Artist {
            id: row.get(0)?,
            details: ArtistDetails {
                name: row.get(1)?,
                city: row.get(2)?,
                state: row.get(3)?,
                phone: row.get(4)?,
                genres: Genres::from_db_str(&genres),
                image_link: row.get(6)?,
                facebook_link: row.get(7)?,
                website: row.get(8)?,
                seeking_venue: row.get(9)?,
                seeking_description: row.get(10)?,
            },
        })
    }

    fn parse_show_listing_row(row: &rusqlite::Row) -> rusqlite::Result<ShowListing> {
        Ok(ShowListing {
            show: Show {
                id: row.get(0)?,
                venue_id: row.get(1)?,
                artist_id: row.get(2)?,
                start_time: millis_to_datetime(3, row.get(3)?)?,
            },
            venue_name: row.get(4)?,
            venue_image_link: row.get(5)?,
            artist_name: row.get(6)?,
            artist_image_link: row.get(7)?,
        })
    }

    // =========================================================================
    // Queries shared by single and composite reads
    // =========================================================================

    fn query_venues(conn: &Connection) -> rusqlite::Result<Vec<Venue>> {
        let mut stmt =
            conn.prepare_cached(&format!("SELECT {} FROM venues ORDER BY id", VENUE_COLUMNS))?;
        let venues = stmt
            .query_map([], Self::parse_venue_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(venues)
    }

    fn query_artists(conn: &Connection) -> rusqlite::Result<Vec<Artist>> {
        let mut stmt =
            conn.prepare_cached(&format!("SELECT {} FROM artists ORDER BY id", ARTIST_COLUMNS))?;
        let artists = stmt
            .query_map([], Self::parse_artist_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(artists)
    }

    fn query_show_listings<P: Params>(
        conn: &Connection,
        clauses: &str,
        params: P,
    ) -> rusqlite::Result<Vec<ShowListing>> {
        let mut stmt = conn.prepare_cached(&format!("{} {}", SHOW_LISTING_SELECT, clauses))?;
        let listings = stmt
            .query_map(params, Self::parse_show_listing_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(listings)
    }

    fn group_shows_by<F>(listings: Vec<ShowListing>, key: F) -> HashMap<i64, Vec<ShowListing>>
    where
        F: Fn(&ShowListing) -> i64,
    {
        let mut grouped: HashMap<i64, Vec<ShowListing>> = HashMap::new();
        for listing in listings {
            grouped.entry(key(&listing)).or_default().push(listing);
        }
        grouped
    }

    fn exists(conn: &Connection, table: &str, id: i64) -> rusqlite::Result<bool> {
        conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", table),
            params![id],
            |r| r.get(0),
        )
    }

    fn count(&self, table: &str) -> StoreResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
        Ok(count as usize)
    }
}

impl DirectoryStore for SqliteDirectoryStore {
    // =========================================================================
    // Venues
    // =========================================================================

    fn get_venue(&self, id: VenueId) -> StoreResult<Venue> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {} FROM venues WHERE id = ?1", VENUE_COLUMNS),
            params![id],
            Self::parse_venue_row,
        )
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: EntityKind::Venue,
            id,
        })
    }

    fn list_venues(&self) -> StoreResult<Vec<Venue>> {
        let conn = self.conn.lock().unwrap();
        Ok(Self::query_venues(&conn)?)
    }

    fn create_venue(&self, details: &VenueDetails) -> StoreResult<VenueId> {
        validate_venue(details)?;
        let id = self.write_transaction("create_venue", |conn| {
            conn.execute(
                "INSERT INTO venues (name, city, state, address, phone, image_link, facebook_link,
                                     genres, website, seeking_talent, seeking_description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    &details.name,
                    &details.city,
                    &details.state,
                    &details.address,
                    &details.phone,
                    &details.image_link,
                    &details.facebook_link,
                    details.genres.to_db_string(),
                    &details.website,
                    details.seeking_talent,
                    &details.seeking_description,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        info!("Created venue {} ({})", id, details.name);
        Ok(id)
    }

    fn update_venue(&self, id: VenueId, details: &VenueDetails) -> StoreResult<()> {
        validate_venue(details)?;
        self.write_transaction("update_venue", |conn| {
            let rows_affected = conn.execute(
                "UPDATE venues SET name = ?1, city = ?2, state = ?3, address = ?4, phone = ?5,
                        image_link = ?6, facebook_link = ?7, genres = ?8, website = ?9,
                        seeking_talent = ?10, seeking_description = ?11
                 WHERE id = ?12",
                params![
                    &details.name,
                    &details.city,
                    &details.state,
                    &details.address,
                    &details.phone,
                    &details.image_link,
                    &details.facebook_link,
                    details.genres.to_db_string(),
                    &details.website,
                    details.seeking_talent,
                    &details.seeking_description,
                    id,
                ],
            )?;
            if rows_affected == 0 {
                return Err(StoreError::NotFound {
                    entity: EntityKind::Venue,
                    id,
                });
            }
            Ok(())
        })?;
        info!("Updated venue {}", id);
        Ok(())
    }

    fn delete_venue(&self, id: VenueId) -> StoreResult<()> {
        self.write_transaction("delete_venue", |conn| {
            let rows_affected = conn.execute("DELETE FROM venues WHERE id = ?1", params![id])?;
            if rows_affected == 0 {
                return Err(StoreError::NotFound {
                    entity: EntityKind::Venue,
                    id,
                });
            }
            Ok(())
        })?;
        info!("Deleted venue {}", id);
        Ok(())
    }

    // =========================================================================
    // Artists
    // =========================================================================

    fn get_artist(&self, id: ArtistId) -> StoreResult<Artist> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {} FROM artists WHERE id = ?1", ARTIST_COLUMNS),
            params![id],
            Self::parse_artist_row,
        )
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: EntityKind::Artist,
            id,
        })
    }

    fn list_artists(&self) -> StoreResult<Vec<Artist>> {
        let conn = self.conn.lock().unwrap();
        Ok(Self::query_artists(&conn)?)
    }

    fn create_artist(&self, details: &ArtistDetails) -> StoreResult<ArtistId> {
        validate_artist(details)?;
        let id = self.write_transaction("create_artist", |conn| {
            conn.execute(
                "INSERT INTO artists (name, city, state, phone, genres, image_link, facebook_link,
                                      website, seeking_venue, seeking_description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    &details.name,
                    &details.city,
                    &details.state,
                    &details.phone,
                    details.genres.to_db_string(),
                    &details.image_link,
                    &details.facebook_link,
                    &details.website,
                    details.seeking_venue,
                    &details.seeking_description,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        info!("Created artist {} ({})", id, details.name);
        Ok(id)
    }

    fn update_artist(&self, id: ArtistId, details: &ArtistDetails) -> StoreResult<()> {
        validate_artist(details)?;
        self.write_transaction("update_artist", |conn| {
            let rows_affected = conn.execute(
                "UPDATE artists SET name = ?1, city = ?2, state = ?3, phone = ?4, genres = ?5,
                        image_link = ?6, facebook_link = ?7, website = ?8, seeking_venue = ?9,
                        seeking_description = ?10
                 WHERE id = ?11",
                params![
                    &details.name,
                    &details.city,
                    &details.state,
                    &details.phone,
                    details.genres.to_db_string(),
                    &details.image_link,
                    &details.facebook_link,
                    &details.website,
                    details.seeking_venue,
                    &details.seeking_description,
                    id,
                ],
            )?;
            if rows_affected == 0 {
                return Err(StoreError::NotFound {
                    entity: EntityKind::Artist,
                    id,
                });
            }
            Ok(())
        })?;
        info!("Updated artist {}", id);
        Ok(())
    }

    fn delete_artist(&self, id: ArtistId) -> StoreResult<()> {
        self.write_transaction("delete_artist", |conn| {
            let rows_affected = conn.execute("DELETE FROM artists WHERE id = ?1", params![id])?;
            if rows_affected == 0 {
                return Err(StoreError::NotFound {
                    entity: EntityKind::Artist,
                    id,
                });
            }
            Ok(())
        })?;
        info!("Deleted artist {}", id);
        Ok(())
    }

    // =========================================================================
    // Shows
    // =========================================================================

    fn create_show(&self, show: &NewShow) -> StoreResult<ShowId> {
        let id = self.write_transaction("create_show", |conn| {
            if !Self::exists(conn, "venues", show.venue_id)? {
                return Err(ValidationError::MissingReference {
                    entity: EntityKind::Venue,
                    id: show.venue_id,
                }
                .into());
            }
            if !Self::exists(conn, "artists", show.artist_id)? {
                return Err(ValidationError::MissingReference {
                    entity: EntityKind::Artist,
                    id: show.artist_id,
                }
                .into());
            }
            conn.execute(
                "INSERT INTO shows (venue_id, artist_id, start_time) VALUES (?1, ?2, ?3)",
                params![show.venue_id, show.artist_id, show.start_time.timestamp_millis()],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        info!(
            "Created show {} (venue {}, artist {}, {})",
            id, show.venue_id, show.artist_id, show.start_time
        );
        Ok(id)
    }

    fn list_shows(&self) -> StoreResult<Vec<ShowListing>> {
        let conn = self.conn.lock().unwrap();
        Ok(Self::query_show_listings(
            &conn,
            "ORDER BY s.venue_id, s.start_time, s.id",
            [],
        )?)
    }

    fn shows_for_venue(&self, id: VenueId) -> StoreResult<Vec<ShowListing>> {
        let conn = self.conn.lock().unwrap();
        Ok(Self::query_show_listings(
            &conn,
            "WHERE s.venue_id = ?1 ORDER BY s.start_time, s.id",
            params![id],
        )?)
    }

    fn shows_for_artist(&self, id: ArtistId) -> StoreResult<Vec<ShowListing>> {
        let conn = self.conn.lock().unwrap();
        Ok(Self::query_show_listings(
            &conn,
            "WHERE s.artist_id = ?1 ORDER BY s.start_time, s.id",
            params![id],
        )?)
    }

    // =========================================================================
    // Composite reads
    // =========================================================================

    fn venues_with_shows(&self) -> StoreResult<Vec<VenueWithShows>> {
        let conn = self.conn.lock().unwrap();
        let venues = Self::query_venues(&conn)?;
        let listings = Self::query_show_listings(&conn, "ORDER BY s.start_time, s.id", [])?;
        let mut shows_by_venue = Self::group_shows_by(listings, |l| l.show.venue_id);

        Ok(venues
            .into_iter()
            .map(|venue| {
                let shows = shows_by_venue.remove(&venue.id).unwrap_or_default();
                VenueWithShows { venue, shows }
            })
            .collect())
    }

    fn artists_with_shows(&self) -> StoreResult<Vec<ArtistWithShows>> {
        let conn = self.conn.lock().unwrap();
        let artists = Self::query_artists(&conn)?;
        let listings = Self::query_show_listings(&conn, "ORDER BY s.start_time, s.id", [])?;
        let mut shows_by_artist = Self::group_shows_by(listings, |l| l.show.artist_id);

        Ok(artists
            .into_iter()
            .map(|artist| {
                let shows = shows_by_artist.remove(&artist.id).unwrap_or_default();
                ArtistWithShows { artist, shows }
            })
            .collect())
    }

    // =========================================================================
    // Counts
    // =========================================================================

    fn venues_count(&self) -> StoreResult<usize> {
        self.count("venues")
    }

    fn artists_count(&self) -> StoreResult<usize> {
        self.count("artists")
    }

    fn shows_count(&self) -> StoreResult<usize> {
        self.count("shows")
    }
}
