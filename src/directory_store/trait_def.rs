//! DirectoryStore trait definition.

use super::error::StoreResult;
use super::models::*;

/// Storage backend for venues, artists and shows.
///
/// Writes are atomic: a failed create/update/delete leaves no partial change
/// behind. Updates replace every writable field of the record.
pub trait DirectoryStore: Send + Sync {
    // =========================================================================
    // Venues
    // =========================================================================

    fn get_venue(&self, id: VenueId) -> StoreResult<Venue>;

    /// All venues ordered by id.
    fn list_venues(&self) -> StoreResult<Vec<Venue>>;

    fn create_venue(&self, details: &VenueDetails) -> StoreResult<VenueId>;

    fn update_venue(&self, id: VenueId, details: &VenueDetails) -> StoreResult<()>;

    /// Deletes the venue and, through the foreign key cascade, its shows.
    fn delete_venue(&self, id: VenueId) -> StoreResult<()>;

    // =========================================================================
    // Artists
    // =========================================================================

    fn get_artist(&self, id: ArtistId) -> StoreResult<Artist>;

    /// All artists ordered by id.
    fn list_artists(&self) -> StoreResult<Vec<Artist>>;

    fn create_artist(&self, details: &ArtistDetails) -> StoreResult<ArtistId>;

    fn update_artist(&self, id: ArtistId, details: &ArtistDetails) -> StoreResult<()>;

    fn delete_artist(&self, id: ArtistId) -> StoreResult<()>;

    // =========================================================================
    // Shows
    // =========================================================================

    /// Fails with a validation error if the venue or the artist does not exist.
    fn create_show(&self, show: &NewShow) -> StoreResult<ShowId>;

    /// All shows ordered by venue, then start time.
    fn list_shows(&self) -> StoreResult<Vec<ShowListing>>;

    fn shows_for_venue(&self, id: VenueId) -> StoreResult<Vec<ShowListing>>;

    fn shows_for_artist(&self, id: ArtistId) -> StoreResult<Vec<ShowListing>>;

    // =========================================================================
    // Composite reads
    // =========================================================================

    fn venues_with_shows(&self) -> StoreResult<Vec<VenueWithShows>>;

    fn artists_with_shows(&self) -> StoreResult<Vec<ArtistWithShows>>;

    // =========================================================================
    // Counts
    // =========================================================================

    fn venues_count(&self) -> StoreResult<usize>;

    fn artists_count(&self) -> StoreResult<usize>;

    fn shows_count(&self) -> StoreResult<usize>;
}
