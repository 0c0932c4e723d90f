mod error;
mod models;
mod schema;
mod store;
mod trait_def;
mod validation;

pub use error::{StoreError, StoreResult};
pub use models::*;
pub use schema::DIRECTORY_VERSIONED_SCHEMAS;
pub use store::SqliteDirectoryStore;
pub use trait_def::DirectoryStore;
pub use validation::{validate_artist, validate_venue, ValidationError, ValidationResult};
