mod artist_routes;
pub mod config;
mod error;
mod flash;
pub mod forms;
mod http_layers;
pub mod pages;
pub mod server;
mod show_routes;
pub mod state;
mod venue_routes;

pub use config::ServerConfig;
pub use error::AppError;
pub use flash::FLASH_COOKIE;
pub use http_layers::*;
pub use server::{make_app, run_server};
