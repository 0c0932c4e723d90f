//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all directory-server endpoints.
//!
//! When routes or form formats change, update only this file.

use super::constants::*;
use reqwest::{redirect, Response};
use std::fmt::Display;
use std::time::Duration;

/// HTTP test client that keeps cookies and does not follow redirects
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    /// Creates a new client
    ///
    /// Redirects are returned as-is so tests can check their status and
    /// location; the flash cookie is kept between requests.
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET on an arbitrary path
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// Form POST on an arbitrary path
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(fields)
            .send()
            .await
            .expect("POST request failed")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("DELETE request failed")
    }

    // ========================================================================
    // Home
    // ========================================================================

    pub async fn get_home(&self) -> Response {
        self.get("/").await
    }

    /// Reads the home page and returns the flash message it consumed
    pub async fn take_flash(&self) -> Option<String> {
        let json: serde_json::Value = self
            .get_home()
            .await
            .json()
            .await
            .expect("Home page is not JSON");
        json["flash"].as_str().map(str::to_string)
    }

    // ========================================================================
    // Venues
    // ========================================================================

    pub async fn get_venues(&self) -> Response {
        self.get("/venues").await
    }

    pub async fn search_venues(&self, term: &str) -> Response {
        self.post_form("/venues/search", &[("search_term", term)])
            .await
    }

    pub async fn get_venue(&self, id: impl Display) -> Response {
        self.get(&format!("/venues/{}", id)).await
    }

    pub async fn get_create_venue_form(&self) -> Response {
        self.get("/venues/create").await
    }

    pub async fn create_venue(&self, fields: &[(&str, &str)]) -> Response {
        self.post_form("/venues/create", fields).await
    }

    pub async fn get_edit_venue_form(&self, id: impl Display) -> Response {
        self.get(&format!("/venues/{}/edit", id)).await
    }

    pub async fn edit_venue(&self, id: impl Display, fields: &[(&str, &str)]) -> Response {
        self.post_form(&format!("/venues/{}/edit", id), fields)
            .await
    }

    pub async fn delete_venue(&self, id: impl Display) -> Response {
        self.delete(&format!("/venues/{}", id)).await
    }

    // ========================================================================
    // Artists
    // ========================================================================

    pub async fn get_artists(&self) -> Response {
        self.get("/artists").await
    }

    pub async fn search_artists(&self, term: &str) -> Response {
        self.post_form("/artists/search", &[("search_term", term)])
            .await
    }

    pub async fn get_artist(&self, id: impl Display) -> Response {
        self.get(&format!("/artists/{}", id)).await
    }

    pub async fn get_create_artist_form(&self) -> Response {
        self.get("/artists/create").await
    }

    pub async fn create_artist(&self, fields: &[(&str, &str)]) -> Response {
        self.post_form("/artists/create", fields).await
    }

    pub async fn get_edit_artist_form(&self, id: impl Display) -> Response {
        self.get(&format!("/artists/{}/edit", id)).await
    }

    pub async fn edit_artist(&self, id: impl Display, fields: &[(&str, &str)]) -> Response {
        self.post_form(&format!("/artists/{}/edit", id), fields)
            .await
    }

    pub async fn delete_artist(&self, id: impl Display) -> Response {
        self.delete(&format!("/artists/{}", id)).await
    }

    // ========================================================================
    // Shows
    // ========================================================================

    pub async fn get_shows(&self) -> Response {
        self.get("/shows").await
    }

    pub async fn get_create_show_form(&self) -> Response {
        self.get("/shows/create").await
    }

    pub async fn create_show(&self, fields: &[(&str, &str)]) -> Response {
        self.post_form("/shows/create", fields).await
    }
}
