//! End-to-end tests for the show listing and show creation

mod common;

use booking_directory_server::directory_store::DirectoryStore;
use common::*;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_list_shows_ordered_by_venue_then_time() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_shows().await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = response.json().await.unwrap();

    let shows = json["shows"].as_array().unwrap();
    assert_eq!(shows.len(), FIXTURE_SHOWS_COUNT);

    assert_eq!(shows[0]["venue_id"], VENUE_HOP_ID);
    assert_eq!(shows[0]["venue_name"], VENUE_HOP_NAME);
    assert_eq!(shows[0]["artist_name"], ARTIST_PETALS_NAME);
    assert!(shows[0]["artist_image_link"].is_string());

    let park_artists: Vec<&Value> = shows[1..].iter().map(|s| &s["artist_id"]).collect();
    assert_eq!(park_artists[0], ARTIST_QUEVEDO_ID);
    assert!(park_artists[1..].iter().all(|id| **id == ARTIST_SAX_ID));

    let times: Vec<&str> = shows
        .iter()
        .map(|s| s["start_time"].as_str().unwrap())
        .collect();
    assert!(times[1..].windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_create_show_form_lists_fields() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let form: Value = client.get_create_show_form().await.json().await.unwrap();
    assert_eq!(form["page"], "new_show");
    assert_eq!(
        form["fields"],
        serde_json::json!(["artist_id", "venue_id", "start_time"])
    );
}

#[tokio::test]
async fn test_create_show_counts_as_upcoming() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .create_show(&[
            ("artist_id", &ARTIST_PETALS_ID.to_string()),
            ("venue_id", &VENUE_PIANOS_ID.to_string()),
            ("start_time", "2030-06-01 21:00:00"),
        ])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/");
    assert_eq!(
        client.take_flash().await.as_deref(),
        Some("Show was successfully listed!")
    );

    let json: Value = client.get_venue(VENUE_PIANOS_ID).await.json().await.unwrap();
    assert_eq!(json["upcoming_shows_count"], 1);
    assert_eq!(json["upcoming_shows"][0]["artist_name"], ARTIST_PETALS_NAME);

    let json: Value = client.get_venues().await.json().await.unwrap();
    assert_eq!(json["areas"][1]["venues"][0]["num_upcoming_shows"], 1);
}

#[tokio::test]
async fn test_show_exactly_now_is_upcoming() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    client
        .create_show(&[
            ("artist_id", &ARTIST_QUEVEDO_ID.to_string()),
            ("venue_id", &VENUE_HOP_ID.to_string()),
            ("start_time", TEST_NOW),
        ])
        .await;

    let json: Value = client.get_venue(VENUE_HOP_ID).await.json().await.unwrap();
    assert_eq!(json["past_shows_count"], 1);
    assert_eq!(json["upcoming_shows_count"], 1);
}

#[tokio::test]
async fn test_partitions_follow_the_server_clock() {
    let at = format!("{}Z", SHOW_UPCOMING_PARK[1].replace(' ', "T"));
    let server = TestServer::spawn_at(&at).await;
    let client = TestClient::new(server.base_url.clone());

    let json: Value = client.get_venue(VENUE_PARK_ID).await.json().await.unwrap();
    assert_eq!(json["past_shows_count"], 2);
    assert_eq!(json["upcoming_shows_count"], 2);

    let now = server.now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    assert_eq!(json["upcoming_shows"][0]["start_time"], now.as_str());

    let json: Value = client.search_artists("sax").await.json().await.unwrap();
    assert_eq!(json["results"]["data"][0]["num_upcoming_shows"], 2);
}

#[tokio::test]
async fn test_sub_second_start_time_stays_upcoming() {
    let server = TestServer::spawn_at("2025-01-01T00:00:00.500Z").await;
    let client = TestClient::new(server.base_url.clone());

    client
        .create_show(&[
            ("artist_id", &ARTIST_QUEVEDO_ID.to_string()),
            ("venue_id", &VENUE_PIANOS_ID.to_string()),
            ("start_time", "2025-01-01T00:00:00.900Z"),
        ])
        .await;
    assert_eq!(
        client.take_flash().await.as_deref(),
        Some("Show was successfully listed!")
    );

    let json: Value = client.get_venue(VENUE_PIANOS_ID).await.json().await.unwrap();
    assert_eq!(json["past_shows_count"], 0);
    assert_eq!(json["upcoming_shows_count"], 1);
    assert_eq!(
        json["upcoming_shows"][0]["start_time"],
        "2025-01-01T00:00:00.900Z"
    );
}

#[tokio::test]
async fn test_create_show_with_missing_references_fails() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .create_show(&[
            ("artist_id", "999"),
            ("venue_id", &VENUE_HOP_ID.to_string()),
            ("start_time", "2030-06-01 21:00:00"),
        ])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        client.take_flash().await.as_deref(),
        Some("An error occurred. Show could not be listed.")
    );
    assert_eq!(server.store.shows_count().unwrap(), FIXTURE_SHOWS_COUNT);
}

#[tokio::test]
async fn test_create_show_with_bad_start_time_fails() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    client
        .create_show(&[
            ("artist_id", &ARTIST_PETALS_ID.to_string()),
            ("venue_id", &VENUE_HOP_ID.to_string()),
            ("start_time", "sometime soon"),
        ])
        .await;
    assert_eq!(
        client.take_flash().await.as_deref(),
        Some("An error occurred. Show could not be listed.")
    );
    assert_eq!(server.store.shows_count().unwrap(), FIXTURE_SHOWS_COUNT);
}
