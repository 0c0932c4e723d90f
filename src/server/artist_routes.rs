use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::{cookie::CookieJar, Form, FormRejection};
use tracing::{debug, warn};

use super::error::{parse_id, AppError};
use super::flash::{
    failure_message, flash_outcome, set_flash, take_flash, DELETED, LISTED, UPDATED,
};
use super::forms::{ArtistForm, FormDescriptor, SearchForm};
use super::pages::{ArtistDetailPage, ArtistSummary, ArtistsPage, SearchPage};
use super::state::{GuardedDirectoryStore, ServerState, SharedClock};
use crate::directory_store::{Artist, ArtistDetails, EntityKind};
use crate::listing::{classify, search};

async fn list_artists(
    State(store): State<GuardedDirectoryStore>,
) -> Result<Json<ArtistsPage>, AppError> {
    let artists = store.list_artists()?;
    Ok(Json(ArtistsPage {
        page: "artists",
        artists: artists.into_iter().map(ArtistSummary::from).collect(),
    }))
}

async fn search_artists(
    State(store): State<GuardedDirectoryStore>,
    State(clock): State<SharedClock>,
    Form(form): Form<SearchForm>,
) -> Result<Json<SearchPage<Artist>>, AppError> {
    let artists = store.artists_with_shows()?;
    let results = search(&artists, &form.search_term, clock.now());
    debug!(
        "Artist search '{}' matched {} of {}",
        form.search_term,
        results.count,
        artists.len()
    );
    Ok(Json(SearchPage {
        page: "search_artists",
        search_term: form.search_term,
        results,
    }))
}

async fn show_artist(
    State(store): State<GuardedDirectoryStore>,
    State(clock): State<SharedClock>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<(CookieJar, Json<ArtistDetailPage>), AppError> {
    let id = parse_id(&id)?;
    let artist = store.get_artist(id)?;
    let shows = store.shows_for_artist(id)?;
    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        Json(ArtistDetailPage {
            page: "show_artist",
            flash,
            artist,
            shows: classify(shows, clock.now()).into(),
        }),
    ))
}

async fn create_artist_form() -> Json<FormDescriptor<ArtistDetails>> {
    Json(FormDescriptor::artist(
        "new_artist",
        "/artists/create".to_string(),
        None,
    ))
}

async fn create_artist_submission(
    State(store): State<GuardedDirectoryStore>,
    jar: CookieJar,
    form: Result<Form<ArtistForm>, FormRejection>,
) -> (CookieJar, Redirect) {
    let details = match form {
        Ok(Form(form)) => ArtistDetails::from(form),
        Err(rejection) => {
            warn!("Rejected artist submission: {}", rejection);
            let message = failure_message(EntityKind::Artist, "", LISTED.failed);
            return (set_flash(jar, &message), Redirect::to("/"));
        }
    };

    let result = store.create_artist(&details);
    let jar = flash_outcome(jar, EntityKind::Artist, &details.name, &LISTED, &result);
    (jar, Redirect::to("/"))
}

async fn delete_artist(
    State(store): State<GuardedDirectoryStore>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<(CookieJar, StatusCode), AppError> {
    let id = parse_id(&id)?;
    let name = store
        .get_artist(id)
        .map(|artist| artist.details.name)
        .unwrap_or_else(|_| id.to_string());

    let result = store.delete_artist(id);
    let jar = flash_outcome(jar, EntityKind::Artist, &name, &DELETED, &result);
    Ok((jar, StatusCode::OK))
}

async fn edit_artist(
    State(store): State<GuardedDirectoryStore>,
    Path(id): Path<String>,
) -> Result<Json<FormDescriptor<ArtistDetails>>, AppError> {
    let id = parse_id(&id)?;
    let artist = store.get_artist(id)?;
    Ok(Json(FormDescriptor::artist(
        "edit_artist",
        format!("/artists/{}/edit", id),
        Some(artist.details),
    )))
}

async fn edit_artist_submission(
    State(store): State<GuardedDirectoryStore>,
    jar: CookieJar,
    Path(id): Path<String>,
    form: Result<Form<ArtistForm>, FormRejection>,
) -> Result<(CookieJar, Redirect), AppError> {
    let id = parse_id(&id)?;
    let detail_page = Redirect::to(&format!("/artists/{}", id));

    let details = match form {
        Ok(Form(form)) => ArtistDetails::from(form),
        Err(rejection) => {
            warn!("Rejected edit of artist {}: {}", id, rejection);
            let message = failure_message(EntityKind::Artist, "", UPDATED.failed);
            return Ok((set_flash(jar, &message), detail_page));
        }
    };

    let result = store.update_artist(id, &details);
    let jar = flash_outcome(jar, EntityKind::Artist, &details.name, &UPDATED, &result);
    Ok((jar, detail_page))
}

pub fn make_artist_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(list_artists))
        .route("/search", post(search_artists))
        .route(
            "/create",
            get(create_artist_form).post(create_artist_submission),
        )
        .route("/{id}", get(show_artist).delete(delete_artist))
        .route("/{id}/edit", get(edit_artist).post(edit_artist_submission))
        .with_state(state)
}
