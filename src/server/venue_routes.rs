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
use super::forms::{FormDescriptor, SearchForm, VenueForm};
use super::pages::{SearchPage, VenueDetailPage, VenuesPage};
use super::state::{GuardedDirectoryStore, ServerState, SharedClock};
use crate::directory_store::{EntityKind, Venue, VenueDetails};
use crate::listing::{classify, group_by_location, search};

async fn list_venues(
    State(store): State<GuardedDirectoryStore>,
    State(clock): State<SharedClock>,
) -> Result<Json<VenuesPage>, AppError> {
    let venues = store.venues_with_shows()?;
    Ok(Json(VenuesPage {
        page: "venues",
        areas: group_by_location(&venues, clock.now()),
    }))
}

async fn search_venues(
    State(store): State<GuardedDirectoryStore>,
    State(clock): State<SharedClock>,
    Form(form): Form<SearchForm>,
) -> Result<Json<SearchPage<Venue>>, AppError> {
    let venues = store.venues_with_shows()?;
    let results = search(&venues, &form.search_term, clock.now());
    debug!(
        "Venue search '{}' matched {} of {}",
        form.search_term,
        results.count,
        venues.len()
    );
    Ok(Json(SearchPage {
        page: "search_venues",
        search_term: form.search_term,
        results,
    }))
}

async fn show_venue(
    State(store): State<GuardedDirectoryStore>,
    State(clock): State<SharedClock>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<(CookieJar, Json<VenueDetailPage>), AppError> {
    let id = parse_id(&id)?;
    let venue = store.get_venue(id)?;
    let shows = store.shows_for_venue(id)?;
    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        Json(VenueDetailPage {
            page: "show_venue",
            flash,
            venue,
            shows: classify(shows, clock.now()).into(),
        }),
    ))
}

async fn create_venue_form() -> Json<FormDescriptor<VenueDetails>> {
    Json(FormDescriptor::venue(
        "new_venue",
        "/venues/create".to_string(),
        None,
    ))
}

async fn create_venue_submission(
    State(store): State<GuardedDirectoryStore>,
    jar: CookieJar,
    form: Result<Form<VenueForm>, FormRejection>,
) -> (CookieJar, Redirect) {
    let details = match form {
        Ok(Form(form)) => VenueDetails::from(form),
        Err(rejection) => {
            warn!("Rejected venue submission: {}", rejection);
            let message = failure_message(EntityKind::Venue, "", LISTED.failed);
            return (set_flash(jar, &message), Redirect::to("/"));
        }
    };

    let result = store.create_venue(&details);
    let jar = flash_outcome(jar, EntityKind::Venue, &details.name, &LISTED, &result);
    (jar, Redirect::to("/"))
}

async fn delete_venue(
    State(store): State<GuardedDirectoryStore>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<(CookieJar, StatusCode), AppError> {
    let id = parse_id(&id)?;
    let name = store
        .get_venue(id)
        .map(|venue| venue.details.name)
        .unwrap_or_else(|_| id.to_string());

    let result = store.delete_venue(id);
    let jar = flash_outcome(jar, EntityKind::Venue, &name, &DELETED, &result);
    Ok((jar, StatusCode::OK))
}

async fn edit_venue(
    State(store): State<GuardedDirectoryStore>,
    Path(id): Path<String>,
) -> Result<Json<FormDescriptor<VenueDetails>>, AppError> {
    let id = parse_id(&id)?;
    let venue = store.get_venue(id)?;
    Ok(Json(FormDescriptor::venue(
        "edit_venue",
        format!("/venues/{}/edit", id),
        Some(venue.details),
    )))
}

async fn edit_venue_submission(
    State(store): State<GuardedDirectoryStore>,
    jar: CookieJar,
    Path(id): Path<String>,
    form: Result<Form<VenueForm>, FormRejection>,
) -> Result<(CookieJar, Redirect), AppError> {
    let id = parse_id(&id)?;
    let detail_page = Redirect::to(&format!("/venues/{}", id));

    let details = match form {
        Ok(Form(form)) => VenueDetails::from(form),
        Err(rejection) => {
            warn!("Rejected edit of venue {}: {}", id, rejection);
            let message = failure_message(EntityKind::Venue, "", UPDATED.failed);
            return Ok((set_flash(jar, &message), detail_page));
        }
    };

    let result = store.update_venue(id, &details);
    let jar = flash_outcome(jar, EntityKind::Venue, &details.name, &UPDATED, &result);
    Ok((jar, detail_page))
}

pub fn make_venue_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(list_venues))
        .route("/search", post(search_venues))
        .route(
            "/create",
            get(create_venue_form).post(create_venue_submission),
        )
        .route("/{id}", get(show_venue).delete(delete_venue))
        .route("/{id}/edit", get(edit_venue).post(edit_venue_submission))
        .with_state(state)
}
