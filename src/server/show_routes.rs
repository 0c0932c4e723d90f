use axum::{extract::State, response::Redirect, routing::get, Json, Router};
use axum_extra::extract::{cookie::CookieJar, Form, FormRejection};
use tracing::warn;

use super::error::AppError;
use super::flash::{failure_message, flash_outcome, set_flash, LISTED};
use super::forms::{FormDescriptor, ShowForm};
use super::pages::ShowsPage;
use super::state::{GuardedDirectoryStore, ServerState};
use crate::directory_store::{EntityKind, NewShow, StoreError};

async fn list_shows(
    State(store): State<GuardedDirectoryStore>,
) -> Result<Json<ShowsPage>, AppError> {
    Ok(Json(ShowsPage {
        page: "shows",
        shows: store.list_shows()?,
    }))
}

async fn create_show_form() -> Json<FormDescriptor<()>> {
    Json(FormDescriptor::show())
}

async fn create_show_submission(
    State(store): State<GuardedDirectoryStore>,
    jar: CookieJar,
    form: Result<Form<ShowForm>, FormRejection>,
) -> (CookieJar, Redirect) {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!("Rejected show submission: {}", rejection);
            let message = failure_message(EntityKind::Show, "", LISTED.failed);
            return (set_flash(jar, &message), Redirect::to("/"));
        }
    };

    let result = NewShow::try_from(form)
        .map_err(StoreError::from)
        .and_then(|show| store.create_show(&show));
    let jar = flash_outcome(jar, EntityKind::Show, "", &LISTED, &result);
    (jar, Redirect::to("/"))
}

pub fn make_show_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(list_shows))
        .route("/create", get(create_show_form).post(create_show_submission))
        .with_state(state)
}
