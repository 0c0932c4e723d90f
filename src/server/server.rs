use anyhow::{Context, Result};
use std::any::Any;
use std::time::Duration;

use tracing::{error, info};

use axum::{
    extract::State,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir};

use super::artist_routes::make_artist_routes;
use super::error::AppError;
use super::flash::take_flash;
use super::pages::HomePage;
use super::show_routes::make_show_routes;
use super::state::*;
use super::venue_routes::make_venue_routes;
use super::{log_requests, ServerConfig};

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<HomePage>), AppError> {
    let page = HomePage {
        page: "home",
        version: env!("CARGO_PKG_VERSION").to_string(),
        hash: state.hash.clone(),
        uptime: format_uptime(state.start_time.elapsed()),
        flash: None,
        venues_count: state.store.venues_count()?,
        artists_count: state.store.artists_count()?,
        shows_count: state.store.shows_count()?,
    };
    let (jar, flash) = take_flash(jar);
    Ok((jar, Json(HomePage { flash, ..page })))
}

async fn not_found() -> AppError {
    AppError::NotFound
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!("Request handler panicked: {}", details);
    AppError::Internal.into_response()
}

pub fn make_app(
    config: ServerConfig,
    store: GuardedDirectoryStore,
    clock: SharedClock,
) -> Result<Router> {
    let state = ServerState::new(config.clone(), store, clock);

    let mut app: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone())
        .nest("/venues", make_venue_routes(state.clone()))
        .nest("/artists", make_artist_routes(state.clone()))
        .nest("/shows", make_show_routes(state.clone()));

    if let Some(static_dir) = &config.static_dir {
        app = app.nest_service("/static", ServeDir::new(static_dir));
    }

    app = app
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(
    config: ServerConfig,
    store: GuardedDirectoryStore,
    clock: SharedClock,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, store, clock)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on http://127.0.0.1:{}", port);

    Ok(axum::serve(listener, app).await?)
}
