//! Request logging middleware

use super::super::config::ServerConfig;
use super::super::flash::FLASH_COOKIE;
use axum::extract::State;
use axum::{
    body::Body,
    http::{header, header::HeaderMap, Request, Response, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

#[derive(PartialEq, PartialOrd, Clone, Debug, Default, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    #[default]
    Path,
    Headers,
    Body,
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

const MAX_LOGGABLE_BODY_LENGTH: usize = 1024;

/// Asset requests are only logged from `Headers` up.
const STATIC_PREFIX: &str = "/static/";

fn content_length(headers: &HeaderMap) -> Result<usize, &'static str> {
    headers
        .get(header::CONTENT_LENGTH)
        .ok_or("Content-length not set.")?
        .to_str()
        .map_err(|_| "Could not get Content-length string value.")?
        .parse()
        .map_err(|_| "Could not parse Content-length numeric value.")
}

fn log_headers(label: &str, headers: &HeaderMap) {
    info!("  {} Headers:", label);
    for (name, value) in headers.iter() {
        info!("    {:?}: {:?}", name, value);
    }
}

/// Form submissions are small, so they are printed whole; anything over the
/// limit is only sized. Returns `None` if the body could not be buffered.
async fn log_body(label: &str, headers: &HeaderMap, body: Body) -> Option<Body> {
    match content_length(headers) {
        Err(reason) => {
            info!("  {} Body: {}", label, reason);
            Some(body)
        }
        Ok(size) if size < MAX_LOGGABLE_BODY_LENGTH => {
            let bytes = match axum::body::to_bytes(body, size).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    error!("Failed to read {} body: {:?}", label, err);
                    return None;
                }
            };
            info!("  {} Body:\n{}", label, String::from_utf8_lossy(&bytes));
            Some(Body::from(bytes))
        }
        Ok(size) => {
            info!(
                "  {} Body: Too big to log ({:#})",
                label,
                byte_unit::Byte::from(size)
            );
            Some(body)
        }
    }
}

/// Whether the response leaves a message in the flash cookie.
fn sets_flash(headers: &HeaderMap) -> bool {
    let prefix = format!("{}=", FLASH_COOKIE);
    let cleared = format!("{};", prefix);
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|cookie| cookie.starts_with(&prefix) && !cookie.starts_with(&cleared))
}

/// One line describing how a request ended, e.g. `<<< 303 -> / +flash (2ms)`.
fn outcome_line(status: StatusCode, headers: &HeaderMap, elapsed: Duration) -> String {
    let mut line = format!("<<< {}", status.as_u16());
    if status.is_redirection() {
        if let Some(location) = headers.get(header::LOCATION).and_then(|v| v.to_str().ok()) {
            line.push_str(&format!(" -> {}", location));
        }
    }
    if sets_flash(headers) {
        line.push_str(" +flash");
    }
    line.push_str(&format!(" ({}ms)", elapsed.as_millis()));
    line
}

pub async fn log_requests(
    State(config): State<ServerConfig>,
    mut request: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    let mut level = config.requests_logging_level;
    if level == RequestsLoggingLevel::Path && request.uri().path().starts_with(STATIC_PREFIX) {
        level = RequestsLoggingLevel::None;
    }
    let start = Instant::now();

    if level > RequestsLoggingLevel::None {
        info!(">>> {} {}", request.method(), request.uri());
    }

    if level >= RequestsLoggingLevel::Headers {
        log_headers("Req", request.headers());
    }

    if level >= RequestsLoggingLevel::Body {
        let (parts, body) = request.into_parts();
        let body = match log_body("Req", &parts.headers, body).await {
            Some(body) => body,
            None => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        };
        request = Request::from_parts(parts, body);
    }

    let mut response = next.run(request).await;

    if level >= RequestsLoggingLevel::Headers {
        log_headers("Resp", response.headers());
    }

    if level >= RequestsLoggingLevel::Body {
        let (parts, body) = response.into_parts();
        let body = match log_body("Resp", &parts.headers, body).await {
            Some(body) => body,
            None => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        };
        response = Response::from_parts(parts, body);
    }

    // Server errors are reported even with request logging off
    let status = response.status();
    let line = outcome_line(status, response.headers(), start.elapsed());
    if status.is_server_error() {
        error!("{}", line);
    } else if level > RequestsLoggingLevel::None {
        if status.is_client_error() {
            warn!("{}", line);
        } else {
            info!("{}", line);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn level_ordering() {
        let none = RequestsLoggingLevel::None;

        assert!(none < RequestsLoggingLevel::Headers);
        assert!(RequestsLoggingLevel::Body > RequestsLoggingLevel::None);
        assert!(RequestsLoggingLevel::Path < RequestsLoggingLevel::Body);
    }

    #[test]
    fn content_length_reasons() {
        let mut headers = HeaderMap::new();
        assert_eq!(content_length(&headers), Err("Content-length not set."));

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("abc"));
        assert_eq!(
            content_length(&headers),
            Err("Could not parse Content-length numeric value.")
        );

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("42"));
        assert_eq!(content_length(&headers), Ok(42));
    }

    #[test]
    fn outcome_line_shows_redirect_and_flash() {
        let mut headers = HeaderMap::new();
        headers.insert(header::LOCATION, HeaderValue::from_static("/venues/3"));
        headers.append(
            header::SET_COOKIE,
            HeaderValue::from_static("flash=Venue%20updated; Path=/"),
        );

        let line = outcome_line(StatusCode::SEE_OTHER, &headers, Duration::from_millis(4));
        assert_eq!(line, "<<< 303 -> /venues/3 +flash (4ms)");
    }

    #[test]
    fn cleared_flash_is_not_reported() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::SET_COOKIE,
            HeaderValue::from_static("flash=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT"),
        );

        let line = outcome_line(StatusCode::OK, &headers, Duration::from_millis(1));
        assert_eq!(line, "<<< 200 (1ms)");
    }
}
