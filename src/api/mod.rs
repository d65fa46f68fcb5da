// API module entry
//
// Dispatches requests to the movie CRUD handlers based on path and
// method, and emits one access log line per request.

pub mod handlers;
pub mod response;

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes, Incoming};
use hyper::header::{HeaderName, HeaderValue, CONTENT_LENGTH, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{self, Endpoint};

/// Main entry point for request handling.
///
/// Matches the path, validates the id segment and method, collects the
/// body where one is expected, and dispatches to a handler.
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    // Capture request metadata before the body is consumed
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = http_version_label(req.version()).to_string();
    entry.referer = header_string(&req, &REFERER);
    entry.user_agent = header_string(&req, &USER_AGENT);

    let mut response = dispatch(req, &state).await;

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes =
            usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route the request to a handler.
///
/// Generic over the body type so tests can drive it with `Full<Bytes>`
/// requests while the server feeds it `Incoming`.
async fn dispatch<B>(req: Request<B>, state: &Arc<AppState>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Display,
{
    // Reject oversized bodies before collecting anything
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match routing::match_path(&path) {
        Some(Endpoint::Collection) => match method {
            Method::POST => match collect_body(req).await {
                Ok(body) => handlers::create_movie(state, &body).await,
                Err(resp) => resp,
            },
            Method::GET => handlers::list_movies(state).await,
            _ => response::method_not_allowed("GET, POST"),
        },
        Some(Endpoint::Item(raw_id)) => {
            let Ok(id) = raw_id.parse::<i64>() else {
                return response::bad_request("Invalid movie ID");
            };
            match method {
                Method::GET => handlers::get_movie(state, id).await,
                Method::PUT => match collect_body(req).await {
                    Ok(body) => handlers::update_movie(state, id, &body).await,
                    Err(resp) => resp,
                },
                Method::DELETE => handlers::delete_movie(state, id).await,
                _ => response::method_not_allowed("GET, PUT, DELETE"),
            }
        }
        None => response::not_found("Not Found"),
    }
}

/// Collect the whole request body, mapping read failures to 400.
async fn collect_body<B>(req: Request<B>) -> Result<Bytes, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Display,
{
    match req.collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) => {
            logger::log_error(&format!("Failed to read request body: {e}"));
            Err(response::bad_request("Failed to read request body"))
        }
    }
}

/// Validate the Content-Length header and return 413 when it exceeds the
/// configured limit.
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(CONTENT_LENGTH)?;
    let size_str = content_length.to_str().ok()?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(response::payload_too_large())
        }
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
        _ => None,
    }
}

fn header_string<B>(req: &Request<B>, name: &HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn http_version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use hyper::header::ALLOW;
    use hyper::StatusCode;

    fn state() -> Arc<AppState> {
        let config = Config::load_from("test-config-does-not-exist").expect("default config");
        Arc::new(AppState::new(&config))
    }

    fn request(method: Method, uri: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    #[tokio::test]
    async fn non_integer_id_is_rejected() {
        let state = state();
        let resp = dispatch(request(Method::GET, "/movies/abc", ""), &state).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = dispatch(request(Method::DELETE, "/movies/1.5", ""), &state).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn negative_id_parses_but_is_not_found() {
        let state = state();
        let resp = dispatch(request(Method::GET, "/movies/-1", ""), &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = dispatch(request(Method::DELETE, "/movies/-42", ""), &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unsupported_methods_get_405_with_allow() {
        let state = state();
        let resp = dispatch(request(Method::PATCH, "/movies", ""), &state).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "GET, POST");

        let resp = dispatch(request(Method::POST, "/movies/1", "{}"), &state).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "GET, PUT, DELETE");
    }

    #[tokio::test]
    async fn oversized_content_length_is_rejected() {
        let state = state();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/movies")
            .header(CONTENT_LENGTH, "2000000")
            .body(Full::new(Bytes::from("{}")))
            .unwrap();
        let resp = dispatch(req, &state).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let state = state();
        let resp = dispatch(request(Method::GET, "/films", ""), &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = dispatch(request(Method::GET, "/movies/1/credits", ""), &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_roundtrips_through_dispatch() {
        let state = state();
        let body = r#"{"title":"Heat","director":"Mann","year":1995,"genre":"Crime"}"#;
        let resp = dispatch(request(Method::POST, "/movies", body), &state).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = dispatch(request(Method::GET, "/movies/1", ""), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
