// Movie CRUD handlers
//
// Each handler decodes its inputs, delegates to the store behind the
// AppState lock, and serializes the outcome. Bodies arrive pre-collected
// from the dispatcher.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::sync::Arc;

use super::response::{bad_request, json_response, no_content, not_found};
use crate::config::AppState;
use crate::store::MovieFields;

/// Create a movie from the request body.
pub async fn create_movie(state: &Arc<AppState>, body: &Bytes) -> Response<Full<Bytes>> {
    let fields: MovieFields = match serde_json::from_slice(body) {
        Ok(f) => f,
        Err(e) => return bad_request(&format!("Invalid movie payload: {e}")),
    };

    let movie = state.store.write().await.create(fields);
    json_response(StatusCode::CREATED, &movie)
}

/// List all movies in insertion order.
pub async fn list_movies(state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let store = state.store.read().await;
    json_response(StatusCode::OK, store.list())
}

/// Fetch a single movie by id.
pub async fn get_movie(state: &Arc<AppState>, id: i64) -> Response<Full<Bytes>> {
    let store = state.store.read().await;
    match store.get(id) {
        Ok(movie) => json_response(StatusCode::OK, movie),
        Err(e) => not_found(&e.to_string()),
    }
}

/// Replace the non-id fields of an existing movie.
///
/// The body is decoded before the id lookup, so a malformed body is 400
/// even when the id does not exist.
pub async fn update_movie(state: &Arc<AppState>, id: i64, body: &Bytes) -> Response<Full<Bytes>> {
    let fields: MovieFields = match serde_json::from_slice(body) {
        Ok(f) => f,
        Err(e) => return bad_request(&format!("Invalid movie payload: {e}")),
    };

    match state.store.write().await.update(id, fields) {
        Ok(movie) => json_response(StatusCode::OK, &movie),
        Err(e) => not_found(&e.to_string()),
    }
}

/// Delete a movie. Success is 204 with an empty body.
pub async fn delete_movie(state: &Arc<AppState>, id: i64) -> Response<Full<Bytes>> {
    match state.store.write().await.delete(id) {
        Ok(()) => no_content(),
        Err(e) => not_found(&e.to_string()),
    }
}
