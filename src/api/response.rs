// API response builders
//
// Success bodies are JSON; error bodies are plain text describing the
// problem.

use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Build a JSON response with the given status.
///
/// Serialization failures surface as a generic 500 instead of panicking.
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build response: {e}"));
            Response::new(Full::new(Bytes::from("Error")))
        })
}

/// 204 No Content response (successful delete).
pub fn no_content() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build 204 response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}

/// 400 Bad Request with a plain-text message.
pub fn bad_request(message: &str) -> Response<Full<Bytes>> {
    plain_response(StatusCode::BAD_REQUEST, message)
}

/// 404 Not Found with a plain-text message.
pub fn not_found(message: &str) -> Response<Full<Bytes>> {
    plain_response(StatusCode::NOT_FOUND, message)
}

/// 405 Method Not Allowed advertising the supported methods.
pub fn method_not_allowed(allow: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain")
        .header("Allow", allow)
        .body(Full::new(Bytes::from("Method Not Allowed")))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build 405 response: {e}"));
            Response::new(Full::new(Bytes::from("Method Not Allowed")))
        })
}

/// 413 Payload Too Large.
pub fn payload_too_large() -> Response<Full<Bytes>> {
    plain_response(StatusCode::PAYLOAD_TOO_LARGE, "Request Entity Too Large")
}

fn plain_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from(message.to_string())))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build {status} response: {e}"));
            Response::new(Full::new(Bytes::from("Error")))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_response_sets_content_type() {
        let resp = json_response(StatusCode::OK, &serde_json::json!({"ok": true}));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "application/json");
    }

    #[test]
    fn error_responses_are_plain_text() {
        let resp = bad_request("Invalid movie ID");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()["Content-Type"], "text/plain");

        let resp = not_found("movie 9 not found");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["Content-Type"], "text/plain");
    }

    #[test]
    fn method_not_allowed_advertises_methods() {
        let resp = method_not_allowed("GET, POST");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["Allow"], "GET, POST");
    }
}
