//! HTTP response building module
//!
//! Builders for every status the server emits.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};

/// Methods the router answers itself
pub const ALLOWED_METHODS: &str = "GET, HEAD, PUT";

/// Build the fixed upload acknowledgment: 200 OK, no headers, no body
pub fn build_upload_response() -> Response<Full<Bytes>> {
    Response::new(Full::new(Bytes::new()))
}

/// Build 200 response for file content
pub fn build_file_response(
    data: Vec<u8>,
    content_type: &str,
    last_modified: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { Bytes::from(data) };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Last-Modified", last_modified)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 200 HTML response (directory listings)
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 redirect to the slash-terminated directory URL
pub fn build_301_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(301)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("Last-Modified", last_modified)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response(is_head: bool) -> Response<Full<Bytes>> {
    build_text_response(404, "404 File not found", is_head, None)
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_text_response(413, "413 Payload Too Large", false, None)
}

/// Build 501 response for methods the server does not implement
pub fn build_501_response(method: &Method) -> Response<Full<Bytes>> {
    let message = format!("501 Unsupported method ('{method}')");
    build_text_response(501, &message, *method == Method::HEAD, Some(ALLOWED_METHODS))
}

fn build_text_response(
    status: u16,
    message: &str,
    is_head: bool,
    allow: Option<&str>,
) -> Response<Full<Bytes>> {
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(message.to_string())
    };

    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", message.len());
    if let Some(methods) = allow {
        builder = builder.header("Allow", methods);
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(&status.to_string(), &e);
        Response::new(Full::new(Bytes::from(message.to_string())))
    })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::body::Body;

    #[test]
    fn test_upload_response_is_bare() {
        let resp = build_upload_response();
        assert_eq!(resp.status(), 200);
        assert!(resp.headers().is_empty());
        assert_eq!(resp.body().size_hint().exact(), Some(0));
    }

    #[test]
    fn test_file_response_head_keeps_length() {
        let resp = build_file_response(b"hello".to_vec(), "text/plain", "date", true);
        assert_eq!(resp.headers()["content-length"], "5");
        assert_eq!(resp.body().size_hint().exact(), Some(0));
    }

    #[test]
    fn test_501_lists_allowed_methods() {
        let resp = build_501_response(&Method::DELETE);
        assert_eq!(resp.status(), 501);
        assert_eq!(resp.headers()["allow"], ALLOWED_METHODS);
    }

    #[test]
    fn test_301_location() {
        let resp = build_301_response("/docs/");
        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["location"], "/docs/");
    }
}
