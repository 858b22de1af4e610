//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: dispatches on the request
//! method, stamps the base response headers and writes the access log.

use crate::config::AppState;
use crate::error::{BoxError, UploadError};
use crate::handler::{static_files, upload};
use crate::http;
use crate::logger::{self, AccessLogEntry, AccessLogFormat};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request fields the static file fallback needs
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<&'a str>,
    pub if_none_match: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let header = |name: &str| req.headers().get(name).and_then(|v| v.to_str().ok());
        Self {
            path: req.uri().path(),
            query: req.uri().query(),
            is_head: req.method() == Method::HEAD,
            if_modified_since: header("if-modified-since"),
            if_none_match: header("if-none-match"),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Errors are returned to hyper, which drops the connection without a
/// response.
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, UploadError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let mut entry = AccessLogEntry::from_request(
        peer_addr,
        req.method(),
        req.uri(),
        req.version(),
        req.headers(),
    );

    let mut response = match dispatch(req, &state).await {
        Ok(response) => response,
        Err(e) => {
            logger::log_error(&format!(
                "{} {} from {peer_addr} failed: {e}",
                entry.method, entry.path
            ));
            return Err(e);
        }
    };

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(
            &entry,
            &AccessLogFormat::parse(&state.config.logging.access_log_format),
        );
    }

    Ok(response)
}

/// Dispatch on the request method
async fn dispatch<B>(
    req: Request<B>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, UploadError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: Into<BoxError>,
{
    let method = req.method().clone();
    match method {
        Method::PUT => upload::handle_put(req, state).await,
        Method::GET | Method::HEAD => {
            let ctx = RequestContext::from_request(&req);
            Ok(static_files::serve(&ctx, state).await)
        }
        _ => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            Ok(http::build_501_response(&method))
        }
    }
}
