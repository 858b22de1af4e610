// Connection handling module
// Serves a single TCP connection to completion with hyper's HTTP/1 server

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve one connection and return once it is closed.
///
/// Request faults surface here as connection errors: hyper has already
/// dropped the connection without writing a response.
///
/// # Arguments
///
/// * `stream` - The accepted TCP stream
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
pub async fn serve_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
) {
    logger::log_connection_accepted(&peer_addr);

    let io = TokioIo::new(stream);

    let mut builder = http1::Builder::new();
    builder
        .keep_alive(state.config.performance.keep_alive)
        .timer(TokioTimer::new())
        .header_read_timeout(state.header_read_timeout());

    let state = Arc::clone(state);
    let service = service_fn(move |req| {
        handler::handle_request(req, peer_addr, Arc::clone(&state))
    });

    if let Err(err) = builder.serve_connection(io, service).await {
        logger::log_connection_error(&err);
    }
}
