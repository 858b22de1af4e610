//! Minimal HTTP upload server
//!
//! PUT requests store their body under the document root; GET and HEAD
//! serve files and directory listings from it. Connections are served one at
//! a time.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::UploadError;
