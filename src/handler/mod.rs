//! Request handler module
//!
//! Method dispatch, the PUT upload handler, and the static file fallback
//! used for GET and HEAD.

pub mod listing;
pub mod router;
pub mod static_files;
pub mod upload;

// Re-export main entry point
pub use router::handle_request;
