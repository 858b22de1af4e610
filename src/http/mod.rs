//! HTTP protocol layer module
//!
//! Protocol helpers shared by the upload handler and the static file
//! fallback: path translation, response builders, content types and
//! conditional-request dates.

pub mod cache;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used items
pub use path::translate_path;
pub use response::{
    build_301_response, build_304_response, build_404_response, build_413_response,
    build_501_response, build_upload_response,
};
