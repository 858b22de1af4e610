//! MIME type detection module
//!
//! Guesses a Content-Type for served files from their extension.

use std::path::Path;

const DEFAULT_TYPE: &str = "application/octet-stream";

/// Guess the Content-Type of a file path (extension match is case-insensitive)
///
/// # Examples
/// ```
/// use std::path::Path;
/// use upload_server::http::mime::guess_type;
/// assert_eq!(guess_type(Path::new("notes/todo.txt")), "text/plain; charset=utf-8");
/// assert_eq!(guess_type(Path::new("photo.JPG")), "image/jpeg");
/// assert_eq!(guess_type(Path::new("blob")), "application/octet-stream");
/// ```
pub fn guess_type(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return DEFAULT_TYPE;
    };

    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "txt" | "log" | "md" | "rs" | "toml" | "py" => "text/plain; charset=utf-8",
        "css" => "text/css",
        "csv" => "text/csv",
        "xml" => "application/xml",
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "wasm" => "application/wasm",

        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",

        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "tgz" => "application/gzip",
        "tar" => "application/x-tar",

        _ => DEFAULT_TYPE,
    }
}
