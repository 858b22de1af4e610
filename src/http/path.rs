//! URL path translation
//!
//! Maps a request path onto the document root. Segments are percent-decoded,
//! `.` and empty segments are dropped and `..` is resolved lexically, so the
//! result never climbs above the root. Symlinks are not inspected.

use std::path::{Path, PathBuf};

/// Translate a URL path into a filesystem path under `root`
///
/// # Examples
/// ```
/// use std::path::Path;
/// use upload_server::http::path::translate_path;
///
/// let p = translate_path(Path::new("/srv"), "/notes/todo%20list.txt");
/// assert_eq!(p, Path::new("/srv/notes/todo list.txt"));
/// ```
pub fn translate_path(root: &Path, url_path: &str) -> PathBuf {
    let raw = url_path.split(['?', '#']).next().unwrap_or_default();
    let trailing_slash = raw.ends_with('/');
    let decoded = percent_decode(raw);

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }

    let mut path = root.to_path_buf();
    path.extend(&segments);
    if trailing_slash {
        path.as_mut_os_string().push("/");
    }
    path
}

/// Decode `%XX` escapes; malformed escapes are kept literally
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Encode a path segment for use in an `href`
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~' | b'/') {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path() {
        let root = Path::new("/srv/www");
        assert_eq!(
            translate_path(root, "/notes/todo.txt"),
            Path::new("/srv/www/notes/todo.txt")
        );
        assert_eq!(translate_path(root, "/"), PathBuf::from("/srv/www/"));
    }

    #[test]
    fn test_query_and_fragment_dropped() {
        let root = Path::new("/srv");
        assert_eq!(translate_path(root, "/a.txt?x=1"), Path::new("/srv/a.txt"));
        assert_eq!(translate_path(root, "/a.txt#top"), Path::new("/srv/a.txt"));
    }

    #[test]
    fn test_dot_segments() {
        let root = Path::new("/srv");
        assert_eq!(translate_path(root, "/a/./b//c"), Path::new("/srv/a/b/c"));
        assert_eq!(translate_path(root, "/a/../b"), Path::new("/srv/b"));
        assert_eq!(
            translate_path(root, "/../../etc/passwd"),
            Path::new("/srv/etc/passwd")
        );
        assert_eq!(
            translate_path(root, "/%2e%2e/%2E%2E/secret"),
            Path::new("/srv/secret")
        );
    }

    #[test]
    fn test_trailing_slash_kept() {
        let root = Path::new("/srv");
        let p = translate_path(root, "/dir/");
        assert!(p.to_string_lossy().ends_with("/srv/dir/"));
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("a%20b"), "a b");
        assert_eq!(percent_decode("%E2%9C%93"), "\u{2713}");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz%4"), "%zz%4");
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("my file.txt"), "my%20file.txt");
        assert_eq!(percent_encode("a&b/"), "a%26b/");
        let name = "r\u{e9}sum\u{e9}";
        assert_eq!(percent_decode(&percent_encode(name)), name);
    }
}
