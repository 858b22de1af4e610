//! Directory listing page

use crate::http::path::{percent_decode, percent_encode};
use std::fmt::Write;
use std::io;
use std::path::Path;
use tokio::fs;

struct Entry {
    name: String,
    is_dir: bool,
    is_symlink: bool,
}

/// Render an HTML index of `dir`, requested as `url_path`
pub async fn render(dir: &Path, url_path: &str) -> io::Result<String> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let file_type = entry.file_type().await?;
        // follow symlinks to decide whether to link as a directory
        let is_dir = if file_type.is_symlink() {
            fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir())
        } else {
            file_type.is_dir()
        };
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink: file_type.is_symlink(),
        });
    }
    entries.sort_by_key(|e| e.name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(&percent_decode(url_path)));
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for entry in &entries {
        let link = if entry.is_dir {
            format!("{}/", entry.name)
        } else {
            entry.name.clone()
        };
        let display = if entry.is_symlink {
            format!("{}@", entry.name)
        } else {
            link.clone()
        };
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            percent_encode(&link),
            escape_html(&display)
        );
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_render_sorted_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), b"").unwrap();
        std::fs::write(dir.path().join("A.txt"), b"").unwrap();
        std::fs::create_dir(dir.path().join("sub dir")).unwrap();

        let html = render(dir.path(), "/uploads/").await.unwrap();

        assert!(html.contains("<title>Directory listing for /uploads/</title>"));
        let a = html.find("A.txt").unwrap();
        let b = html.find("b.txt").unwrap();
        let sub = html.find("sub dir/").unwrap();
        assert!(a < b && b < sub);
        assert!(html.contains("<a href=\"sub%20dir/\">sub dir/</a>"));
    }

    #[tokio::test]
    async fn test_render_escapes_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("<b>&.txt"), b"").unwrap();

        let html = render(dir.path(), "/").await.unwrap();

        assert!(html.contains("&lt;b&gt;&amp;.txt"));
        assert!(html.contains("href=\"%3Cb%3E%26.txt\""));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_render_symlinks() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("real")).unwrap();
        std::fs::write(dir.path().join("data.txt"), b"x").unwrap();
        symlink(dir.path().join("real"), dir.path().join("link")).unwrap();
        symlink(dir.path().join("data.txt"), dir.path().join("alias.txt")).unwrap();

        let html = render(dir.path(), "/").await.unwrap();

        assert!(html.contains("<a href=\"link/\">link@</a>"), "{html}");
        assert!(html.contains("<a href=\"alias.txt\">alias.txt@</a>"), "{html}");
        assert!(html.contains("<a href=\"real/\">real/</a>"));
        assert!(html.contains("<a href=\"data.txt\">data.txt</a>"));
    }

    #[tokio::test]
    async fn test_render_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(render(&dir.path().join("gone"), "/gone/").await.is_err());
    }
}
