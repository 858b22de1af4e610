//! Static file serving module
//!
//! The GET/HEAD fallback: files, directory index files and listings under
//! the document root, with `If-Modified-Since` support.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve a GET or HEAD request from the document root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let target = http::translate_path(&state.document_root, ctx.path);

    let Ok(metadata) = fs::metadata(&target).await else {
        return http::build_404_response(ctx.is_head);
    };

    if metadata.is_dir() {
        return serve_directory(ctx, state, &target).await;
    }

    // "/file.txt/" names a directory that does not exist
    if ctx.path.ends_with('/') {
        return http::build_404_response(ctx.is_head);
    }

    serve_file(ctx, &target).await
}

async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
) -> Response<Full<Bytes>> {
    if !ctx.path.ends_with('/') {
        let location = match ctx.query {
            Some(q) => format!("{}/?{q}", ctx.path),
            None => format!("{}/", ctx.path),
        };
        return http::build_301_response(&location);
    }

    if let Some(index) = find_index_file(dir, &state.config.http.index_files).await {
        return serve_file(ctx, &index).await;
    }

    if !state.config.http.directory_listing {
        return http::build_404_response(ctx.is_head);
    }

    match listing::render(dir, ctx.path).await {
        Ok(html) => http::response::build_html_response(html, ctx.is_head),
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_404_response(ctx.is_head)
        }
    }
}

async fn find_index_file(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for name in index_files {
        let candidate = dir.join(name);
        if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
            return Some(candidate);
        }
    }
    None
}

async fn serve_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<Full<Bytes>> {
    let metadata = match fs::metadata(file_path).await {
        Ok(m) => m,
        Err(_) => return http::build_404_response(ctx.is_head),
    };
    let last_modified = metadata.modified().ok();

    if let Some(modified) = last_modified {
        if cache::is_not_modified(ctx.if_modified_since, ctx.if_none_match, modified) {
            return http::build_304_response(&cache::format_http_date(modified));
        }
    }

    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return http::build_404_response(ctx.is_head);
        }
    };

    let last_modified = last_modified.map(cache::format_http_date).unwrap_or_default();
    http::response::build_file_response(
        content,
        mime::guess_type(file_path),
        &last_modified,
        ctx.is_head,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use hyper::body::Body;

    fn state_for(root: &Path) -> AppState {
        let mut config = Config::load_from("this-config-does-not-exist").unwrap();
        config.storage.document_root = root.to_string_lossy().into_owned();
        AppState::new(config)
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            query: None,
            is_head: false,
            if_modified_since: None,
            if_none_match: None,
        }
    }

    #[tokio::test]
    async fn test_serve_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), b"hello").unwrap();
        let state = state_for(dir.path());

        let resp = serve(&ctx("/hello.txt"), &state).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/plain; charset=utf-8");
        assert_eq!(resp.headers()["content-length"], "5");
        assert!(resp.headers().contains_key("last-modified"));
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());

        assert_eq!(serve(&ctx("/nope.txt"), &state).await.status(), 404);
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash_is_404() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), b"hello").unwrap();
        let state = state_for(dir.path());

        assert_eq!(serve(&ctx("/hello.txt/"), &state).await.status(), 404);
    }

    #[tokio::test]
    async fn test_directory_redirect_keeps_query() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        let state = state_for(dir.path());

        let mut request = ctx("/docs");
        request.query = Some("sort=name");
        let resp = serve(&request, &state).await;

        assert_eq!(resp.status(), 301);
        assert_eq!(resp.headers()["location"], "/docs/?sort=name");
    }

    #[tokio::test]
    async fn test_directory_index_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("site")).unwrap();
        std::fs::write(dir.path().join("site/index.htm"), b"<p>hi</p>").unwrap();
        let state = state_for(dir.path());

        let resp = serve(&ctx("/site/"), &state).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        assert_eq!(resp.body().size_hint().exact(), Some(9));
    }

    #[tokio::test]
    async fn test_listing_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_for(dir.path());
        state.config.http.directory_listing = false;

        assert_eq!(serve(&ctx("/"), &state).await.status(), 404);
    }

    #[tokio::test]
    async fn test_if_modified_since() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        let state = state_for(dir.path());

        let first = serve(&ctx("/a.txt"), &state).await;
        let stamp = first.headers()["last-modified"].to_str().unwrap().to_string();

        let mut conditional = ctx("/a.txt");
        conditional.if_modified_since = Some(&stamp);
        assert_eq!(serve(&conditional, &state).await.status(), 304);

        conditional.if_none_match = Some("\"tag\"");
        assert_eq!(serve(&conditional, &state).await.status(), 200);
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), b"hello").unwrap();
        let state = state_for(dir.path());

        let mut request = ctx("/hello.txt");
        request.is_head = true;
        let resp = serve(&request, &state).await;

        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-length"], "5");
        assert_eq!(resp.body().size_hint().exact(), Some(0));
    }
}
