//! Static file serving module
//!
//! The per-request pipeline: decode, default document, confine to the site
//! root, stat, directory-index redirect, and the streamed 200.

use crate::handler::resolve::{self, ResolveError};
use crate::http::cache::CachePolicy;
use crate::http::{mime, response, ResponseBody};
use hyper::Response;
use std::io;
use std::path::Path;
use tokio::fs;

/// Failure modes of the serve pipeline. Each maps to exactly one status
/// code at the request boundary; none of them are fatal to the process.
#[derive(Debug)]
pub enum ServeError {
    /// The request resolves outside the site root.
    Forbidden,
    /// The target is missing, inaccessible, or a directory without an index.
    NotFound,
    /// Unexpected failure while decoding the path or opening the file.
    Internal(io::Error),
}

impl From<ResolveError> for ServeError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Outside => Self::Forbidden,
            ResolveError::Decode => Self::Internal(io::Error::new(
                io::ErrorKind::InvalidData,
                "request path is not valid UTF-8 after percent-decoding",
            )),
        }
    }
}

/// Serve `raw_path` from the site root.
///
/// Paths ending in `/` are rewritten to their `index.html` before
/// resolution; a path that still names a directory afterwards gets the
/// redirect treatment in [`serve_directory`].
pub async fn serve(site_root: &Path, raw_path: &str) -> Result<Response<ResponseBody>, ServeError> {
    let mut request_path = resolve::decode_path(raw_path)?;

    // Default document for directory-style requests
    if request_path.ends_with('/') {
        request_path.push_str("index.html");
    }

    let full_path = resolve::confine(site_root, &request_path)?;

    let metadata = fs::metadata(&full_path)
        .await
        .map_err(|_| ServeError::NotFound)?;

    if metadata.is_dir() {
        return serve_directory(raw_path, &full_path).await;
    }

    let extension = full_path.extension().and_then(|e| e.to_str());
    let content_type = mime::content_type(extension);
    let cache = CachePolicy::for_extension(extension);

    let file = fs::File::open(&full_path)
        .await
        .map_err(ServeError::Internal)?;

    Ok(response::build_file_response(
        file,
        metadata.len(),
        content_type,
        cache,
    ))
}

/// Redirect a bare directory request to its index page.
///
/// The Location is the original request path canonicalized to exactly one
/// trailing slash. Directories without an `index.html` are indistinguishable
/// from missing paths.
async fn serve_directory(
    raw_path: &str,
    dir: &Path,
) -> Result<Response<ResponseBody>, ServeError> {
    let index = dir.join("index.html");
    match fs::metadata(&index).await {
        Ok(meta) if meta.is_file() => {
            let location = format!("{}/", raw_path.trim_end_matches('/'));
            Ok(response::build_redirect_response(&location))
        }
        _ => Err(ServeError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn site_fixture() -> TempDir {
        let root = TempDir::new().unwrap();
        std_fs::write(root.path().join("index.html"), "<html>home</html>").unwrap();
        std_fs::write(root.path().join("style.css"), "body {}\n").unwrap();
        std_fs::write(root.path().join("data.xyz"), "opaque").unwrap();
        std_fs::create_dir(root.path().join("news")).unwrap();
        std_fs::write(root.path().join("news/index.html"), "<html>news</html>").unwrap();
        std_fs::create_dir(root.path().join("empty")).unwrap();
        root
    }

    #[tokio::test]
    async fn test_css_gets_immutable_cache() {
        let root = site_fixture();
        let resp = serve(root.path(), "/style.css").await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/css; charset=utf-8");
        assert_eq!(
            resp.headers()["Cache-Control"],
            "public, max-age=31536000, immutable"
        );
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"body {}\n");
    }

    #[tokio::test]
    async fn test_html_gets_no_cache() {
        let root = site_fixture();
        let resp = serve(root.path(), "/index.html").await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
        assert_eq!(resp.headers()["Cache-Control"], "no-cache");
    }

    #[tokio::test]
    async fn test_trailing_slash_serves_index() {
        let root = site_fixture();
        let resp = serve(root.path(), "/").await.unwrap();
        assert_eq!(resp.status(), 200);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<html>home</html>");

        let resp = serve(root.path(), "/news/").await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Cache-Control"], "no-cache");
    }

    #[tokio::test]
    async fn test_directory_redirects_to_index() {
        let root = site_fixture();
        let resp = serve(root.path(), "/news").await.unwrap();
        assert_eq!(resp.status(), 302);
        assert_eq!(resp.headers()["Location"], "/news/");
    }

    #[tokio::test]
    async fn test_directory_without_index_is_not_found() {
        let root = site_fixture();
        for path in ["/empty", "/empty/"] {
            let err = serve(root.path(), path).await.unwrap_err();
            assert!(matches!(err, ServeError::NotFound), "{path}");
        }
    }

    #[tokio::test]
    async fn test_missing_path_is_not_found() {
        let root = site_fixture();
        let err = serve(root.path(), "/missing.html").await.unwrap_err();
        assert!(matches!(err, ServeError::NotFound));
    }

    #[tokio::test]
    async fn test_traversal_is_forbidden() {
        let root = site_fixture();
        for path in [
            "/../../etc/passwd",
            "/%2e%2e/%2e%2e/etc/passwd",
            "/..%5c..%5cetc%5cpasswd",
        ] {
            let err = serve(root.path(), path).await.unwrap_err();
            assert!(matches!(err, ServeError::Forbidden), "{path}");
        }
    }

    #[tokio::test]
    async fn test_unknown_extension_is_octet_stream() {
        let root = site_fixture();
        let resp = serve(root.path(), "/data.xyz").await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/octet-stream");
    }

    #[tokio::test]
    async fn test_repeated_requests_are_identical() {
        let root = site_fixture();
        let first = serve(root.path(), "/style.css").await.unwrap();
        let second = serve(root.path(), "/style.css").await.unwrap();
        assert_eq!(first.status(), second.status());
        assert_eq!(first.headers(), second.headers());
    }
}
