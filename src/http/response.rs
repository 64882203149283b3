//! HTTP response building module
//!
//! Provides builders for the handful of response shapes the server emits,
//! decoupled from path resolution and filesystem logic.

use crate::http::cache::CachePolicy;
use crate::logger;
use async_stream::stream;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::Response;
use tokio::io::AsyncReadExt;

/// Body type shared by all responses: streamed file chunks on the success
/// path, buffered plain text everywhere else.
pub type ResponseBody = UnsyncBoxBody<Bytes, std::io::Error>;

/// How much of a file is read per poll of the body stream.
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Wrap an in-memory payload as a response body.
fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Stream a file as the response body, one chunk per poll.
///
/// The file is only read when the connection is ready for more data, so a
/// large download holds at most one chunk in memory. Dropping the body
/// (client disconnect) closes the file.
fn file_body(file: tokio::fs::File) -> ResponseBody {
    let chunks = stream! {
        let mut file = file;
        let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
        loop {
            match file.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => yield Ok(Frame::data(Bytes::copy_from_slice(&buf[..n]))),
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    };
    StreamBody::new(chunks).boxed_unsync()
}

/// Build a plain-text response with the default error cache policy.
fn build_plain_response(status: u16, body: &'static str) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .header("Content-Length", body.len())
        .header("Cache-Control", CachePolicy::Default.header_value())
        .body(full(body))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(full(body))
        })
}

/// Build 403 Forbidden response
pub fn build_403_response() -> Response<ResponseBody> {
    build_plain_response(403, "Forbidden\n")
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    build_plain_response(404, "Not Found\n")
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<ResponseBody> {
    build_plain_response(500, "Internal Server Error\n")
}

/// Build 302 redirect response for a directory request
pub fn build_redirect_response(location: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(302)
        .header("Location", location)
        .body(full(""))
        .unwrap_or_else(|e| {
            log_build_error(302, &e);
            build_500_response()
        })
}

/// Build 200 OK response streaming the file's bytes
pub fn build_file_response(
    file: tokio::fs::File,
    content_length: u64,
    content_type: &'static str,
    cache: CachePolicy,
) -> Response<ResponseBody> {
    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Cache-Control", cache.header_value())
        .body(file_body(file))
        .unwrap_or_else(|e| {
            log_build_error(200, &e);
            build_500_response()
        })
}

/// Log response build error
fn log_build_error(status: u16, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_error_responses_carry_exact_bodies() {
        for (resp, expected_status, expected_body) in [
            (build_403_response(), 403, "Forbidden\n"),
            (build_404_response(), 404, "Not Found\n"),
            (build_500_response(), 500, "Internal Server Error\n"),
        ] {
            assert_eq!(resp.status(), expected_status);
            assert_eq!(resp.headers()["Content-Type"], "text/plain");
            assert_eq!(resp.headers()["Cache-Control"], "public, max-age=3600");
            assert_eq!(
                resp.headers()["Content-Length"],
                expected_body.len().to_string().as_str()
            );
            let body = resp.into_body().collect().await.unwrap().to_bytes();
            assert_eq!(&body[..], expected_body.as_bytes());
        }
    }

    #[tokio::test]
    async fn test_redirect_location() {
        let resp = build_redirect_response("/news/");
        assert_eq!(resp.status(), 302);
        assert_eq!(resp.headers()["Location"], "/news/");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_file_response_streams_contents() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"body {}\n").unwrap();

        let file = tokio::fs::File::open(tmp.path()).await.unwrap();
        let resp = build_file_response(file, 8, "text/css; charset=utf-8", CachePolicy::Immutable);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/css; charset=utf-8");
        assert_eq!(
            resp.headers()["Cache-Control"],
            "public, max-age=31536000, immutable"
        );
        assert_eq!(resp.headers()["Content-Length"], "8");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"body {}\n");
    }
}
