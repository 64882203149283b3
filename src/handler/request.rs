//! Request handling boundary
//!
//! Every request enters and leaves through `handle_request`: the serve
//! pipeline runs, its error taxonomy is converted to the matching status,
//! and one access-log line is emitted. Nothing that happens in here can
//! tear down the connection task.

use crate::config::AppState;
use crate::handler::static_files::{self, ServeError};
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling.
///
/// Generic over the body type because the body is never read: the method is
/// deliberately not inspected and every verb is answered the same way.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let raw_path = req.uri().path();

    let response = match static_files::serve(&state.site_root, raw_path).await {
        Ok(resp) => resp,
        Err(ServeError::Forbidden) => {
            logger::log_warning(&format!("Blocked path escaping the site root: {raw_path}"));
            http::build_403_response()
        }
        Err(ServeError::NotFound) => http::build_404_response(),
        Err(ServeError::Internal(e)) => {
            logger::log_error(&format!("Failed serving '{raw_path}': {e}"));
            http::build_500_response()
        }
    };

    if state.config.logging.access_log {
        let entry = access_entry(&req, &response, remote_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Assemble the access-log record for a finished exchange.
fn access_entry<B>(
    req: &Request<B>,
    response: &Response<ResponseBody>,
    remote_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        remote_addr.to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    entry.referer = header_value(req, "referer");
    entry.user_agent = header_value(req, "user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: hyper::Version) -> &'static str {
    if version == hyper::Version::HTTP_10 {
        "1.0"
    } else if version == hyper::Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}
