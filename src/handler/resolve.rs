//! Request path resolution
//!
//! Turns a raw URL path into an absolute filesystem path confined to the
//! site root. Resolution is purely lexical: `..` segments are collapsed
//! before the containment check, and nothing here touches the filesystem,
//! so an escaping path is rejected without leaking whether its target
//! exists.

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Why a raw path could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// Percent-decoding produced invalid UTF-8.
    Decode,
    /// The resolved path falls outside the site root.
    Outside,
}

/// Percent-decode a raw URL path and normalize separators.
///
/// Backslashes become forward slashes so that `..\` tricks resolve the same
/// way as `../` regardless of platform.
pub fn decode_path(raw: &str) -> Result<String, ResolveError> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| ResolveError::Decode)?;
    Ok(decoded.replace('\\', "/"))
}

/// Join a decoded request path onto the root and confine the result.
///
/// `..` pops a segment, `.` is skipped, and the joined path must stay at or
/// under `root` (component-wise, so a sibling like `root-backup` does not
/// count as inside).
pub fn confine(root: &Path, request_path: &str) -> Result<PathBuf, ResolveError> {
    let mut resolved = root.to_path_buf();
    for component in Path::new(request_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(segment) => resolved.push(segment),
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return Err(ResolveError::Outside),
        }
    }

    if resolved.starts_with(root) {
        Ok(resolved)
    } else {
        Err(ResolveError::Outside)
    }
}
