//! MIME type table
//!
//! Maps file extensions to the Content-Type header value. The table covers
//! the asset set of a mirrored Webflow site (pages, stylesheets, scripts,
//! images, fonts, media); everything else is served as an opaque download.

/// Get the Content-Type for a file extension.
///
/// The extension is matched case-insensitively and without the leading dot.
/// Unknown or missing extensions fall back to `application/octet-stream`.
pub fn content_type(extension: Option<&str>) -> &'static str {
    let lowered = extension.map(str::to_ascii_lowercase);
    match lowered.as_deref() {
        // Text
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",
        Some("eot") => "application/vnd.ms-fontobject",

        // Media and documents
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("pdf") => "application/pdf",

        // Default
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(content_type(Some("html")), "text/html; charset=utf-8");
        assert_eq!(content_type(Some("css")), "text/css; charset=utf-8");
        assert_eq!(content_type(Some("js")), "text/javascript; charset=utf-8");
        assert_eq!(content_type(Some("mjs")), "text/javascript; charset=utf-8");
        assert_eq!(content_type(Some("json")), "application/json; charset=utf-8");
        assert_eq!(content_type(Some("woff2")), "font/woff2");
        assert_eq!(content_type(Some("mp4")), "video/mp4");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(content_type(Some("HTML")), "text/html; charset=utf-8");
        assert_eq!(content_type(Some("PnG")), "image/png");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(content_type(Some("xyz")), "application/octet-stream");
        assert_eq!(content_type(None), "application/octet-stream");
    }
}
