//! URL utilities for normalizing video platform links

const CANONICAL_WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const SHORT_LINK_HOST: &str = "youtu.be";
const MOBILE_HOST: &str = "m.youtube.com";
const DESKTOP_HOST: &str = "www.youtube.com";
const EMBED_MARKER: &str = "/embed/";
const LEGACY_VIDEO_MARKER: &str = "/v/";

/// Build the canonical watch URL for a video ID
pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", CANONICAL_WATCH_URL, video_id)
}

/// Take everything after the last occurrence of `marker`, up to any query string
fn id_after<'a>(url: &'a str, marker: &str) -> &'a str {
    let tail = url.rsplit(marker).next().unwrap_or(url);
    tail.split('?').next().unwrap_or(tail)
}

/// Normalize the various video link shapes into the canonical watch URL
///
/// Short links, embed links and legacy `/v/` links are rewritten to
/// `https://www.youtube.com/watch?v=<id>`. Mobile links only get their host
/// swapped. Anything else is returned unchanged.
pub fn normalize_url(url: &str) -> String {
    if url.contains(SHORT_LINK_HOST) {
        return watch_url(id_after(url, "/"));
    }

    let url = if url.contains(MOBILE_HOST) {
        url.replace(MOBILE_HOST, DESKTOP_HOST)
    } else {
        url.to_string()
    };

    if url.contains(EMBED_MARKER) {
        return watch_url(id_after(&url, EMBED_MARKER));
    }

    if url.contains(LEGACY_VIDEO_MARKER) {
        return watch_url(id_after(&url, LEGACY_VIDEO_MARKER));
    }

    url
}

/// Check if URL is a playlist URL
pub fn is_playlist_url(url: &str) -> bool {
    url.contains("playlist?list=") || url.contains("&list=")
}
