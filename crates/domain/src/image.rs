//! Image reference normalization.
//!
//! Maps a user-supplied image reference (direct image link, album/gallery
//! link or bare image id of the image host, or any other URL) to a single
//! canonical display URL. Total over arbitrary input: anything unrecognized
//! maps to `None`.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

const CANONICAL_PREFIX: &str = "https://i.imgur.com/";
const CANONICAL_SUFFIX: &str = ".jpeg";

static DIRECT_LINK: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^https?://i\.imgur\.com/([a-zA-Z0-9]+)(?:\.(?:jpeg|jpg|png|gif|apng|tiff|mp4|webm|pdf))?$",
    )
    .ok()
});

static ALBUM_LINK: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?imgur\.com/(?:a/|gallery/)?([a-zA-Z0-9]+)(?:/?.*)?$").ok()
});

static BARE_ID: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{5,10}$").ok());

/// Rewrites `reference` to the canonical direct-image URL if it matches one
/// of the recognized shorthand forms, passes any other syntactically valid
/// absolute http(s) URL through unchanged and maps everything else to `None`.
///
/// Idempotent: feeding a returned URL back in yields the same URL.
#[must_use]
pub fn normalize(reference: &str) -> Option<String> {
    let reference = reference.trim();

    if reference.is_empty() {
        return None;
    }

    if let Some(id) = first_capture(&DIRECT_LINK, reference) {
        return Some(canonical(id));
    }

    if let Some(id) = first_capture(&ALBUM_LINK, reference) {
        return Some(canonical(id));
    }

    if BARE_ID.as_ref().is_some_and(|re| re.is_match(reference)) {
        return Some(canonical(reference));
    }

    if is_valid_url(reference) {
        return Some(reference.to_string());
    }

    None
}

/// Whether `reference` parses as an absolute URL with an http or https scheme.
#[must_use]
pub fn is_valid_url(reference: &str) -> bool {
    Url::parse(reference).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn first_capture<'a>(pattern: &Option<Regex>, reference: &'a str) -> Option<&'a str> {
    pattern
        .as_ref()?
        .captures(reference)?
        .get(1)
        .map(|m| m.as_str())
}

fn canonical(id: &str) -> String {
    format!("{CANONICAL_PREFIX}{id}{CANONICAL_SUFFIX}")
}
