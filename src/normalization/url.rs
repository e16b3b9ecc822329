// src/normalization/url.rs
use once_cell::sync::Lazy;
use regex::Regex;

static SCHEME_AND_WWW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.)?").expect("static social URL pattern is valid")
});

/// Strips the `http(s)://` scheme and a leading `www.` from a social profile URL,
/// then lower-cases it.
pub fn normalize_social_url(url: &str) -> String {
    SCHEME_AND_WWW.replace(url.trim(), "").to_lowercase()
}
