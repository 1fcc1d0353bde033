// src/checker/normalize.rs
// =============================================================================
// Turns a raw href into an absolute URL string relative to the page it was
// found on.
//
// This is deliberately a plain string function: it never fails and it never
// touches the network. Whether the result is actually requestable is decided
// later, when the checker tries to build a request from it.
//
// Rules (first match wins):
//   1. ""  or a single character   -> base
//   2. "/path"                     -> base without trailing '/' + "/path"
//   3. "#frag"                     -> base + "#frag"
//   4. "www.host"                  -> "https://www.host/"
//   5. "mailto:addr"               -> "addr"
//   6. anything else               -> unchanged
// =============================================================================

/// Resolves `raw` against `base`
///
/// Examples:
///   normalize("https://site.com/", "/blog")   -> "https://site.com/blog"
///   normalize("https://site.com", "#top")     -> "https://site.com#top"
///   normalize("", "www.bing.com")             -> "https://www.bing.com/"
///   normalize("https://site.com", "mailto:a@b.com") -> "a@b.com"
pub fn normalize(base: &str, raw: &str) -> String {
    let mut chars = raw.chars();
    if chars.next().is_none() || chars.next().is_none() {
        return base.to_string();
    }

    if raw.starts_with('/') {
        format!("{}{}", trim_trailing_slash(base), raw)
    } else if raw.starts_with('#') {
        format!("{}{}", base, raw)
    } else if raw.starts_with("www") {
        format!("https://{}/", raw)
    } else if let Some(address) = raw.strip_prefix("mailto:") {
        address.to_string()
    } else {
        raw.to_string()
    }
}

// Removes a single trailing '/', if present
fn trim_trailing_slash(base: &str) -> &str {
    base.strip_suffix('/').unwrap_or(base)
}
