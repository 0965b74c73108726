//! URL utilities for resolving media and link targets.

use url::Url;

/// Schemes kept verbatim instead of being resolved.
const OPAQUE_PREFIXES: [&str; 4] = ["data:", "javascript:", "mailto:", "tel:"];

/// Parse an absolute `http(s)` URL that has a host.
#[must_use]
pub fn parse_absolute(s: &str) -> Option<Url> {
    let s = s.trim();
    if !starts_with_ignore_case(s, "http://") && !starts_with_ignore_case(s, "https://") {
        return None;
    }
    Url::parse(s).ok().filter(|url| url.host().is_some())
}

/// Parse a configured base URL. Only absolute `http(s)` URLs qualify.
#[must_use]
pub fn parse_base_url(s: &str) -> Option<Url> {
    parse_absolute(s)
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len()).is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Resolve `raw` against `base`.
///
/// Without a base the value is returned trimmed but otherwise as-is; opaque
/// schemes (`data:`, `mailto:` ...) are never rewritten, and values the
/// `url` crate cannot join are kept unchanged.
#[must_use]
pub fn resolve(raw: &str, base: Option<&Url>) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if OPAQUE_PREFIXES.iter().any(|p| starts_with_ignore_case(raw, p)) {
        return raw.to_string();
    }
    if parse_absolute(raw).is_some() {
        return raw.to_string();
    }
    match base {
        Some(base) => base.join(raw).map_or_else(|_| raw.to_string(), |url| url.to_string()),
        None => raw.to_string(),
    }
}

/// Lowercase host of an absolute URL string.
#[must_use]
pub fn host_of(s: &str) -> Option<String> {
    parse_absolute(s).and_then(|url| url.host_str().map(str::to_ascii_lowercase))
}

/// Whether a resolved link leaves the page's site.
///
/// With a base URL the hosts are compared. Without one, any absolute
/// `http(s)` URL counts as external and relative ones as internal.
#[must_use]
pub fn is_external(resolved: &str, base: Option<&Url>) -> bool {
    let Some(target_host) = host_of(resolved) else {
        return false;
    };
    match base.and_then(Url::host_str) {
        Some(base_host) => !target_host.eq_ignore_ascii_case(base_host),
        None => true,
    }
}
