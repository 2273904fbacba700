//! Canonical domain comparison.
//!
//! Domains are treated as opaque strings. The only transformation is
//! [`normalize`], and matching is hierarchical: a parent domain and any of
//! its dot-delimited children match each other in both directions.

use url::Url;

/// Strip at most one leading `.` and lower-case the remainder.
pub fn normalize(domain: &str) -> String {
    domain.strip_prefix('.').unwrap_or(domain).to_lowercase()
}

/// Whether two domains are equal or one is a proper dot-delimited suffix of
/// the other.
///
/// `sub.example.com` matches `example.com` (and vice versa), while
/// `notexample.com` does not.
pub fn is_match(a: &str, b: &str) -> bool {
    let a = normalize(a);
    let b = normalize(b);

    if a == b {
        return true;
    }

    let (longer, shorter) = if a.len() > b.len() { (&a, &b) } else { (&b, &a) };
    is_subdomain_of(longer, shorter)
}

/// `child` ends with `.parent`, with a non-empty label before the dot.
fn is_subdomain_of(child: &str, parent: &str) -> bool {
    if parent.is_empty() || child.len() <= parent.len() + 1 {
        return false;
    }

    child.ends_with(parent) && child.as_bytes()[child.len() - parent.len() - 1] == b'.'
}

/// Whether `domain` matches any entry of `list`. An empty list never matches.
pub fn is_in_list<S: AsRef<str>>(domain: &str, list: &[S]) -> bool {
    list.iter().any(|entry| is_match(domain, entry.as_ref()))
}

/// Extract the active-site host from a tab URL or bare host.
///
/// Returns `None` for anything that does not yield a host, so callers can
/// fall back to "no active site" instead of failing.
pub fn active_site(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let parsed = if input.contains("://") {
        Url::parse(input).ok()?
    } else {
        Url::parse(&format!("http://{input}")).ok()?
    };

    let host = parsed.host_str()?;
    if host.is_empty() {
        return None;
    }

    let host = normalize(host);
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}
