//! Public Suffix List (PSL) checks.
//!
//! Keeps public suffixes like `com` or `co.uk` out of domain lists, and
//! keeps the in-memory host from accepting supercookies.
//!
//! Uses Mozilla's Public Suffix List via the `psl` crate.

use psl::{List, Psl};

use crate::cookies::domain;

/// Check if a domain is a public suffix (e.g., "com", "co.uk").
/// Returns true if the domain itself is a public suffix.
pub fn is_public_suffix(domain: &str) -> bool {
    let domain_lower = domain::normalize(domain);
    let domain_bytes = domain_lower.as_bytes();

    match List.suffix(domain_bytes) {
        // Unlisted TLDs fall under the implicit "*" rule; only listed ones count.
        Some(suffix) => suffix.is_known() && suffix.as_bytes() == domain_bytes,
        None => false,
    }
}

/// Check if a cookie domain may be set from a given host.
/// The cookie domain must be the host or one of its parents, and
/// must not be a public suffix.
pub fn is_valid_cookie_domain(cookie_domain: &str, url_host: &str) -> bool {
    let cookie_domain = domain::normalize(cookie_domain);
    let url_host = domain::normalize(url_host);

    if is_public_suffix(&cookie_domain) {
        return false;
    }

    url_host == cookie_domain || url_host.ends_with(&format!(".{}", cookie_domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_public_suffix() {
        assert!(is_public_suffix("com"));
        assert!(is_public_suffix("COM"));
        assert!(is_public_suffix(".co.uk"));
        assert!(is_public_suffix("github.io"));
    }

    #[test]
    fn test_not_public_suffix() {
        assert!(!is_public_suffix("example.com"));
        assert!(!is_public_suffix("sub.example.com"));
        assert!(!is_public_suffix("localhost"));
    }

    #[test]
    fn test_valid_cookie_domain() {
        assert!(is_valid_cookie_domain("example.com", "example.com"));
        assert!(is_valid_cookie_domain(".example.com", "sub.example.com"));
        assert!(!is_valid_cookie_domain("com", "example.com"));
        assert!(!is_valid_cookie_domain("other.com", "example.com"));
    }
}
