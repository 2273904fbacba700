//! Public Suffix List (PSL) integration tests.

use cookiesweep::base::error::DomainError;
use cookiesweep::cookies::psl::{is_public_suffix, is_valid_cookie_domain};
use cookiesweep::policy::domainlist::{validate_domain, DomainList};

#[test]
fn test_tld_is_public_suffix() {
    // Top-level domains are public suffixes
    assert!(is_public_suffix("com"));
    assert!(is_public_suffix("org"));
    assert!(is_public_suffix("net"));
    assert!(is_public_suffix("co.uk"));
    assert!(is_public_suffix("com.au"));
}

#[test]
fn test_domain_not_public_suffix() {
    assert!(!is_public_suffix("example.com"));
    assert!(!is_public_suffix("google.com"));
    assert!(!is_public_suffix("bbc.co.uk"));
    // Unlisted single labels are ordinary hosts
    assert!(!is_public_suffix("localhost"));
    assert!(!is_public_suffix("intranet"));
}

#[test]
fn test_cookie_domain_validation() {
    // (cookie_domain, url_host)
    assert!(is_valid_cookie_domain("example.com", "example.com"));
    assert!(is_valid_cookie_domain("example.com", "sub.example.com"));
    assert!(is_valid_cookie_domain(".Example.com", "SUB.example.com"));

    assert!(!is_valid_cookie_domain(".com", "example.com"));
    assert!(!is_valid_cookie_domain("other.com", "example.com"));
    assert!(!is_valid_cookie_domain("ample.com", "example.com"));
}

#[test]
fn test_supercookie_prevention() {
    assert!(!is_valid_cookie_domain("example.com", ".com"));
    assert!(!is_valid_cookie_domain("example.co.uk", ".co.uk"));
    assert!(!is_valid_cookie_domain("user.github.io", ".github.io"));
}

#[test]
fn test_wildcard_tlds() {
    assert!(is_public_suffix("github.io"));
    assert!(!is_public_suffix("user.github.io"));
}

#[test]
fn test_domain_list_refuses_public_suffixes() {
    let mut list = DomainList::new();
    for suffix in ["com", "co.uk", ".github.io"] {
        assert!(
            matches!(list.add(suffix), Err(DomainError::PublicSuffix { .. })),
            "{suffix} should be refused"
        );
    }
    assert!(list.is_empty());

    assert_eq!(validate_domain("bbc.co.uk"), Ok("bbc.co.uk".to_string()));
    assert_eq!(validate_domain("user.github.io"), Ok("user.github.io".to_string()));
}
