use cookiesweep::cleanup::memory::MemoryBrowser;
use cookiesweep::cookies::cookie::Cookie;
use cookiesweep::cookies::domain::{is_in_list, is_match, normalize};
use cookiesweep::cookies::risk::{CookiePatterns, NamePattern, RiskAssessor, RiskLevel, NO_RISK_REASON};
use cookiesweep::cookies::stats::CookieStats;
use cookiesweep::{evaluate_risk, is_sensitive};
use url::Url;

#[test]
fn test_normalize_idempotent() {
    for d in ["", ".", "..example.com", ".Example.COM", "sub.EXAMPLE.com", "example.com."] {
        let once = normalize(d);
        assert_eq!(normalize(&once), once, "{d}");
        assert!(!once.chars().any(|c| c.is_ascii_uppercase()), "{d}");
    }
    assert_eq!(normalize(".Example.COM"), "example.com");
    // Only one leading dot is stripped.
    assert_eq!(normalize("..example.com"), ".example.com");
}

#[test]
fn test_match_symmetry() {
    let domains = [
        "example.com",
        ".example.com",
        "sub.example.com",
        "a.b.example.com",
        "notexample.com",
        "other.org",
        "",
    ];
    for a in domains {
        for b in domains {
            assert_eq!(is_match(a, b), is_match(b, a), "{a} vs {b}");
        }
    }

    assert!(is_match("sub.example.com", "example.com"));
    assert!(!is_match("notexample.com", "example.com"));
    assert!(is_match("", ""));
    assert!(!is_match("", "example.com"));
}

#[test]
fn test_empty_list_never_matches() {
    let empty: [&str; 0] = [];
    for d in ["example.com", "", "."] {
        assert!(!is_in_list(d, &empty));
    }
    assert!(is_in_list("www.example.com", &["other.org", "example.com"]));
}

#[test]
fn test_first_party_plain_cookie_is_medium() {
    let cookie = Cookie::new("prefs", "dark", "example.com");
    let risk = evaluate_risk(&cookie, Some("example.com"));

    assert_eq!(risk.level, RiskLevel::Medium);
    assert_eq!(risk, evaluate_risk(&cookie, Some("example.com")));
}

#[test]
fn test_third_party_tracker_is_high() {
    let cookie = Cookie::new("_ga", "GA1.2.3", "ads.example.net")
        .with_secure(true)
        .with_http_only(true);
    let risk = evaluate_risk(&cookie, Some("example.com"));

    assert_eq!(risk.level, RiskLevel::High);
    assert!(risk.reason.contains("; "));
}

#[test]
fn test_hardened_first_party_is_low() {
    let cookie = Cookie::new("prefs", "dark", "example.com")
        .with_secure(true)
        .with_http_only(true);

    let risk = evaluate_risk(&cookie, Some("https://www.example.com/page"));
    assert_eq!(risk.level, RiskLevel::Low);
    assert_eq!(risk.reason, NO_RISK_REASON);
}

#[test]
fn test_garbage_active_site_means_no_context() {
    let cookie = Cookie::new("prefs", "dark", "example.com")
        .with_secure(true)
        .with_http_only(true);

    for site in ["", "http://", "::::", "not a url at all"] {
        assert_eq!(evaluate_risk(&cookie, Some(site)).level, RiskLevel::Low, "{site}");
    }
}

#[test]
fn test_sensitivity_is_independent() {
    assert!(is_sensitive(&Cookie::new("PHPSESSID", "x", "example.com")));
    assert!(is_sensitive(&Cookie::new("auth_token", "x", "example.com")));
    assert!(!is_sensitive(&Cookie::new("theme", "x", "example.com")));
}

#[test]
fn test_custom_patterns() {
    let assessor = RiskAssessor::new(
        CookiePatterns::empty().tracking(NamePattern::prefix("acme_")),
    );
    let cookie = Cookie::new("acme_id", "1", "example.com")
        .with_secure(true)
        .with_http_only(true);

    assert!(assessor.is_tracking(&cookie));
    assert!(!assessor.is_tracking(&Cookie::new("_ga", "1", "example.com")));
    assert_eq!(assessor.assess(&cookie, Some("example.com")).level, RiskLevel::Medium);
}

#[test]
fn test_stats_from_set_cookie_lines() {
    let jar = MemoryBrowser::new();
    let url = Url::parse("https://www.example.com/").unwrap();
    jar.parse_and_set(&url, "sid=1; Secure; HttpOnly");
    jar.parse_and_set(&url, "_ga=2; Domain=example.com; Max-Age=600");
    jar.insert(Cookie::new("x", "y", "tracker.net"));

    let stats = CookieStats::collect(&jar.cookies(), Some("example.com"), &CookiePatterns::default());
    assert_eq!(stats.total, 3);
    assert_eq!(stats.current, 2);
    assert_eq!(stats.session, 1);
    assert_eq!(stats.persistent, 1);
    assert_eq!(stats.third_party, 1);
    assert_eq!(stats.tracking, 1);
}
