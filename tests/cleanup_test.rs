use std::sync::Arc;

use cookiesweep::base::error::{BrowserError, CleanupError};
use cookiesweep::cleanup::browser::SiteDataKind;
use cookiesweep::cleanup::memory::MemoryBrowser;
use cookiesweep::cleanup::orchestrator::{CleanupOptions, CleanupOrchestrator};
use cookiesweep::cookies::cookie::Cookie;
use cookiesweep::cookies::domain;
use cookiesweep::policy::domainlist::DomainList;
use cookiesweep::policy::settings::{ClearType, Mode, Policy};
use cookiesweep::{is_target, run_cleanup};
use time::{Duration, OffsetDateTime};

/// Two cookies on example.com (one session, one persistent) and one on other.com.
fn three_cookie_store() -> MemoryBrowser {
    let expires = OffsetDateTime::now_utc() + Duration::days(30);
    MemoryBrowser::new()
        .with_cookie(Cookie::new("session", "1", "example.com"))
        .with_cookie(Cookie::new("persistent", "2", ".example.com").with_expiration(expires))
        .with_cookie(Cookie::new("other", "3", "other.com"))
}

fn matches_example(d: &str) -> bool {
    domain::is_match(d, "example.com")
}

#[tokio::test]
async fn test_clear_all_types_for_matching_domain() {
    let browser = three_cookie_store();
    let result = run_cleanup(&browser, matches_example, &CleanupOptions::new())
        .await
        .unwrap();

    assert_eq!(result.count, 2);
    assert_eq!(result.cleared_domains.len(), 1);
    assert!(result.cleared_domains.contains("example.com"));
    assert_eq!(browser.len(), 1);
}

#[tokio::test]
async fn test_clear_session_only() {
    let browser = three_cookie_store();
    let options = CleanupOptions::new().clear_type(ClearType::Session);
    let result = run_cleanup(&browser, matches_example, &options).await.unwrap();

    assert_eq!(result.count, 1);
    assert!(browser.cookies().iter().any(|c| c.name == "persistent"));
}

#[tokio::test]
async fn test_clear_persistent_only() {
    let browser = three_cookie_store();
    let options = CleanupOptions::new().clear_type(ClearType::Persistent);
    let result = run_cleanup(&browser, matches_example, &options).await.unwrap();

    assert_eq!(result.count, 1);
    assert!(browser.cookies().iter().any(|c| c.name == "session"));
}

#[tokio::test]
async fn test_rejected_removal_is_not_counted() {
    let browser = three_cookie_store();
    browser.reject_removal("persistent");

    let result = run_cleanup(&browser, matches_example, &CleanupOptions::new())
        .await
        .unwrap();
    assert_eq!(result.count, 1);
    assert!(result.cleared_domains.contains("example.com"));
}

#[tokio::test]
async fn test_absent_result_is_not_counted() {
    let browser = three_cookie_store();
    browser.absent_removal("session");
    browser.absent_removal("persistent");

    let result = run_cleanup(&browser, matches_example, &CleanupOptions::new())
        .await
        .unwrap();
    assert_eq!(result.count, 0);
    assert!(result.cleared_domains.is_empty());
}

#[tokio::test]
async fn test_empty_store_is_zero_not_error() {
    let browser = MemoryBrowser::new();
    let result = run_cleanup(&browser, |_| true, &CleanupOptions::new())
        .await
        .unwrap();

    assert_eq!(result.count, 0);
    assert!(result.cleared_domains.is_empty());
}

#[tokio::test]
async fn test_enumeration_failure_is_error() {
    let browser = three_cookie_store();
    browser.fail_enumeration(true);

    let err = run_cleanup(&browser, |_| true, &CleanupOptions::new())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CleanupError::Read(BrowserError::unavailable("cookies.getAll"))
    );
    assert_eq!(browser.len(), 3);
}

#[tokio::test]
async fn test_site_data_purged_for_cleared_domains_only() {
    let browser = three_cookie_store();
    browser.reject_removal("other");
    let options = CleanupOptions::new()
        .clear_cache(true)
        .clear_local_storage(true);

    let result = run_cleanup(&browser, |_| true, &options).await.unwrap();

    assert_eq!(result.count, 2);
    assert_eq!(
        result.site_data_purged,
        vec![SiteDataKind::Cache, SiteDataKind::LocalStorage]
    );
    assert_eq!(
        browser.purge_requests(SiteDataKind::Cache),
        vec![vec![
            "http://example.com".to_string(),
            "https://example.com".to_string()
        ]]
    );
    assert!(browser.purge_requests(SiteDataKind::IndexedDb).is_empty());
}

#[tokio::test]
async fn test_no_purge_when_nothing_removed() {
    let browser = three_cookie_store();
    let options = CleanupOptions::new().clear_cache(true).clear_indexed_db(true);

    let result = run_cleanup(&browser, |d| d == "nowhere.test", &options)
        .await
        .unwrap();

    assert_eq!(result.count, 0);
    assert_eq!(browser.purge_count(), 0);
}

#[tokio::test]
async fn test_failing_purge_kind_does_not_block_others() {
    let browser = three_cookie_store();
    browser.fail_site_data(SiteDataKind::LocalStorage);
    let options = CleanupOptions::new()
        .clear_cache(true)
        .clear_local_storage(true)
        .clear_indexed_db(true);

    let result = run_cleanup(&browser, matches_example, &options).await.unwrap();

    assert_eq!(result.count, 2);
    assert_eq!(
        result.site_data_purged,
        vec![SiteDataKind::Cache, SiteDataKind::IndexedDb]
    );
    assert_eq!(browser.purge_count(), 3);
}

#[tokio::test]
async fn test_policy_predicates() {
    let list: DomainList = ["example.com"].into_iter().collect();

    let whitelist = Policy::new().mode(Mode::Whitelist);
    let browser = three_cookie_store();
    let result = run_cleanup(&browser, |d| is_target(d, &whitelist, &list), &CleanupOptions::new())
        .await
        .unwrap();
    assert_eq!(result.count, 1);
    assert!(result.cleared_domains.contains("other.com"));

    let blacklist = Policy::new().mode(Mode::Blacklist);
    let orchestrator = CleanupOrchestrator::new(three_cookie_store());
    let result = orchestrator.clear_by_policy(&blacklist, &list).await.unwrap();
    assert_eq!(result.count, 2);
    assert_eq!(orchestrator.browser().len(), 1);
}

#[tokio::test]
async fn test_store_scoped_removal() {
    let browser = MemoryBrowser::new()
        .with_cookie(Cookie::new("id", "a", "example.com").with_store_id("0"))
        .with_cookie(Cookie::new("id", "b", "example.com").with_store_id("1"));

    let result = run_cleanup(&browser, |_| true, &CleanupOptions::new())
        .await
        .unwrap();
    assert_eq!(result.count, 2);
    assert!(browser.is_empty());
}

#[tokio::test]
async fn test_many_concurrent_removals() {
    let browser = Arc::new(MemoryBrowser::new());
    for i in 0..200 {
        browser.insert(
            Cookie::new(format!("c{i}"), "v", format!("site{}.example", i % 20)).with_secure(i % 2 == 0),
        );
    }
    browser.reject_removal("c7");

    let orchestrator = CleanupOrchestrator::new(browser.clone());
    let result = orchestrator.run_all(&CleanupOptions::new()).await.unwrap();

    assert_eq!(result.count, 199);
    assert_eq!(result.cleared_domains.len(), 20);
    assert_eq!(browser.len(), 1);
}

#[tokio::test]
async fn test_host_only_and_domain_cookie_both_counted() {
    let browser = MemoryBrowser::new()
        .with_cookie(Cookie::new("sid", "1", "example.com"))
        .with_cookie(Cookie::new("sid", "2", ".example.com"));
    assert_eq!(browser.len(), 2);

    let result = run_cleanup(&browser, |_| true, &CleanupOptions::new())
        .await
        .unwrap();
    assert_eq!(result.count, 2);
    assert!(browser.is_empty());
}
