use serde::{Deserialize, Serialize};

use crate::cookies::cookie::Cookie;
use crate::cookies::domain;
use crate::cookies::risk::CookiePatterns;

/// Cookie counters shown next to the active site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieStats {
    /// Every cookie in the store.
    pub total: usize,
    /// Cookies matching the active site.
    pub current: usize,
    /// Session cookies among `current`.
    pub session: usize,
    /// Persistent cookies among `current`.
    pub persistent: usize,
    /// Cookies not matching the active site.
    pub third_party: usize,
    /// Tracking cookies among `current`.
    pub tracking: usize,
}

impl CookieStats {
    /// Count `cookies` relative to `active_site` (already normalized, see
    /// [`domain::active_site`]). Without an active site only `total` is set.
    pub fn collect(cookies: &[Cookie], active_site: Option<&str>, patterns: &CookiePatterns) -> Self {
        let mut stats = CookieStats {
            total: cookies.len(),
            ..Default::default()
        };

        let Some(site) = active_site else {
            return stats;
        };

        for cookie in cookies {
            if !domain::is_match(&cookie.domain, site) {
                stats.third_party += 1;
                continue;
            }

            stats.current += 1;
            if cookie.is_session() {
                stats.session += 1;
            } else {
                stats.persistent += 1;
            }
            if patterns.is_tracking(cookie) {
                stats.tracking += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Duration, OffsetDateTime};

    fn sample() -> Vec<Cookie> {
        let later = OffsetDateTime::now_utc() + Duration::days(1);
        vec![
            Cookie::new("sid", "1", ".example.com"),
            Cookie::new("_ga", "2", "example.com").with_expiration(later),
            Cookie::new("pref", "3", "sub.example.com").with_expiration(later),
            Cookie::new("ad", "4", "tracker.io"),
        ]
    }

    #[test]
    fn test_collect_with_active_site() {
        let stats = CookieStats::collect(&sample(), Some("example.com"), &CookiePatterns::default());

        assert_eq!(
            stats,
            CookieStats {
                total: 4,
                current: 3,
                session: 1,
                persistent: 2,
                third_party: 1,
                tracking: 1,
            }
        );
    }

    #[test]
    fn test_collect_without_active_site() {
        let stats = CookieStats::collect(&sample(), None, &CookiePatterns::default());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.current, 0);
        assert_eq!(stats.third_party, 0);
    }

    #[test]
    fn test_collect_empty() {
        let stats = CookieStats::collect(&[], Some("example.com"), &CookiePatterns::default());
        assert_eq!(stats, CookieStats::default());
    }
}
