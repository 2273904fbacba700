use time::OffsetDateTime;

use crate::policy::settings::Policy;

/// Whether a scheduled run is due.
///
/// Never due while the interval is disabled. Otherwise due when there has
/// been no run yet, or when at least one full interval has elapsed since
/// `last_run`.
pub fn should_run_scheduled(
    policy: &Policy,
    last_run: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> bool {
    let Some(period) = policy.schedule_interval.period() else {
        return false;
    };

    match last_run {
        None => true,
        Some(last) => now - last >= period,
    }
}
