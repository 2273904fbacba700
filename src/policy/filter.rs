//! Policy-derived cleanup targeting.

use crate::policy::domainlist::DomainList;
use crate::policy::settings::{Mode, Policy};

/// Whether `domain` is a cleanup target under `policy`.
///
/// - whitelist mode: target iff the domain is **not** in `list`
/// - blacklist mode: target iff the domain **is** in `list`
pub fn is_target(domain: &str, policy: &Policy, list: &DomainList) -> bool {
    match policy.mode {
        Mode::Whitelist => !list.contains(domain),
        Mode::Blacklist => list.contains(domain),
    }
}

/// Owned predicate form of [`is_target`], for passing to the orchestrator.
#[derive(Debug, Clone)]
pub struct PolicyFilter {
    policy: Policy,
    list: DomainList,
}

impl PolicyFilter {
    pub fn new(policy: &Policy, list: DomainList) -> Self {
        Self {
            policy: policy.clone(),
            list,
        }
    }

    pub fn mode(&self) -> Mode {
        self.policy.mode
    }

    pub fn is_target(&self, domain: &str) -> bool {
        is_target(domain, &self.policy, &self.list)
    }
}
