//! Process-wide outbound network policy.
//!
//! `OOGIRI_NETWORK_POLICY=deny` or a live [`NetworkPolicyGuard`] makes every
//! HTTP collaborator fail before sending anything.

use std::sync::{Mutex, OnceLock};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkPolicy {
    Allow,
    Deny(String),
}

fn state() -> &'static Mutex<NetworkPolicy> {
    static STATE: OnceLock<Mutex<NetworkPolicy>> = OnceLock::new();
    STATE.get_or_init(|| Mutex::new(NetworkPolicy::Allow))
}

/// Restores the previous policy on drop.
pub struct NetworkPolicyGuard {
    previous: NetworkPolicy,
}

impl NetworkPolicyGuard {
    pub fn set(policy: NetworkPolicy) -> Self {
        let mut s = state().lock().unwrap_or_else(|p| p.into_inner());
        let previous = std::mem::replace(&mut *s, policy);
        Self { previous }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self::set(NetworkPolicy::Deny(reason.into()))
    }
}

impl Drop for NetworkPolicyGuard {
    fn drop(&mut self) {
        let mut s = state().lock().unwrap_or_else(|p| p.into_inner());
        *s = self.previous.clone();
    }
}

/// `Err(reason)` when outbound calls to `target` are blocked.
pub fn check_outbound(target: &str) -> Result<(), String> {
    match effective_policy() {
        NetworkPolicy::Allow => Ok(()),
        NetworkPolicy::Deny(reason) => Err(format!(
            "outbound network blocked by policy (target={}): {}",
            target, reason
        )),
    }
}

fn effective_policy() -> NetworkPolicy {
    if let Ok(raw) = std::env::var("OOGIRI_NETWORK_POLICY") {
        if raw.trim().eq_ignore_ascii_case("deny") {
            return NetworkPolicy::Deny("OOGIRI_NETWORK_POLICY=deny".to_string());
        }
    }
    state().lock().unwrap_or_else(|p| p.into_inner()).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn guard_denies_and_restores() {
        assert!(check_outbound("https://example.com").is_ok());
        {
            let _guard = NetworkPolicyGuard::deny("unit test");
            let err = check_outbound("https://example.com").unwrap_err();
            assert!(err.contains("outbound network blocked by policy"));
            assert!(err.contains("example.com"));
            assert!(err.contains("unit test"));
        }
        assert!(check_outbound("https://example.com").is_ok());
    }
}
