//! Outstanding OAuth `state` values
//!
//! Each `/login` issues one; `/callback` consumes it. Entries expire after
//! [`STATE_TTL_SECS`] and the set never holds more than
//! [`MAX_PENDING_STATES`], so abandoned logins cannot accumulate.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// How long a login may take before its state is rejected
pub const STATE_TTL_SECS: i64 = 600;

/// Oldest entries are evicted beyond this
pub const MAX_PENDING_STATES: usize = 64;

#[derive(Debug)]
pub struct PendingStates {
    issued: HashMap<String, DateTime<Utc>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for PendingStates {
    fn default() -> Self {
        Self::with_limits(STATE_TTL_SECS, MAX_PENDING_STATES)
    }
}

impl PendingStates {
    pub fn with_limits(ttl_secs: i64, capacity: usize) -> Self {
        Self {
            issued: HashMap::new(),
            ttl: Duration::seconds(ttl_secs),
            capacity: capacity.max(1),
        }
    }

    /// Record a state issued at `now`, pruning expired and excess entries
    pub fn insert(&mut self, state: String, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.issued.retain(|_, issued_at| now - *issued_at < ttl);

        while self.issued.len() >= self.capacity {
            let oldest = self
                .issued
                .iter()
                .min_by_key(|(_, issued_at)| **issued_at)
                .map(|(s, _)| s.clone());
            match oldest {
                Some(s) => {
                    self.issued.remove(&s);
                    tracing::debug!("Evicted oldest pending OAuth state");
                }
                None => break,
            }
        }

        self.issued.insert(state, now);
    }

    /// Consume `state`; false when unknown or expired
    pub fn take(&mut self, state: &str, now: DateTime<Utc>) -> bool {
        match self.issued.remove(state) {
            Some(issued_at) => now - issued_at < self.ttl,
            None => false,
        }
    }

    pub fn contains(&self, state: &str) -> bool {
        self.issued.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_consumed_once() {
        let now = Utc::now();
        let mut states = PendingStates::default();
        states.insert("abc".to_string(), now);

        assert!(states.take("abc", now + Duration::seconds(30)));
        assert!(!states.take("abc", now + Duration::seconds(31)));
        assert!(states.is_empty());
    }

    #[test]
    fn test_expired_state_rejected() {
        let now = Utc::now();
        let mut states = PendingStates::default();
        states.insert("abc".to_string(), now);

        assert!(!states.take("abc", now + Duration::seconds(STATE_TTL_SECS)));
        assert!(!states.contains("abc"));
    }

    #[test]
    fn test_expired_entries_pruned_on_insert() {
        let now = Utc::now();
        let mut states = PendingStates::default();
        states.insert("old".to_string(), now);
        states.insert("new".to_string(), now + Duration::seconds(STATE_TTL_SECS + 1));

        assert!(!states.contains("old"));
        assert!(states.contains("new"));
        assert_eq!(states.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let now = Utc::now();
        let mut states = PendingStates::with_limits(STATE_TTL_SECS, 3);
        for i in 0..5 {
            states.insert(format!("s{}", i), now + Duration::seconds(i));
        }

        assert_eq!(states.len(), 3);
        assert!(!states.contains("s0"));
        assert!(!states.contains("s1"));
        assert!(states.contains("s4"));
    }
}
