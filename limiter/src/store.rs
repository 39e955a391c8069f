use std::time::Instant;

use dashmap::DashMap;

use crate::policy::WindowPolicy;

#[derive(Debug, Clone, Copy)]
struct WindowState {
    count: u32,
    reset_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { reset_at: Instant },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }
}

/// Per-client request counters, one fixed window per key.
///
/// Holds at most `max_keys` entries. A new key arriving at capacity first
/// drops expired windows, then the window closest to its reset.
pub struct FixedWindowStore {
    entries: DashMap<String, WindowState>,
    max_keys: usize,
}

impl FixedWindowStore {
    pub fn new(max_keys: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_keys: max_keys.max(1),
        }
    }

    pub fn check(&self, key: &str, policy: &WindowPolicy, now: Instant) -> Decision {
        if !self.entries.contains_key(key) && self.entries.len() >= self.max_keys {
            self.make_room(now);
        }

        let mut entry = self.entries.entry(key.to_string()).or_insert(WindowState {
            count: 0,
            reset_at: now,
        });
        let state = entry.value_mut();

        if state.count == 0 || now > state.reset_at {
            *state = WindowState {
                count: 1,
                reset_at: now + policy.window,
            };
            return Decision::Allowed {
                remaining: policy.max_requests.saturating_sub(1),
            };
        }

        if state.count >= policy.max_requests {
            return Decision::Limited {
                reset_at: state.reset_at,
            };
        }

        state.count += 1;
        Decision::Allowed {
            remaining: policy.max_requests - state.count,
        }
    }

    /// Drops every window whose reset time has passed. Returns how many went.
    pub fn sweep(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, state| now <= state.reset_at);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn make_room(&self, now: Instant) {
        let swept = self.sweep(now);
        if swept > 0 {
            log::debug!("Rate limit store swept {} expired windows", swept);
        }
        if self.entries.len() < self.max_keys {
            return;
        }

        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().reset_at)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}
