//! crates/teachwave_core/src/admission.rs
//!
//! A per-caller fixed-window request counter that guards the paid completion API.
//!
//! Each caller gets a window that starts at its first request. Requests inside the
//! window increment a counter; once the window has elapsed the next request starts a
//! fresh window. A fixed window admits up to `2 × max_per_window` requests across a
//! window seam (a burst at the end of one window followed by a burst at the start of
//! the next). That imprecision is accepted.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Windows older than this many window lengths are discarded.
pub const EVICTION_WINDOWS: u32 = 5;

/// The rate policy applied to every caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionPolicy {
    pub window: Duration,
    pub max_per_window: u32,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            max_per_window: 20,
        }
    }
}

impl AdmissionPolicy {
    fn eviction_horizon(&self) -> Duration {
        self.window.saturating_mul(EVICTION_WINDOWS)
    }
}

/// The counter state kept for one caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    pub count: u32,
    pub window_start: Instant,
}

impl RateWindow {
    fn starting_at(now: Instant) -> Self {
        Self {
            count: 1,
            window_start: now,
        }
    }
}

struct GateState<K> {
    windows: HashMap<K, RateWindow>,
    last_sweep: Option<Instant>,
}

/// Admits or rejects requests per caller identity.
///
/// The read-modify-write of a caller's window happens under a single mutex, so the
/// gate can be shared across tokio worker threads.
pub struct AdmissionGate<K> {
    policy: AdmissionPolicy,
    state: Mutex<GateState<K>>,
}

impl<K> AdmissionGate<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self {
            policy,
            state: Mutex::new(GateState {
                windows: HashMap::new(),
                last_sweep: None,
            }),
        }
    }

    /// Records a request from `caller` at `now` and reports whether it is admitted.
    pub fn admit(&self, caller: &K, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        self.sweep_if_due(&mut state, now);

        let window = match state.windows.get_mut(caller) {
            Some(window) => {
                if now.saturating_duration_since(window.window_start) > self.policy.window {
                    *window = RateWindow::starting_at(now);
                } else {
                    window.count = window.count.saturating_add(1);
                }
                *window
            }
            None => {
                let window = RateWindow::starting_at(now);
                state.windows.insert(caller.clone(), window);
                window
            }
        };

        window.count <= self.policy.max_per_window
    }

    /// Returns the current window for `caller`, if one is tracked.
    pub fn window_for(&self, caller: &K) -> Option<RateWindow> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.windows.get(caller).copied()
    }

    /// Number of callers currently holding a window.
    pub fn tracked_callers(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.windows.len()
    }

    fn sweep_if_due(&self, state: &mut GateState<K>, now: Instant) {
        let horizon = self.policy.eviction_horizon();
        let last_sweep = *state.last_sweep.get_or_insert(now);
        if now.saturating_duration_since(last_sweep) < horizon {
            return;
        }

        let before = state.windows.len();
        state
            .windows
            .retain(|_, window| now.saturating_duration_since(window.window_start) <= horizon);
        state.last_sweep = Some(now);

        let evicted = before - state.windows.len();
        if evicted > 0 {
            debug!("Evicted {} stale rate windows", evicted);
        }
    }
}

impl<K> Default for AdmissionGate<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new(AdmissionPolicy::default())
    }
}
