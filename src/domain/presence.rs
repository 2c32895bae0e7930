//! Debounced client presence derived from a racy strong reference count.
//!
//! The transport's count can transiently read low during ordinary call
//! traffic. [`PresenceTracker`] only reports "no clients" after the low
//! reading persisted across [`NO_CLIENT_REPEAT_LIMIT`] interval polls, and
//! a one-shot guarantee makes a handle that was handed out and dropped
//! before the next poll still count as a client.

use super::StrongRefCount;

/// Consecutive interval polls without clients required before "no
/// clients" is reported.
pub const NO_CLIENT_REPEAT_LIMIT: u32 = 2;

/// Strong references the registry itself holds on a registered node.
pub const DEFAULT_REF_BASELINE: usize = 1;

/// Outcome of one [`PresenceTracker::evaluate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceDecision {
    /// No usable count; nothing was evaluated.
    Unknown,
    /// Evaluated, nothing to report.
    NoChange,
    /// Client callbacks must be told `has_clients`.
    Notify {
        /// Value to deliver.
        has_clients: bool,
    },
}

/// Hysteretic `has_clients` state for one registered implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceTracker {
    has_clients: bool,
    guarantee_client: bool,
    no_clients_streak: u32,
    baseline: usize,
}

impl PresenceTracker {
    /// Creates a tracker assuming the registry holds
    /// [`DEFAULT_REF_BASELINE`] references itself.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_baseline(DEFAULT_REF_BASELINE)
    }

    /// Creates a tracker for a transport where the registry holds
    /// `baseline` references itself. A count above `baseline` means
    /// external clients exist.
    #[must_use]
    pub const fn with_baseline(baseline: usize) -> Self {
        Self {
            has_clients: false,
            guarantee_client: false,
            no_clients_streak: 0,
            baseline,
        }
    }

    /// Feeds one reading into the tracker.
    ///
    /// `count` is `None` when there is no remote handle to ask. A `None` or
    /// [`StrongRefCount::Unsupported`] reading yields
    /// [`PresenceDecision::Unknown`] and leaves the state untouched.
    pub fn evaluate(&mut self, count: Option<StrongRefCount>, interval_poll: bool) -> PresenceDecision {
        let Some(count) = count.and_then(StrongRefCount::known) else {
            return PresenceDecision::Unknown;
        };
        let now_has_clients = count > self.baseline;

        let mut decision = PresenceDecision::NoChange;

        // first client, or a handed-out handle that was already dropped
        if (now_has_clients && !self.has_clients) || (self.guarantee_client && !now_has_clients) {
            decision = self.fire(true);
        }

        if interval_poll && !now_has_clients && self.has_clients {
            self.no_clients_streak = self.no_clients_streak.saturating_add(1);
        }

        if self.no_clients_streak >= NO_CLIENT_REPEAT_LIMIT {
            decision = self.fire(false);
        }

        self.guarantee_client = false;
        decision
    }

    /// Makes the next [`Self::evaluate`] report clients even if the count
    /// has already dropped back to the baseline.
    pub fn guarantee_client(&mut self) {
        self.guarantee_client = true;
    }

    /// Restores the initial state, keeping the baseline.
    pub fn reset(&mut self) {
        *self = Self::with_baseline(self.baseline);
    }

    /// Last reported presence.
    #[must_use]
    pub const fn has_clients(&self) -> bool {
        self.has_clients
    }

    /// Whether a guarantee is pending.
    #[must_use]
    pub const fn is_client_guaranteed(&self) -> bool {
        self.guarantee_client
    }

    /// Consecutive interval polls that saw no clients since the last
    /// notification.
    #[must_use]
    pub const fn no_clients_streak(&self) -> u32 {
        self.no_clients_streak
    }

    /// Reference baseline in effect.
    #[must_use]
    pub const fn baseline(&self) -> usize {
        self.baseline
    }

    fn fire(&mut self, has_clients: bool) -> PresenceDecision {
        self.no_clients_streak = 0;
        self.has_clients = has_clients;
        PresenceDecision::Notify { has_clients }
    }
}

impl Default for PresenceTracker {
    fn default() -> Self {
        Self::new()
    }
}
