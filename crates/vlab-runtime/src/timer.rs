#![forbid(unsafe_code)]

//! Keyed one-shot timers.
//!
//! # Invariants
//!
//! 1. At most one pending timer per [`TimerId`]; scheduling an id that is
//!    already pending drops the earlier timer.
//! 2. A timer fires at most once. Fired and cancelled timers leave the queue.
//! 3. Due timers are delivered in `(due, scheduling order)` order.

use core::time::Duration;

/// Stable key of a one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(&'static str);

impl TimerId {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

struct PendingTimer<M> {
    id: TimerId,
    due: Duration,
    seq: u64,
    msg: M,
}

/// Pending one-shot timers ordered by due time.
pub struct TimerQueue<M> {
    pending: Vec<PendingTimer<M>>,
    next_seq: u64,
}

impl<M> Default for TimerQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> TimerQueue<M> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    /// Schedule `msg` for `now + delay`, replacing any pending timer with `id`.
    ///
    /// Returns whether a pending timer was replaced.
    pub fn schedule(&mut self, id: TimerId, now: Duration, delay: Duration, msg: M) -> bool {
        let replaced = self.cancel(id);
        if replaced {
            tracing::debug!(target: "vlab.timer", timer = id.name(), "replacing pending timer");
        }
        let due = now.saturating_add(delay);
        tracing::debug!(
            target: "vlab.timer",
            timer = id.name(),
            due_ms = due.as_millis() as u64,
            "timer scheduled"
        );
        self.pending.push(PendingTimer {
            id,
            due,
            seq: self.next_seq,
            msg,
        });
        self.next_seq += 1;
        replaced
    }

    /// Cancel the pending timer with `id`. Returns whether one was pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let Some(pos) = self.pending.iter().position(|t| t.id == id) else {
            return false;
        };
        self.pending.swap_remove(pos);
        true
    }

    /// Cancel everything.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Remove and return the messages of every timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Vec<M> {
        let mut due: Vec<PendingTimer<M>> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|t| (t.due, t.seq));
        due.into_iter()
            .map(|t| {
                tracing::debug!(target: "vlab.timer", timer = t.id.name(), "timer fired");
                t.msg
            })
            .collect()
    }

    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    /// Earliest due time, if anything is pending.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|t| t.due).min()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
