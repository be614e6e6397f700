#![forbid(unsafe_code)]

//! Declared fixed-period subscriptions.
//!
//! # How it works
//!
//! 1. `Model::subscriptions()` returns the set of active [`Every`] values.
//! 2. After each update the runtime reconciles that set against what is
//!    running: new ids start, missing ids stop, unchanged ids keep their
//!    schedule.
//! 3. On every step the runtime polls running subscriptions; each one that
//!    is due produces one message, routed through `Model::update()`.
//!
//! A subscription that falls behind (the host stalled for several periods)
//! fires once and skips ahead instead of replaying every missed period.

use core::time::Duration;
use std::collections::HashSet;

use chrono::NaiveDateTime;

/// Unique identifier for a subscription.
pub type SubId = u64;

/// What a subscription sees when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickContext {
    /// Monotonic time of the step that fired the subscription.
    pub mono: Duration,
    /// Local wall-clock time of that step.
    pub local: NaiveDateTime,
    /// How many times this subscription has fired before (0 on first fire).
    pub fired: u64,
}

/// A subscription that fires at a fixed interval.
pub struct Every<M> {
    id: SubId,
    label: &'static str,
    period: Duration,
    make: Box<dyn Fn(&TickContext) -> M>,
}

impl<M> Every<M> {
    /// Fire every `period`, building each message from the tick context.
    pub fn new(
        id: SubId,
        label: &'static str,
        period: Duration,
        make: impl Fn(&TickContext) -> M + 'static,
    ) -> Self {
        Self {
            id,
            label,
            // A zero period would fire on every step; one millisecond is the floor.
            period: period.max(Duration::from_millis(1)),
            make: Box::new(make),
        }
    }

    #[must_use]
    pub fn id(&self) -> SubId {
        self.id
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl<M> std::fmt::Debug for Every<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Every")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

struct RunningSubscription<M> {
    sub: Every<M>,
    next_due: Duration,
    fired: u64,
}

/// Lifecycle manager for running subscriptions.
pub(crate) struct SubscriptionManager<M> {
    active: Vec<RunningSubscription<M>>,
}

impl<M> SubscriptionManager<M> {
    pub(crate) fn new() -> Self {
        Self { active: Vec::new() }
    }

    /// Start new ids, stop missing ids, keep the rest untouched.
    pub(crate) fn reconcile(&mut self, declared: Vec<Every<M>>, now: Duration) {
        let new_ids: HashSet<SubId> = declared.iter().map(Every::id).collect();

        let mut remaining = Vec::with_capacity(self.active.len());
        for running in self.active.drain(..) {
            if new_ids.contains(&running.sub.id) {
                remaining.push(running);
            } else {
                tracing::debug!(
                    target: "vlab.subscription",
                    sub_id = running.sub.id,
                    label = running.sub.label,
                    fired = running.fired,
                    "stopping subscription"
                );
            }
        }
        self.active = remaining;

        let mut active_ids: HashSet<SubId> = self.active.iter().map(|r| r.sub.id).collect();
        for sub in declared {
            if !active_ids.insert(sub.id) {
                continue;
            }
            tracing::debug!(
                target: "vlab.subscription",
                sub_id = sub.id,
                label = sub.label,
                period_ms = sub.period.as_millis() as u64,
                "starting subscription"
            );
            let next_due = now.saturating_add(sub.period);
            self.active.push(RunningSubscription {
                sub,
                next_due,
                fired: 0,
            });
        }
    }

    /// Collect one message from each due subscription.
    pub(crate) fn poll(&mut self, now: Duration, local: NaiveDateTime) -> Vec<M> {
        let mut out = Vec::new();
        for running in &mut self.active {
            if running.next_due > now {
                continue;
            }
            let ctx = TickContext {
                mono: now,
                local,
                fired: running.fired,
            };
            out.push((running.sub.make)(&ctx));
            running.fired += 1;
            running.next_due = running.next_due.saturating_add(running.sub.period);
            if running.next_due <= now {
                running.next_due = now.saturating_add(running.sub.period);
            }
        }
        out
    }

    pub(crate) fn active_ids(&self) -> Vec<SubId> {
        self.active.iter().map(|r| r.sub.id).collect()
    }

    pub(crate) fn stop_all(&mut self) {
        for running in self.active.drain(..) {
            tracing::debug!(
                target: "vlab.subscription",
                sub_id = running.sub.id,
                label = running.sub.label,
                "stopping subscription"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn local() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    fn secs(v: u64) -> Duration {
        Duration::from_secs(v)
    }

    fn every(id: SubId) -> Every<u64> {
        Every::new(id, "test", secs(1), |ctx| ctx.fired)
    }

    #[test]
    fn starts_new_and_fires_after_period() {
        let mut mgr = SubscriptionManager::new();
        mgr.reconcile(vec![every(1)], secs(0));
        assert!(mgr.poll(Duration::from_millis(999), local()).is_empty());
        assert_eq!(mgr.poll(secs(1), local()), vec![0]);
        assert_eq!(mgr.poll(secs(2), local()), vec![1]);
    }

    #[test]
    fn reconcile_keeps_unchanged_schedule() {
        let mut mgr = SubscriptionManager::new();
        mgr.reconcile(vec![every(1)], secs(0));
        mgr.reconcile(vec![every(1)], Duration::from_millis(900));
        assert_eq!(mgr.poll(secs(1), local()), vec![0]);
    }

    #[test]
    fn reconcile_stops_missing() {
        let mut mgr = SubscriptionManager::new();
        mgr.reconcile(vec![every(1), every(2)], secs(0));
        mgr.reconcile(vec![every(2)], secs(0));
        assert_eq!(mgr.active_ids(), vec![2]);
        mgr.reconcile(Vec::new(), secs(0));
        assert!(mgr.active_ids().is_empty());
        assert!(mgr.poll(secs(10), local()).is_empty());
    }

    #[test]
    fn duplicate_ids_start_once() {
        let mut mgr = SubscriptionManager::new();
        mgr.reconcile(vec![every(7), every(7)], secs(0));
        assert_eq!(mgr.active_ids(), vec![7]);
    }

    #[test]
    fn stall_fires_once_then_skips_ahead() {
        let mut mgr = SubscriptionManager::new();
        mgr.reconcile(vec![every(1)], secs(0));
        assert_eq!(mgr.poll(secs(10), local()).len(), 1);
        assert!(mgr.poll(Duration::from_millis(10_500), local()).is_empty());
        assert_eq!(mgr.poll(secs(11), local()).len(), 1);
    }

    #[test]
    fn redeclared_subscription_starts_fresh() {
        let mut mgr = SubscriptionManager::new();
        mgr.reconcile(vec![every(1)], secs(0));
        assert_eq!(mgr.poll(secs(1), local()), vec![0]);
        mgr.reconcile(Vec::new(), Duration::from_millis(1_500));
        mgr.reconcile(vec![every(1)], Duration::from_millis(1_800));
        assert!(mgr.poll(secs(2), local()).is_empty());
        assert_eq!(mgr.poll(Duration::from_millis(2_800), local()), vec![0]);
    }

    #[test]
    fn stop_all_clears() {
        let mut mgr = SubscriptionManager::new();
        mgr.reconcile(vec![every(1)], secs(0));
        mgr.stop_all();
        assert!(mgr.active_ids().is_empty());
    }
}
