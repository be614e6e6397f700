#![forbid(unsafe_code)]

//! Countdown to the next Valentine's Day.
//!
//! The target is fixed once, when the clock starts: the next local
//! midnight of the configured month/day strictly after the start time.
//! Each tick recomputes the remaining time from a fresh wall-clock reading
//! (never by counting ticks), so a stalled host catches up on the next
//! tick. Reaching the target is terminal: the clock reports `Arrived` with
//! all fields zero and the caller stops ticking.
//!
//! Local time is a [`NaiveDateTime`]; daylight-saving transitions are not
//! corrected for.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, info};

/// Countdown tuning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CountdownConfig {
    pub month: u32,
    pub day: u32,
    /// Tick period in milliseconds.
    pub tick_ms: u64,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            month: 2,
            day: 14,
            tick_ms: 1000,
        }
    }
}

impl CountdownConfig {
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        // 2000 is a leap year, so Feb 29 passes here.
        if NaiveDate::from_ymd_opt(2000, self.month, self.day).is_none() {
            errors.push(format!(
                "countdown date {:02}-{:02} is not a calendar day",
                self.month, self.day
            ));
        }
        if self.tick_ms == 0 {
            errors.push("countdown.tick_ms must be > 0".to_owned());
        }
        errors
    }
}

/// Time left, broken into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Remaining {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl Remaining {
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Decompose a non-negative number of whole seconds.
    #[must_use]
    pub const fn from_secs(total: u64) -> Self {
        Self {
            days: total / 86_400,
            hours: ((total % 86_400) / 3_600) as u8,
            minutes: ((total % 3_600) / 60) as u8,
            seconds: (total % 60) as u8,
        }
    }

    /// `(value, unit label)` pairs in display order.
    #[must_use]
    pub fn fields(&self) -> [(u64, &'static str); 4] {
        [
            (self.days, "Days"),
            (u64::from(self.hours), "Hours"),
            (u64::from(self.minutes), "Minutes"),
            (u64::from(self.seconds), "Seconds"),
        ]
    }
}

/// Next occurrence of `month`/`day` at 00:00 strictly after `now`.
///
/// Skips years where the date does not exist (Feb 29). `None` when no
/// occurrence exists within eight years.
#[must_use]
pub fn next_occurrence(now: NaiveDateTime, month: u32, day: u32) -> Option<NaiveDateTime> {
    let year = now.year();
    (0..=8).find_map(|offset| {
        let candidate = NaiveDate::from_ymd_opt(year.checked_add(offset)?, month, day)?
            .and_hms_opt(0, 0, 0)?;
        (candidate > now).then_some(candidate)
    })
}

/// Next Feb 14 00:00 strictly after `now`.
#[must_use]
pub fn next_valentine(now: NaiveDateTime) -> Option<NaiveDateTime> {
    next_occurrence(now, 2, 14)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    Counting(Remaining),
    Arrived,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Counting(Remaining),
    /// This tick crossed the target.
    JustArrived,
    /// Already arrived earlier; nothing changed.
    Idle,
}

/// Countdown state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownClock {
    target: Option<NaiveDateTime>,
    phase: CountdownPhase,
}

impl CountdownClock {
    /// Start counting toward Feb 14 and take the first reading at `now`.
    #[must_use]
    pub fn start(now: NaiveDateTime) -> Self {
        Self::start_with(&CountdownConfig::default(), now)
    }

    #[must_use]
    pub fn start_with(config: &CountdownConfig, now: NaiveDateTime) -> Self {
        let target = next_occurrence(now, config.month, config.day);
        let mut clock = Self {
            target,
            phase: CountdownPhase::Counting(Remaining::ZERO),
        };
        match target {
            Some(target) => {
                info!(target: "vlab.countdown", %target, "countdown started");
                clock.tick(now);
            }
            None => {
                info!(
                    target: "vlab.countdown",
                    month = config.month,
                    day = config.day,
                    "no upcoming target date; countdown starts arrived"
                );
                clock.phase = CountdownPhase::Arrived;
            }
        }
        clock
    }

    /// Recompute from a fresh reading of local time.
    pub fn tick(&mut self, now: NaiveDateTime) -> TickOutcome {
        if self.phase == CountdownPhase::Arrived {
            return TickOutcome::Idle;
        }
        let Some(target) = self.target else {
            self.phase = CountdownPhase::Arrived;
            return TickOutcome::JustArrived;
        };
        let millis = (target - now).num_milliseconds();
        if millis <= 0 {
            self.phase = CountdownPhase::Arrived;
            info!(target: "vlab.countdown", %target, %now, "target reached");
            return TickOutcome::JustArrived;
        }
        let remaining = Remaining::from_secs(millis.unsigned_abs() / 1000);
        self.phase = CountdownPhase::Counting(remaining);
        debug!(target: "vlab.countdown", ?remaining, "tick");
        TickOutcome::Counting(remaining)
    }

    #[must_use]
    pub fn target(&self) -> Option<NaiveDateTime> {
        self.target
    }

    #[must_use]
    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    /// All zeros once arrived.
    #[must_use]
    pub fn remaining(&self) -> Remaining {
        match self.phase {
            CountdownPhase::Counting(remaining) => remaining,
            CountdownPhase::Arrived => Remaining::ZERO,
        }
    }

    #[must_use]
    pub fn is_arrived(&self) -> bool {
        self.phase == CountdownPhase::Arrived
    }

    /// Message shown once the target is reached.
    #[must_use]
    pub const fn arrival_message() -> &'static str {
        "Одоо би чамд үүнийг хэлэх цаг боллоо…"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn one_second_before_midnight() {
        let clock = CountdownClock::start(at(2026, 2, 13, 23, 59, 59));
        assert_eq!(clock.target(), Some(at(2026, 2, 14, 0, 0, 0)));
        assert_eq!(
            clock.remaining(),
            Remaining {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 1
            }
        );
        assert!(!clock.is_arrived());
    }

    #[test]
    fn crossing_the_target_arrives_with_zeros() {
        let mut clock = CountdownClock::start(at(2026, 2, 13, 23, 59, 59));
        assert_eq!(clock.tick(at(2026, 2, 14, 0, 0, 1)), TickOutcome::JustArrived);
        assert!(clock.is_arrived());
        assert_eq!(clock.remaining(), Remaining::ZERO);
        assert_eq!(clock.tick(at(2026, 2, 14, 0, 0, 2)), TickOutcome::Idle);
    }

    #[test]
    fn on_or_after_the_day_targets_next_year() {
        assert_eq!(
            next_valentine(at(2026, 2, 14, 0, 0, 0)),
            Some(at(2027, 2, 14, 0, 0, 0))
        );
        assert_eq!(
            next_valentine(at(2026, 12, 31, 23, 0, 0)),
            Some(at(2027, 2, 14, 0, 0, 0))
        );
    }

    #[test]
    fn target_is_fixed_for_the_session() {
        let mut clock = CountdownClock::start(at(2026, 1, 1, 0, 0, 0));
        let target = clock.target();
        clock.tick(at(2026, 2, 1, 12, 0, 0));
        assert_eq!(clock.target(), target);
        assert_eq!(clock.remaining().days, 12);
        assert_eq!(clock.remaining().hours, 12);
    }

    #[test]
    fn leap_day_skips_to_next_leap_year() {
        assert_eq!(
            next_occurrence(at(2025, 3, 1, 0, 0, 0), 2, 29),
            Some(at(2028, 2, 29, 0, 0, 0))
        );
    }

    #[test]
    fn impossible_date_starts_arrived() {
        let config = CountdownConfig {
            month: 2,
            day: 30,
            tick_ms: 1000,
        };
        assert_eq!(config.validate().len(), 1);
        let clock = CountdownClock::start_with(&config, at(2026, 1, 1, 0, 0, 0));
        assert!(clock.is_arrived());
        assert_eq!(clock.target(), None);
    }

    #[test]
    fn fields_are_labelled() {
        let r = Remaining::from_secs(90_061);
        assert_eq!(
            r.fields(),
            [(1, "Days"), (1, "Hours"), (1, "Minutes"), (1, "Seconds")]
        );
    }

    proptest! {
        #[test]
        fn decomposition_round_trips(total in 0u64..10_000_000_000) {
            let r = Remaining::from_secs(total);
            prop_assert!(r.hours < 24 && r.minutes < 60 && r.seconds < 60);
            let back = r.days * 86_400
                + u64::from(r.hours) * 3_600
                + u64::from(r.minutes) * 60
                + u64::from(r.seconds);
            prop_assert_eq!(back, total);
        }

        #[test]
        fn target_is_strictly_after_start(secs in 0i64..(40 * 365 * 86_400)) {
            let now = at(2000, 1, 1, 0, 0, 0) + chrono::TimeDelta::seconds(secs);
            let target = next_valentine(now).unwrap();
            prop_assert!(target > now);
            prop_assert_eq!((target.month(), target.day()), (2, 14));
            prop_assert!(target - now <= chrono::TimeDelta::days(366));
        }
    }
}
