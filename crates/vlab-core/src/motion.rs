#![forbid(unsafe_code)]

//! Animated-container capability.
//!
//! Sections and story steps enter with a short fade-and-slide. Whether that
//! motion exists at all is decided once, when the page is composed: an
//! [`Eased`] implementation when animation is enabled, and [`Static`] (the
//! identity: fully visible, no offset) when it is not. View code asks the
//! chosen [`Motion`] for an [`Entrance`] and never branches on availability.
//!
//! # Invariants
//!
//! 1. `progress` is always in `[0.0, 1.0]` and non-decreasing in `elapsed`.
//! 2. `Static::progress` is `1.0` for every input.
//! 3. A zero duration is treated as already complete.

use core::time::Duration;

/// Easing curve applied to linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Easing {
    Linear,
    /// Cubic ease-out: fast start, gentle landing.
    #[default]
    EaseOut,
    /// Cubic ease-in-out.
    EaseInOut,
}

impl Easing {
    /// Apply the curve to `t` (clamped to `[0, 1]`).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Visual state of an entering container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entrance {
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Remaining offset in pixels along the entrance axis.
    pub offset: f64,
}

impl Entrance {
    /// Fully entered.
    pub const SETTLED: Self = Self {
        opacity: 1.0,
        offset: 0.0,
    };

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.opacity >= 1.0 && self.offset == 0.0
    }
}

/// Capability: how containers enter the page.
pub trait Motion: std::fmt::Debug {
    /// Progress of an entrance `elapsed` after it started, in `[0, 1]`.
    fn progress(&self, elapsed: Duration) -> f64;

    /// Whether this implementation produces any visible motion.
    fn is_animated(&self) -> bool;

    /// Entrance state for a container that starts `distance` pixels away.
    fn entrance(&self, elapsed: Duration, distance: f64) -> Entrance {
        let p = self.progress(elapsed);
        if p >= 1.0 {
            return Entrance::SETTLED;
        }
        Entrance {
            opacity: p,
            offset: distance * (1.0 - p),
        }
    }
}

/// Time-based eased entrance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eased {
    duration: Duration,
    easing: Easing,
}

impl Eased {
    #[must_use]
    pub const fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }
}

impl Motion for Eased {
    fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.easing.apply(t)
    }

    fn is_animated(&self) -> bool {
        !self.duration.is_zero()
    }
}

/// Identity implementation used when animation is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Static;

impl Motion for Static {
    fn progress(&self, _elapsed: Duration) -> f64 {
        1.0
    }

    fn is_animated(&self) -> bool {
        false
    }
}

/// Motion settings chosen at composition time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Whether animated containers are available at all.
    pub enabled: bool,
    /// Entrance duration in milliseconds.
    pub duration_ms: u64,
    /// Entrance distance in pixels (sections slide up from this offset).
    pub distance: f64,
    pub easing: Easing,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 500,
            distance: 18.0,
            easing: Easing::EaseOut,
        }
    }
}

impl MotionConfig {
    /// Build the capability this configuration selects.
    #[must_use]
    pub fn build(&self) -> Box<dyn Motion> {
        if self.enabled {
            Box::new(Eased::new(
                Duration::from_millis(self.duration_ms),
                self.easing,
            ))
        } else {
            Box::new(Static)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn static_is_always_settled() {
        let m = Static;
        assert!(!m.is_animated());
        assert_eq!(m.entrance(Duration::ZERO, 18.0), Entrance::SETTLED);
    }

    #[test]
    fn eased_starts_hidden_and_settles() {
        let m = Eased::new(Duration::from_millis(500), Easing::EaseOut);
        let start = m.entrance(Duration::ZERO, 18.0);
        assert_eq!(start.opacity, 0.0);
        assert_eq!(start.offset, 18.0);
        assert!(m.entrance(Duration::from_millis(500), 18.0).is_settled());
    }

    #[test]
    fn zero_duration_is_complete() {
        let m = Eased::new(Duration::ZERO, Easing::Linear);
        assert_eq!(m.progress(Duration::ZERO), 1.0);
        assert!(!m.is_animated());
    }

    #[test]
    fn disabled_config_builds_static() {
        let cfg = MotionConfig {
            enabled: false,
            ..MotionConfig::default()
        };
        assert!(!cfg.build().is_animated());
        assert!(MotionConfig::default().build().is_animated());
    }

    #[test]
    fn easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
        }
    }

    proptest! {
        #[test]
        fn progress_is_bounded_and_monotone(a in 0u64..2_000, b in 0u64..2_000) {
            let m = Eased::new(Duration::from_millis(700), Easing::EaseInOut);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let p_lo = m.progress(Duration::from_millis(lo));
            let p_hi = m.progress(Duration::from_millis(hi));
            prop_assert!((0.0..=1.0).contains(&p_lo));
            prop_assert!((0.0..=1.0).contains(&p_hi));
            prop_assert!(p_lo <= p_hi + 1e-12);
        }
    }
}
