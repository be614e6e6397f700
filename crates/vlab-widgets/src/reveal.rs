#![forbid(unsafe_code)]

//! One-shot viewport reveal latch.
//!
//! A [`RevealTracker`] starts hidden and latches visible the first time its
//! element intersects the viewport by at least the configured threshold.
//! Once latched it never resets, whatever later reports say.
//!
//! If the host cannot observe intersections at all, the tracker is opened
//! immediately with [`RevealTracker::fail_open`] so content is never stuck
//! hidden.

use core::time::Duration;

use vlab_core::Rect;

/// Reveal settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RevealConfig {
    /// Minimum visible fraction of the element, in `[0, 1]`.
    pub threshold: f64,
    /// Vertical viewport margin as a fraction of its height; negative shrinks.
    pub root_margin: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            root_margin: -0.10,
        }
    }
}

/// Fraction of `element` visible inside `viewport` after applying
/// `root_margin`. Empty elements are never visible.
#[must_use]
pub fn intersection_ratio(element: Rect, viewport: Rect, root_margin: f64) -> f64 {
    let area = element.area();
    if area <= 0.0 {
        return 0.0;
    }
    let root = viewport.inset_vertical(root_margin);
    (element.intersection(&root).area() / area).clamp(0.0, 1.0)
}

/// One-shot visibility latch for a single element.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealTracker {
    threshold: f64,
    revealed_at: Option<Duration>,
}

impl RevealTracker {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            0.0
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self {
            threshold,
            revealed_at: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &RevealConfig) -> Self {
        Self::new(config.threshold)
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Feed an intersection report taken at monotonic time `at`.
    ///
    /// Returns `true` only on the report that latches the tracker.
    pub fn observe(&mut self, ratio: f64, at: Duration) -> bool {
        if self.revealed_at.is_some() {
            return false;
        }
        if ratio > 0.0 && ratio >= self.threshold {
            self.revealed_at = Some(at);
            return true;
        }
        false
    }

    /// Latch immediately because observation is unavailable.
    pub fn fail_open(&mut self, at: Duration) {
        if self.revealed_at.is_none() {
            self.revealed_at = Some(at);
        }
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed_at.is_some()
    }

    /// When the latch fired, for entrance animations.
    #[must_use]
    pub fn revealed_at(&self) -> Option<Duration> {
        self.revealed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn below_threshold_stays_hidden() {
        let mut t = RevealTracker::new(0.3);
        assert!(!t.observe(0.0, ms(0)));
        assert!(!t.observe(0.29, ms(10)));
        assert!(!t.is_revealed());
    }

    #[test]
    fn latches_once_and_stays() {
        let mut t = RevealTracker::new(0.3);
        assert!(t.observe(0.3, ms(40)));
        assert!(!t.observe(1.0, ms(50)));
        assert!(!t.observe(0.0, ms(60)));
        assert!(t.is_revealed());
        assert_eq!(t.revealed_at(), Some(ms(40)));
    }

    #[test]
    fn zero_threshold_still_needs_intersection() {
        let mut t = RevealTracker::new(0.0);
        assert!(!t.observe(0.0, ms(0)));
        assert!(t.observe(0.01, ms(1)));
    }

    #[test]
    fn fail_open_reveals_without_reports() {
        let mut t = RevealTracker::from_config(&RevealConfig::default());
        t.fail_open(ms(0));
        assert!(t.is_revealed());
        t.fail_open(ms(99));
        assert_eq!(t.revealed_at(), Some(ms(0)));
    }

    #[test]
    fn ratio_respects_negative_margin() {
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
        // Element sits in the top 10% band that the margin trims away.
        let element = Rect::new(0.0, 0.0, 100.0, 10.0);
        assert_eq!(intersection_ratio(element, viewport, 0.0), 1.0);
        assert_eq!(intersection_ratio(element, viewport, -0.10), 0.0);
    }

    #[test]
    fn ratio_partial_overlap() {
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
        let element = Rect::new(0.0, 80.0, 100.0, 40.0);
        assert!((intersection_ratio(element, viewport, 0.0) - 0.5).abs() < 1e-12);
        assert_eq!(intersection_ratio(Rect::default(), viewport, 0.0), 0.0);
    }
}
