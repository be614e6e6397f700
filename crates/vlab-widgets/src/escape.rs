#![forbid(unsafe_code)]

//! The escaping "NO" button.
//!
//! A playful question with two answers. Pointing at (or pressing) the
//! decline target moves it to a random spot inside its container and makes
//! the accept target a little larger. Pressing accept ends the game: the
//! decline target is removed and the celebration message is shown.
//!
//! # Invariants
//!
//! - The decline target always lies fully inside the container:
//!   `0 <= x <= container.width - target.width` and likewise for `y`,
//!   with each bound collapsing to 0 when the target is wider than the room.
//! - `min_scale <= scale <= max_scale` at all times.
//! - Once accepted, nothing moves and nothing grows.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::debug;
use vlab_core::{Point, Size};

/// Game tuning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EscapeConfig {
    /// Accept-target scale before any evasion.
    pub min_scale: f64,
    /// Upper bound on the accept-target scale.
    pub max_scale: f64,
    /// Scale added per evasion.
    pub scale_step: f64,
    /// Evasion count at which the taunt turns into a nudge.
    pub nudge_threshold: u32,
}

impl Default for EscapeConfig {
    fn default() -> Self {
        Self {
            min_scale: 1.05,
            max_scale: 2.3,
            scale_step: 0.08,
            nudge_threshold: 4,
        }
    }
}

impl EscapeConfig {
    /// Human-readable problems with this configuration; empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            errors.push(format!("escape.min_scale must be > 0, got {}", self.min_scale));
        }
        if !(self.max_scale.is_finite() && self.max_scale >= self.min_scale) {
            errors.push(format!(
                "escape.max_scale ({}) must be >= escape.min_scale ({})",
                self.max_scale, self.min_scale
            ));
        }
        if !(self.scale_step.is_finite() && self.scale_step >= 0.0) {
            errors.push(format!(
                "escape.scale_step must be >= 0, got {}",
                self.scale_step
            ));
        }
        errors
    }
}

/// Which message the game shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeStatus {
    /// Nobody has given up yet.
    Taunt,
    /// Enough evasions that the player should just say yes.
    Nudge,
    /// Accepted.
    Celebrate,
}

impl EscapeStatus {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Taunt => "NO дээр хүрч чадах уу?",
            Self::Nudge => "Ямар ч байсан YES л дарах юм байна 😌",
            Self::Celebrate => "❤️ Дэлгэц дүүрэн зүрх!",
        }
    }
}

/// Uniform random top-left position for a `target` inside `container`.
///
/// Each axis is drawn from `[0, slack)` and clamped into `[0, slack]`; an
/// axis with no slack yields 0.
pub fn random_position<R: Rng + ?Sized>(container: Size, target: Size, rng: &mut R) -> Point {
    let room = container.slack(target);
    let x = rng.random::<f64>() * room.width;
    let y = rng.random::<f64>() * room.height;
    Point::new(x, y).clamp_to(room)
}

/// State of one escape game.
#[derive(Debug, Clone)]
pub struct EscapeGame<R = SmallRng> {
    config: EscapeConfig,
    rng: R,
    container: Size,
    target: Size,
    position: Point,
    evasions: u32,
    scale: f64,
    accepted: bool,
}

impl EscapeGame<SmallRng> {
    /// A game with a fixed seed, for reproducible layouts.
    #[must_use]
    pub fn seeded(config: EscapeConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    /// A game seeded from the operating system.
    #[must_use]
    pub fn from_os_rng(config: EscapeConfig) -> Self {
        Self::with_rng(config, SmallRng::from_os_rng())
    }
}

impl<R: Rng> EscapeGame<R> {
    #[must_use]
    pub fn with_rng(config: EscapeConfig, rng: R) -> Self {
        let scale = config.min_scale;
        Self {
            config,
            rng,
            container: Size::ZERO,
            target: Size::ZERO,
            position: Point::ORIGIN,
            evasions: 0,
            scale,
            accepted: false,
        }
    }

    /// Record new measurements of the container and the decline target and
    /// move the target to a fresh random spot.
    ///
    /// Returns `false` (and ignores the measurements) once accepted.
    pub fn resize(&mut self, container: Size, target: Size) -> bool {
        if self.accepted {
            return false;
        }
        self.container = container;
        self.target = target;
        self.relocate();
        true
    }

    /// The player went for the decline target: move it and grow accept.
    ///
    /// Returns `false` once accepted.
    pub fn evade(&mut self) -> bool {
        if self.accepted {
            return false;
        }
        self.evasions = self.evasions.saturating_add(1);
        self.scale = vlab_core::geometry::clamp(
            self.scale + self.config.scale_step,
            self.config.min_scale,
            self.config.max_scale,
        );
        self.relocate();
        debug!(
            target: "vlab.escape",
            evasions = self.evasions,
            scale = self.scale,
            x = self.position.x,
            y = self.position.y,
            "decline target evaded"
        );
        true
    }

    /// Accept. Returns `true` only the first time.
    pub fn accept(&mut self) -> bool {
        if self.accepted {
            return false;
        }
        self.accepted = true;
        debug!(target: "vlab.escape", evasions = self.evasions, "accepted");
        true
    }

    fn relocate(&mut self) {
        self.position = random_position(self.container, self.target, &mut self.rng);
    }

    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Largest allowed top-left coordinate per axis.
    #[must_use]
    pub fn bounds(&self) -> Size {
        self.container.slack(self.target)
    }

    #[must_use]
    pub fn evasions(&self) -> u32 {
        self.evasions
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Whether the decline target is still on screen.
    #[must_use]
    pub fn decline_visible(&self) -> bool {
        !self.accepted
    }

    #[must_use]
    pub fn status(&self) -> EscapeStatus {
        if self.accepted {
            EscapeStatus::Celebrate
        } else if self.evasions >= self.config.nudge_threshold {
            EscapeStatus::Nudge
        } else {
            EscapeStatus::Taunt
        }
    }

    #[must_use]
    pub fn config(&self) -> &EscapeConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn game() -> EscapeGame {
        let mut g = EscapeGame::seeded(EscapeConfig::default(), 7);
        g.resize(Size::new(300.0, 160.0), Size::new(80.0, 40.0));
        g
    }

    fn in_bounds(g: &EscapeGame) -> bool {
        let b = g.bounds();
        let p = g.position();
        (0.0..=b.width).contains(&p.x) && (0.0..=b.height).contains(&p.y)
    }

    #[test]
    fn starts_at_min_scale_with_taunt() {
        let g = game();
        assert_eq!(g.scale(), 1.05);
        assert_eq!(g.evasions(), 0);
        assert_eq!(g.status(), EscapeStatus::Taunt);
        assert!(in_bounds(&g));
    }

    #[test]
    fn evade_grows_and_moves() {
        let mut g = game();
        assert!(g.evade());
        assert_eq!(g.evasions(), 1);
        assert!((g.scale() - 1.13).abs() < 1e-9);
        assert!(in_bounds(&g));
    }

    #[test]
    fn nudge_from_fourth_evasion() {
        let mut g = game();
        for _ in 0..3 {
            g.evade();
        }
        assert_eq!(g.status(), EscapeStatus::Taunt);
        g.evade();
        assert_eq!(g.status(), EscapeStatus::Nudge);
    }

    #[test]
    fn scale_saturates_at_max() {
        let mut g = game();
        for _ in 0..100 {
            g.evade();
        }
        assert_eq!(g.scale(), 2.3);
        assert_eq!(g.evasions(), 100);
    }

    #[test]
    fn target_larger_than_container_pins_to_origin() {
        let mut g = EscapeGame::seeded(EscapeConfig::default(), 1);
        g.resize(Size::new(50.0, 20.0), Size::new(80.0, 40.0));
        assert_eq!(g.position(), Point::ORIGIN);
        g.evade();
        assert_eq!(g.position(), Point::ORIGIN);
    }

    #[test]
    fn accept_freezes_everything() {
        let mut g = game();
        g.evade();
        let (pos, scale) = (g.position(), g.scale());
        assert!(g.accept());
        assert!(!g.accept());
        assert!(!g.evade());
        assert!(!g.resize(Size::new(999.0, 999.0), Size::new(1.0, 1.0)));
        assert_eq!(g.position(), pos);
        assert_eq!(g.scale(), scale);
        assert_eq!(g.evasions(), 1);
        assert!(!g.decline_visible());
        assert_eq!(g.status(), EscapeStatus::Celebrate);
        assert_eq!(g.status().message(), "❤️ Дэлгэц дүүрэн зүрх!");
    }

    #[test]
    fn same_seed_same_path() {
        let mut a = game();
        let mut b = game();
        for _ in 0..5 {
            a.evade();
            b.evade();
            assert_eq!(a.position(), b.position());
        }
    }

    #[test]
    fn validate_flags_inverted_range() {
        let config = EscapeConfig {
            min_scale: 2.0,
            max_scale: 1.0,
            ..EscapeConfig::default()
        };
        assert_eq!(config.validate().len(), 1);
        assert!(EscapeConfig::default().validate().is_empty());
    }

    proptest! {
        #[test]
        fn position_and_scale_stay_in_range(
            seed in any::<u64>(),
            cw in 0.0f64..2000.0,
            ch in 0.0f64..2000.0,
            tw in 0.0f64..400.0,
            th in 0.0f64..200.0,
            evasions in 0usize..60,
        ) {
            let mut g = EscapeGame::seeded(EscapeConfig::default(), seed);
            g.resize(Size::new(cw, ch), Size::new(tw, th));
            prop_assert!(in_bounds(&g));
            for _ in 0..evasions {
                g.evade();
                prop_assert!(in_bounds(&g));
                prop_assert!(g.scale() >= 1.05 && g.scale() <= 2.3);
            }
        }
    }
}
