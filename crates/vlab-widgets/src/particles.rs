#![forbid(unsafe_code)]

//! Decorative particles: floating hearts behind the page and the confetti
//! burst shown on story endings.
//!
//! Particles are generated once per page and never change afterwards; only
//! whether the confetti is drawn depends on state.

use rand::Rng;

/// A floating heart. `left` is a percentage of the page width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heart {
    pub left: u8,
    /// Animation delay in seconds.
    pub delay: f64,
    /// Font size in pixels.
    pub size: u8,
    pub opacity: f64,
}

impl Heart {
    /// Extra font size of the hearts reused by the acceptance overlay.
    pub const OVERLAY_GROWTH: u8 = 8;

    /// Font size of this heart when it reappears in the acceptance overlay.
    #[must_use]
    pub fn overlay_size(&self) -> u8 {
        self.size.saturating_add(Self::OVERLAY_GROWTH)
    }
}

/// One confetti piece. `left` is a percentage of the card width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfettiPiece {
    pub left: f64,
    /// Animation delay in seconds.
    pub delay: f64,
    /// Rotation in degrees, `[-90, 90)`.
    pub rotation: f64,
    /// HSL hue, `0..360`.
    pub hue: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParticleConfig {
    pub hearts: usize,
    pub confetti: usize,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            hearts: 16,
            confetti: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleField {
    hearts: Vec<Heart>,
    confetti: Vec<ConfettiPiece>,
}

impl ParticleField {
    pub fn generate<R: Rng + ?Sized>(config: &ParticleConfig, rng: &mut R) -> Self {
        let hearts = (0..config.hearts)
            .map(|_| Heart {
                left: rng.random_range(4..=95),
                delay: rng.random::<f64>() * 6.0,
                size: rng.random_range(16..=33),
                opacity: rng.random::<f64>() * 0.35 + 0.45,
            })
            .collect();
        let confetti = (0..config.confetti)
            .map(|_| ConfettiPiece {
                left: rng.random::<f64>() * 100.0,
                delay: rng.random::<f64>() * 0.8,
                rotation: rng.random::<f64>() * 180.0 - 90.0,
                hue: rng.random_range(0..360),
            })
            .collect();
        Self { hearts, confetti }
    }

    #[must_use]
    pub fn hearts(&self) -> &[Heart] {
        &self.hearts
    }

    #[must_use]
    pub fn confetti(&self) -> &[ConfettiPiece] {
        &self.confetti
    }
}
