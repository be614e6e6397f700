#![forbid(unsafe_code)]

//! Page configuration as data.
//!
//! Every tunable of the page lives in one [`LabConfig`] that can be loaded
//! from TOML or JSON at startup. Each section defaults to the values the
//! page ships with, so an empty file (or no file) gives the stock page.
//!
//! ```toml
//! # vlab.toml
//! [escape]
//! nudge_threshold = 6
//!
//! [story]
//! burst_ms = 3000
//!
//! [motion]
//! enabled = false
//! ```
//!
//! ```rust,ignore
//! let config = LabConfig::from_toml_file("vlab.toml")?;
//! let errors = config.validate();
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use vlab_core::{MotionConfig, Size};
use vlab_widgets::{
    CountdownConfig, EscapeConfig, LetterConfig, MusicConfig, ParticleConfig, RevealConfig,
    StoryConfig,
};

/// Errors from loading a [`LabConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    /// Parsed, but values are out of range.
    #[error("config rejected: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Measured sizes used before the host reports real layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Inner size of the escape-game zone.
    pub escape_zone: Size,
    /// Size of the decline button.
    pub decline_button: Size,
    /// Text width of the rendered page, in columns.
    pub columns: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            escape_zone: Size::new(320.0, 180.0),
            decline_button: Size::new(88.0, 44.0),
            columns: 72,
        }
    }
}

/// Log output settings for the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

/// Top-level page configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub escape: EscapeConfig,
    pub layout: LayoutConfig,
    pub story: StoryConfig,
    pub letter: LetterConfig,
    pub reveal: RevealConfig,
    pub countdown: CountdownConfig,
    pub particles: ParticleConfig,
    pub music: MusicConfig,
    pub motion: MotionConfig,
    pub logging: LoggingConfig,
}

impl LabConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load by extension: `.json` is JSON, anything else TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.extension().is_some_and(|ext| ext == "json") {
            let content = std::fs::read_to_string(path)?;
            Self::from_json_str(&content)
        } else {
            Self::from_toml_file(path)
        }
    }

    /// Validate ranges. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.escape.validate();
        errors.extend(self.countdown.validate());

        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            errors.push(format!(
                "reveal.threshold must be in [0, 1], got {}",
                self.reveal.threshold
            ));
        }
        if !(-0.5..=0.5).contains(&self.reveal.root_margin) {
            errors.push(format!(
                "reveal.root_margin must be in [-0.5, 0.5], got {}",
                self.reveal.root_margin
            ));
        }
        if self.story.burst_ms == 0 {
            errors.push("story.burst_ms must be > 0".into());
        }
        if self.letter.status_clear_ms == 0 {
            errors.push("letter.status_clear_ms must be > 0".into());
        }
        if self.music.video_id.trim().is_empty() {
            errors.push("music.video_id must not be empty".into());
        }
        if !(self.motion.distance.is_finite() && self.motion.distance >= 0.0) {
            errors.push(format!(
                "motion.distance must be >= 0, got {}",
                self.motion.distance
            ));
        }
        if self.layout.columns < 20 {
            errors.push(format!(
                "layout.columns must be >= 20, got {}",
                self.layout.columns
            ));
        }
        errors
    }

    /// Parse-then-validate in one call.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}
