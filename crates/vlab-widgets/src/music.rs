#![forbid(unsafe_code)]

//! Background music toggle: shows or hides an embedded video player.

/// Music settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MusicConfig {
    /// YouTube video id played (and looped) by the embed.
    pub video_id: String,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            video_id: "NXmRAQ-9Eis".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicToggle {
    video_id: String,
    visible: bool,
}

impl MusicToggle {
    pub const HINT: &'static str = "Play дээр дарж хөгжмөө асаагаарай.";
    pub const LINK_LABEL: &'static str = "YouTube дээр нээх";

    #[must_use]
    pub fn new(config: &MusicConfig) -> Self {
        Self {
            video_id: config.video_id.clone(),
            visible: false,
        }
    }

    /// Flip player visibility; returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn button_label(&self) -> &'static str {
        if self.visible {
            "🎵 Player: On"
        } else {
            "🎧 Tap for YouTube music"
        }
    }

    /// Autoplaying, looping, chrome-less embed URL.
    #[must_use]
    pub fn embed_url(&self) -> String {
        let id = &self.video_id;
        format!(
            "https://www.youtube.com/embed/{id}?autoplay=1&loop=1&playlist={id}&controls=0&modestbranding=1&rel=0&playsinline=1"
        )
    }

    #[must_use]
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}
