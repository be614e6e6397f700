#![forbid(unsafe_code)]

//! Love letter generator.
//!
//! The letter is a pure function of `(mood, emoji, length)`: mood and
//! length pick one of six templates, and the emoji is substituted into the
//! template's `{emoji}` placeholder. Select values outside the recognized
//! sets fall back (mood to Romantic, emoji to 🥹, length to Short).
//!
//! Copy and share are host effects. The composer only tracks the transient
//! status message, with a generation number so an expiry scheduled by an
//! earlier copy cannot clear the status of a later one.

use tracing::debug;

const PLACEHOLDER: &str = "{emoji}";

/// Letter tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mood {
    #[default]
    Romantic,
    Funny,
    Shy,
}

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::Romantic, Mood::Funny, Mood::Shy];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Romantic => "Romantic",
            Self::Funny => "Funny",
            Self::Shy => "Shy",
        }
    }

    /// Parse a select value (exact label), falling back to [`Mood::Romantic`].
    #[must_use]
    pub fn from_select(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|mood| mood.label() == value)
            .unwrap_or_default()
    }
}

/// Emoji woven into the letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LetterEmoji {
    #[default]
    Pleading,
    Cupid,
    Joy,
}

impl LetterEmoji {
    pub const ALL: [LetterEmoji; 3] = [LetterEmoji::Pleading, LetterEmoji::Cupid, LetterEmoji::Joy];

    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Pleading => "🥹",
            Self::Cupid => "💘",
            Self::Joy => "😂",
        }
    }

    /// Parse a select value (the glyph itself), falling back to 🥹.
    #[must_use]
    pub fn from_select(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|emoji| emoji.glyph() == value)
            .unwrap_or_default()
    }
}

/// Letter length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LetterLength {
    #[default]
    Short,
    Long,
}

impl LetterLength {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Short => "Short",
            Self::Long => "Long",
        }
    }

    /// Only `Long` selects the long template.
    #[must_use]
    pub fn from_select(value: &str) -> Self {
        if value == "Long" {
            Self::Long
        } else {
            Self::Short
        }
    }
}

/// Generator inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LetterParams {
    pub mood: Mood,
    pub emoji: LetterEmoji,
    pub length: LetterLength,
}

/// The raw template for `(mood, length)`, with `{emoji}` placeholders.
#[must_use]
pub const fn template(mood: Mood, length: LetterLength) -> &'static str {
    match (mood, length) {
        (Mood::Romantic, LetterLength::Short) => {
            "Чи бол миний өдөр бүрийн аз жаргал {emoji}. Өнөө орой би чамтайгаа зүгээр л хамт алхахыг хүсэж байна."
        }
        (Mood::Romantic, LetterLength::Long) => {
            "Хайрт минь, {emoji} чиний инээмсэглэл миний өдөр бүрийг гэрэлтүүлдэг. Би чамтайгаа хамт байх бүртээ тайван, дулаан мэдрэмж авдаг. Энэ Валентайнаар чамд хэлэх зүйл нэг л байна: би чамайг үнэхээр хайрлаж байна."
        }
        (Mood::Funny, LetterLength::Short) => {
            "Чи миний Wi‑Fi шиг л хэрэгтэй {emoji}. Сигнал тасрахад би төөрөөд явчихна."
        }
        (Mood::Funny, LetterLength::Long) => {
            "Би чамайг харах болгондоо сэтгэл минь \"update\" хийдэг {emoji}. Хоолны цэсэн дээрх хамгийн амттай хэсэг шиг, чиний инээмсэглэл бүхнийг гоё болгодог. Валентайнд би чамтайгаа инээж, хөгжилдөж, дахиад дахин \"тийм\" гэж хэлэхийг хүсэж байна."
        }
        (Mood::Shy, LetterLength::Short) => {
            "Би жаахан ичимхий ч гэсэн… чамд дуулгах нэг зүйлтэй {emoji}. Чи миний зүрхэнд байгаа."
        }
        (Mood::Shy, LetterLength::Long) => {
            "Би үг хэлэхдээ нэг их сайн биш ч, чамтай байхад сэтгэл минь тайван байдаг {emoji}. Чиний дэргэд өөрийнхөөрөө байж чаддаг нь миний хамгийн том бэлэг. Хэрвээ зөвшөөрвөл, энэ Валентайнаар чамтайгаа зүгээр л хамт байхыг хүсэж байна."
        }
    }
}

/// Render the letter for `params`.
#[must_use]
pub fn compose(params: LetterParams) -> String {
    template(params.mood, params.length).replace(PLACEHOLDER, params.emoji.glyph())
}

/// Transient status next to the copy button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyStatus {
    #[default]
    Idle,
    Copied,
    Failed,
}

impl CopyStatus {
    /// Text to display; empty when idle.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Copied => "Copied!",
            Self::Failed => "Copy failed",
        }
    }
}

/// How a share request should be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharePlan {
    /// Open the native share sheet.
    Native { title: String, text: String },
    /// No native share: copy instead.
    CopyFallback,
}

/// Letter tuning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LetterConfig {
    /// How long a copy status stays visible, in milliseconds.
    pub status_clear_ms: u64,
    /// Title passed to the native share sheet.
    pub share_title: String,
}

impl Default for LetterConfig {
    fn default() -> Self {
        Self {
            status_clear_ms: 1500,
            share_title: "Love Letter".to_owned(),
        }
    }
}

/// Letter generator state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterComposer {
    params: LetterParams,
    text: String,
    status: CopyStatus,
    status_generation: u64,
}

impl Default for LetterComposer {
    fn default() -> Self {
        Self::new(LetterParams::default())
    }
}

impl LetterComposer {
    #[must_use]
    pub fn new(params: LetterParams) -> Self {
        Self {
            params,
            text: compose(params),
            status: CopyStatus::Idle,
            status_generation: 0,
        }
    }

    fn set_params(&mut self, params: LetterParams) -> bool {
        if params == self.params {
            return false;
        }
        self.params = params;
        self.text = compose(params);
        debug!(
            target: "vlab.letter",
            mood = params.mood.label(),
            emoji = params.emoji.glyph(),
            length = params.length.label(),
            "letter recomposed"
        );
        true
    }

    /// Returns `true` when the letter text may have changed.
    pub fn set_mood(&mut self, value: &str) -> bool {
        let params = LetterParams {
            mood: Mood::from_select(value),
            ..self.params
        };
        self.set_params(params)
    }

    pub fn set_emoji(&mut self, value: &str) -> bool {
        let params = LetterParams {
            emoji: LetterEmoji::from_select(value),
            ..self.params
        };
        self.set_params(params)
    }

    pub fn set_length(&mut self, value: &str) -> bool {
        let params = LetterParams {
            length: LetterLength::from_select(value),
            ..self.params
        };
        self.set_params(params)
    }

    #[must_use]
    pub fn params(&self) -> LetterParams {
        self.params
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Record a finished copy attempt. Returns the generation the status
    /// expiry must present to [`clear_status`](Self::clear_status).
    pub fn copy_finished(&mut self, ok: bool) -> u64 {
        self.status = if ok {
            CopyStatus::Copied
        } else {
            CopyStatus::Failed
        };
        self.status_generation = self.status_generation.wrapping_add(1);
        self.status_generation
    }

    /// Status expiry. Ignored unless `generation` is the latest.
    pub fn clear_status(&mut self, generation: u64) -> bool {
        if generation != self.status_generation || self.status == CopyStatus::Idle {
            return false;
        }
        self.status = CopyStatus::Idle;
        true
    }

    #[must_use]
    pub fn status(&self) -> CopyStatus {
        self.status
    }

    #[must_use]
    pub fn share_plan(&self, share_supported: bool, title: &str) -> SharePlan {
        if share_supported {
            SharePlan::Native {
                title: title.to_owned(),
                text: self.text.clone(),
            }
        } else {
            SharePlan::CopyFallback
        }
    }
}
