#![forbid(unsafe_code)]

//! Choose-your-ending story.
//!
//! ```text
//! Intro ──Advance──▶ Choice ──Listen──▶ Listening ──Cute─────▶ EndingCute
//!                      │                    └──────Romantic──▶ EndingRomantic
//!                      └──DeclineJoke──▶ EndingFunny
//! any ending ──Reset──▶ Intro
//! ```
//!
//! Reaching any ending starts a confetti burst; leaving the endings clears
//! it. Each burst carries a generation number so that an expiry scheduled
//! for an older burst cannot clear a newer one.

use tracing::debug;

/// Story position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoryStep {
    #[default]
    Intro,
    Choice,
    Listening,
    EndingCute,
    EndingRomantic,
    EndingFunny,
}

/// User choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoryAction {
    Advance,
    Listen,
    DeclineJoke,
    Cute,
    Romantic,
    Reset,
}

impl StoryAction {
    /// Parse a command word (`advance`, `listen`, `decline`, `cute`,
    /// `romantic`, `reset`).
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "advance" => Self::Advance,
            "listen" => Self::Listen,
            "decline" => Self::DeclineJoke,
            "cute" => Self::Cute,
            "romantic" => Self::Romantic,
            "reset" => Self::Reset,
            _ => return None,
        })
    }
}

/// A button offered on a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub label: &'static str,
    pub action: StoryAction,
    /// Rendered as the highlighted option.
    pub primary: bool,
}

/// What a step shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scene {
    /// Ending title, if any.
    pub title: Option<&'static str>,
    pub line: &'static str,
    pub choices: &'static [Choice],
}

const INTRO_CHOICES: &[Choice] = &[Choice {
    label: "Сонголтоо үзье",
    action: StoryAction::Advance,
    primary: true,
}];

const CHOICE_CHOICES: &[Choice] = &[
    Choice {
        label: "Сонсъё",
        action: StoryAction::Listen,
        primary: true,
    },
    Choice {
        label: "Айж байна 😳",
        action: StoryAction::DeclineJoke,
        primary: false,
    },
];

const LISTENING_CHOICES: &[Choice] = &[
    Choice {
        label: "Cute ending ✨",
        action: StoryAction::Cute,
        primary: false,
    },
    Choice {
        label: "Romantic ending 💖",
        action: StoryAction::Romantic,
        primary: true,
    },
];

const ENDING_CHOICES: &[Choice] = &[Choice {
    label: "Дахин эхлүүлэх",
    action: StoryAction::Reset,
    primary: false,
}];

impl StoryStep {
    #[must_use]
    pub const fn is_ending(self) -> bool {
        matches!(
            self,
            Self::EndingCute | Self::EndingRomantic | Self::EndingFunny
        )
    }

    /// The transition table. `None` means the action is not available here.
    #[must_use]
    pub const fn next(self, action: StoryAction) -> Option<StoryStep> {
        use StoryAction as A;
        match (self, action) {
            (Self::Intro, A::Advance) => Some(Self::Choice),
            (Self::Choice, A::Listen) => Some(Self::Listening),
            (Self::Choice, A::DeclineJoke) => Some(Self::EndingFunny),
            (Self::Listening, A::Cute) => Some(Self::EndingCute),
            (Self::Listening, A::Romantic) => Some(Self::EndingRomantic),
            (Self::EndingCute | Self::EndingRomantic | Self::EndingFunny, A::Reset) => {
                Some(Self::Intro)
            }
            _ => None,
        }
    }

    #[must_use]
    pub const fn scene(self) -> Scene {
        match self {
            Self::Intro => Scene {
                title: None,
                line: "Надад чамд хэлэх нэг зүйл байна…",
                choices: INTRO_CHOICES,
            },
            Self::Choice => Scene {
                title: None,
                line: "Хариултаа сонгоорой:",
                choices: CHOICE_CHOICES,
            },
            Self::Listening => Scene {
                title: None,
                line: "Сонсъё гээд хэллээ… одоо ямар төгсгөлөөр явах вэ?",
                choices: LISTENING_CHOICES,
            },
            Self::EndingCute => Scene {
                title: Some("Cute Ending"),
                line: "Чи инээгээд, би гараа атгаад… яг тэр мөчөөс бүх зүйл илүү дулаахан болсон 💞",
                choices: ENDING_CHOICES,
            },
            Self::EndingRomantic => Scene {
                title: Some("Romantic Ending"),
                line: "Би зүрхээ өглөө. Чи хүлээж авлаа. Одоо үлдэх нь хамтдаа байсан түүх 💘",
                choices: ENDING_CHOICES,
            },
            Self::EndingFunny => Scene {
                title: Some("Funny Ending"),
                line: "Айгаад зугтсан ч миний зүрх “ping” хийгээд л чамайг олчихлоо 😂",
                choices: ENDING_CHOICES,
            },
        }
    }
}

/// Effect of a transition on the confetti burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstChange {
    /// A burst started; expire it with this generation.
    Start { generation: u64 },
    /// The burst was cleared; any pending expiry is obsolete.
    Clear,
    Keep,
}

/// An accepted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: StoryStep,
    pub to: StoryStep,
    pub burst: BurstChange,
}

/// Story tuning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StoryConfig {
    /// How long the confetti burst lasts, in milliseconds.
    pub burst_ms: u64,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self { burst_ms: 2400 }
    }
}

/// Story state plus the confetti burst flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryMachine {
    step: StoryStep,
    burst: bool,
    generation: u64,
}

impl StoryMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `action`. Returns `None` and leaves state untouched when the
    /// action is not valid from the current step.
    pub fn apply(&mut self, action: StoryAction) -> Option<Transition> {
        let from = self.step;
        let Some(to) = from.next(action) else {
            debug!(target: "vlab.story", ?from, ?action, "ignored invalid action");
            return None;
        };
        self.step = to;
        let burst = if to.is_ending() {
            self.generation = self.generation.wrapping_add(1);
            self.burst = true;
            BurstChange::Start {
                generation: self.generation,
            }
        } else if self.burst {
            self.burst = false;
            BurstChange::Clear
        } else {
            BurstChange::Keep
        };
        debug!(target: "vlab.story", ?from, ?to, ?burst, "transition");
        Some(Transition { from, to, burst })
    }

    /// Burst timer fired. Clears the burst only if `generation` is current.
    pub fn expire_burst(&mut self, generation: u64) -> bool {
        if self.burst && generation == self.generation {
            self.burst = false;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn step(&self) -> StoryStep {
        self.step
    }

    #[must_use]
    pub fn scene(&self) -> Scene {
        self.step.scene()
    }

    #[must_use]
    pub fn burst_active(&self) -> bool {
        self.burst
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
