#![forbid(unsafe_code)]

//! Widget state for the Valentine Interactive Lab.
//!
//! Every widget here is plain state plus pure transitions: no timers, no
//! clipboard, no clock reads. Operations that need a side effect return an
//! outcome (a generation number to expire, a share plan, a burst change) and
//! the page shell turns it into runtime commands.
//!
//! | Widget | Module |
//! |--------|--------|
//! | One-shot viewport latch | [`reveal`] |
//! | Escaping "NO" button game | [`escape`] |
//! | Choose-your-ending story | [`story`] |
//! | Love letter generator | [`letter`] |
//! | Countdown to Feb 14 | [`countdown`] |
//! | Memory timeline | [`timeline`] |
//! | Background music toggle | [`music`] |
//! | Floating hearts and confetti | [`particles`] |

pub mod countdown;
pub mod escape;
pub mod letter;
pub mod music;
pub mod particles;
pub mod reveal;
pub mod story;
pub mod timeline;

pub use countdown::{CountdownClock, CountdownConfig, CountdownPhase, Remaining, TickOutcome};
pub use escape::{EscapeConfig, EscapeGame, EscapeStatus};
pub use letter::{
    CopyStatus, LetterComposer, LetterConfig, LetterEmoji, LetterLength, LetterParams, Mood,
    SharePlan,
};
pub use music::{MusicConfig, MusicToggle};
pub use particles::{ConfettiPiece, Heart, ParticleConfig, ParticleField};
pub use reveal::{RevealConfig, RevealTracker};
pub use story::{BurstChange, Scene, StoryAction, StoryConfig, StoryMachine, StoryStep, Transition};
pub use timeline::{Memory, MemoryTimeline};
