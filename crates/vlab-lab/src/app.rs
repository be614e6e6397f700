#![forbid(unsafe_code)]

//! The page shell.
//!
//! [`LabModel`] owns every widget for the lifetime of the page and is the
//! only place where widget outcomes become side effects:
//!
//! | Outcome | Command |
//! |---------|---------|
//! | story reaches an ending | `Cmd::schedule(story.burst)` |
//! | story leaves the endings | `Cmd::cancel(story.burst)` |
//! | copy requested | `Cmd::task("letter.copy")` |
//! | copy finished | `Cmd::schedule(letter.status)` |
//! | share requested | `Cmd::task("letter.share")`, or copy when unsupported |
//!
//! The countdown tick and the entrance-animation frames are subscriptions,
//! declared only while they have work to do.

use core::time::Duration;

use chrono::NaiveDateTime;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};
use vlab_core::{ElementId, Entrance, Event, Motion, PointerKind, Size};
use vlab_runtime::{Cmd, Every, HostFeatures, Model, ShareOutcome, ShareRequest, SubId, TimerId};
use vlab_widgets::{
    BurstChange, CountdownClock, EscapeGame, LetterComposer, MemoryTimeline, MusicToggle,
    ParticleField, RevealTracker, SharePlan, StoryAction, StoryMachine, TickOutcome,
};

use crate::config::LabConfig;

/// Element ids the host reports events against.
pub mod ids {
    use vlab_core::ElementId;
    use vlab_widgets::StoryAction;

    pub const ESCAPE_ZONE: ElementId = ElementId::new("escape.zone");
    pub const ACCEPT: ElementId = ElementId::new("escape.yes");
    pub const DECLINE: ElementId = ElementId::new("escape.no");

    pub const LETTER_MOOD: ElementId = ElementId::new("letter.mood");
    pub const LETTER_EMOJI: ElementId = ElementId::new("letter.emoji");
    pub const LETTER_LENGTH: ElementId = ElementId::new("letter.length");
    pub const LETTER_COPY: ElementId = ElementId::new("letter.copy");
    pub const LETTER_SHARE: ElementId = ElementId::new("letter.share");

    pub const MUSIC_TOGGLE: ElementId = ElementId::new("music.toggle");

    /// Name of the card elements; the index is the card's position.
    pub const SECTION: &str = "section";
    /// Name of the timeline entry elements; the index is the entry.
    pub const TIMELINE_ENTRY: &str = "timeline";

    const STORY_PREFIX: &str = "story.";

    #[must_use]
    pub const fn story_button(action: StoryAction) -> ElementId {
        ElementId::new(match action {
            StoryAction::Advance => "story.advance",
            StoryAction::Listen => "story.listen",
            StoryAction::DeclineJoke => "story.decline",
            StoryAction::Cute => "story.cute",
            StoryAction::Romantic => "story.romantic",
            StoryAction::Reset => "story.reset",
        })
    }

    /// The story action behind a button id, if it is one.
    #[must_use]
    pub fn story_action(id: ElementId) -> Option<StoryAction> {
        StoryAction::from_word(id.name().strip_prefix(STORY_PREFIX)?)
    }

    #[must_use]
    pub const fn timeline_entry(index: u16) -> ElementId {
        ElementId::nth(TIMELINE_ENTRY, index)
    }
}

const BURST_TIMER: TimerId = TimerId::new("story.burst");
const STATUS_TIMER: TimerId = TimerId::new("letter.status");

const COUNTDOWN_SUB: SubId = 1;
const MOTION_SUB: SubId = 2;
const ANIMATION_FRAME: Duration = Duration::from_millis(50);

/// Feature cards, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Story,
    Timeline,
    Escape,
    Letter,
    Countdown,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Story,
        Section::Timeline,
        Section::Escape,
        Section::Letter,
        Section::Countdown,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn id(self) -> ElementId {
        ElementId::nth(ids::SECTION, self as u16)
    }
}

/// Everything [`LabModel::update`] understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Raw host event, routed to one of the messages below.
    Event(Event),
    Story(StoryAction),
    BurstExpired(u64),
    Evade,
    Accept,
    Measured { container: Size, element: Size },
    Seen { target: ElementId, ratio: f64 },
    Mood(String),
    Emoji(String),
    Length(String),
    Copy,
    CopyFinished(Result<(), String>),
    Share,
    /// `None` when the share capability vanished between plan and run.
    ShareFinished(Option<ShareOutcome>),
    StatusExpired(u64),
    CountdownTick(NaiveDateTime),
    ToggleMusic,
    AnimationFrame,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        Msg::Event(event)
    }
}

/// Translate a host event into a page message.
#[must_use]
pub fn route(event: Event) -> Option<Msg> {
    match event {
        Event::Pointer { kind, target } => match (target, kind) {
            (ids::DECLINE, _) => Some(Msg::Evade),
            (_, PointerKind::Enter) => None,
            (ids::ACCEPT, PointerKind::Click) => Some(Msg::Accept),
            (ids::LETTER_COPY, PointerKind::Click) => Some(Msg::Copy),
            (ids::LETTER_SHARE, PointerKind::Click) => Some(Msg::Share),
            (ids::MUSIC_TOGGLE, PointerKind::Click) => Some(Msg::ToggleMusic),
            (other, PointerKind::Click) => ids::story_action(other).map(Msg::Story),
        },
        Event::Select { target, value } => match target {
            ids::LETTER_MOOD => Some(Msg::Mood(value)),
            ids::LETTER_EMOJI => Some(Msg::Emoji(value)),
            ids::LETTER_LENGTH => Some(Msg::Length(value)),
            _ => None,
        },
        Event::Resize {
            target,
            container,
            element,
        } => (target == ids::ESCAPE_ZONE).then_some(Msg::Measured { container, element }),
        Event::Intersection { target, ratio } => Some(Msg::Seen { target, ratio }),
        Event::Close => None,
    }
}

/// Page state.
#[derive(Debug)]
pub struct LabModel {
    config: LabConfig,
    features: HostFeatures,
    motion: Box<dyn Motion>,
    now: Duration,
    sections: Vec<RevealTracker>,
    timeline: MemoryTimeline,
    escape: EscapeGame,
    story: StoryMachine,
    letter: LetterComposer,
    countdown: CountdownClock,
    music: MusicToggle,
    particles: ParticleField,
}

impl LabModel {
    /// Compose the page.
    ///
    /// `local_now` fixes the countdown target. `seed` makes every random
    /// layout reproducible; `None` seeds from the operating system.
    #[must_use]
    pub fn new(
        config: LabConfig,
        features: HostFeatures,
        local_now: NaiveDateTime,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let particles = ParticleField::generate(&config.particles, &mut rng);
        let escape = EscapeGame::seeded(config.escape.clone(), rng.random());
        let sections = Section::ALL
            .iter()
            .map(|_| RevealTracker::from_config(&config.reveal))
            .collect();
        info!(
            target: "vlab.lab",
            clipboard = features.clipboard,
            share = features.share,
            intersection = features.intersection,
            animated = config.motion.enabled,
            "page composed"
        );
        Self {
            motion: config.motion.build(),
            timeline: MemoryTimeline::new(&config.reveal),
            countdown: CountdownClock::start_with(&config.countdown, local_now),
            music: MusicToggle::new(&config.music),
            letter: LetterComposer::default(),
            story: StoryMachine::new(),
            now: Duration::ZERO,
            sections,
            escape,
            particles,
            features,
            config,
        }
    }

    fn observe(&mut self, target: ElementId, ratio: f64) {
        let index = usize::from(target.index());
        let latched = if target.is(ids::SECTION) {
            self.sections
                .get_mut(index)
                .is_some_and(|tracker| tracker.observe(ratio, self.now))
        } else if target.is(ids::TIMELINE_ENTRY) {
            self.timeline.observe(index, ratio, self.now)
        } else {
            false
        };
        if latched {
            debug!(target: "vlab.reveal", element = %target, ratio, "revealed");
        }
    }

    fn share(&mut self) -> Cmd<Msg> {
        match self
            .letter
            .share_plan(self.features.share, &self.config.letter.share_title)
        {
            SharePlan::Native { title, text } => Cmd::task("letter.share", move |caps| {
                Msg::ShareFinished(caps.share(&ShareRequest { title, text }))
            }),
            SharePlan::CopyFallback => {
                debug!(target: "vlab.letter", "share unsupported, copying instead");
                self.update(Msg::Copy)
            }
        }
    }

    fn copy(&self) -> Cmd<Msg> {
        let text = self.letter.text().to_owned();
        Cmd::task("letter.copy", move |caps| {
            Msg::CopyFinished(caps.write_clipboard(&text).map_err(|err| err.to_string()))
        })
    }

    fn entrance_of(&self, tracker: &RevealTracker) -> Entrance {
        match tracker.revealed_at() {
            None => Entrance {
                opacity: 0.0,
                offset: self.config.motion.distance,
            },
            Some(at) => self
                .motion
                .entrance(self.now.saturating_sub(at), self.config.motion.distance),
        }
    }

    /// Whether any revealed element is still animating in.
    fn entrances_in_flight(&self) -> bool {
        self.motion.is_animated()
            && self
                .sections
                .iter()
                .chain(self.timeline.entries().map(|(_, tracker)| tracker))
                .any(|tracker| !self.entrance_of(tracker).is_settled() && tracker.is_revealed())
    }

    #[must_use]
    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    #[must_use]
    pub fn features(&self) -> HostFeatures {
        self.features
    }

    #[must_use]
    pub fn is_revealed(&self, section: Section) -> bool {
        self.sections
            .get(section.index())
            .is_some_and(RevealTracker::is_revealed)
    }

    /// Entrance state of a card at the current step.
    #[must_use]
    pub fn entrance(&self, section: Section) -> Entrance {
        self.sections
            .get(section.index())
            .map_or(Entrance::SETTLED, |tracker| self.entrance_of(tracker))
    }

    #[must_use]
    pub fn timeline(&self) -> &MemoryTimeline {
        &self.timeline
    }

    #[must_use]
    pub fn escape(&self) -> &EscapeGame {
        &self.escape
    }

    #[must_use]
    pub fn story(&self) -> &StoryMachine {
        &self.story
    }

    #[must_use]
    pub fn letter(&self) -> &LetterComposer {
        &self.letter
    }

    #[must_use]
    pub fn countdown(&self) -> &CountdownClock {
        &self.countdown
    }

    #[must_use]
    pub fn music(&self) -> &MusicToggle {
        &self.music
    }

    #[must_use]
    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    /// The page is "cracked" once the countdown has arrived.
    #[must_use]
    pub fn is_cracked(&self) -> bool {
        self.countdown.is_arrived()
    }
}

impl Model for LabModel {
    type Message = Msg;

    fn on_step(&mut self, now: Duration) {
        self.now = now;
    }

    fn init(&mut self) -> Cmd<Msg> {
        if !self.features.intersection {
            info!(target: "vlab.reveal", "viewport observation unavailable; revealing everything");
            for tracker in &mut self.sections {
                tracker.fail_open(self.now);
            }
            self.timeline.fail_open(self.now);
        }
        let layout = &self.config.layout;
        self.escape.resize(layout.escape_zone, layout.decline_button);
        Cmd::none()
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Event(event) => match route(event) {
                Some(msg) => self.update(msg),
                None => Cmd::none(),
            },
            Msg::Story(action) => match self.story.apply(action).map(|t| t.burst) {
                Some(BurstChange::Start { generation }) => Cmd::schedule(
                    BURST_TIMER,
                    Duration::from_millis(self.config.story.burst_ms),
                    Msg::BurstExpired(generation),
                ),
                Some(BurstChange::Clear) => Cmd::cancel(BURST_TIMER),
                Some(BurstChange::Keep) | None => Cmd::none(),
            },
            Msg::BurstExpired(generation) => {
                if self.story.expire_burst(generation) {
                    debug!(target: "vlab.story", generation, "confetti burst ended");
                }
                Cmd::none()
            }
            Msg::Evade => {
                self.escape.evade();
                Cmd::none()
            }
            Msg::Accept => {
                if self.escape.accept() {
                    info!(target: "vlab.escape", evasions = self.escape.evasions(), "valentine accepted");
                }
                Cmd::none()
            }
            Msg::Measured { container, element } => {
                self.escape.resize(container, element);
                Cmd::none()
            }
            Msg::Seen { target, ratio } => {
                self.observe(target, ratio);
                Cmd::none()
            }
            Msg::Mood(value) => {
                self.letter.set_mood(&value);
                Cmd::none()
            }
            Msg::Emoji(value) => {
                self.letter.set_emoji(&value);
                Cmd::none()
            }
            Msg::Length(value) => {
                self.letter.set_length(&value);
                Cmd::none()
            }
            Msg::Copy => self.copy(),
            Msg::CopyFinished(result) => {
                if let Err(reason) = &result {
                    warn!(target: "vlab.letter", %reason, "copy failed");
                }
                let generation = self.letter.copy_finished(result.is_ok());
                Cmd::schedule(
                    STATUS_TIMER,
                    Duration::from_millis(self.config.letter.status_clear_ms),
                    Msg::StatusExpired(generation),
                )
            }
            Msg::StatusExpired(generation) => {
                self.letter.clear_status(generation);
                Cmd::none()
            }
            Msg::Share => self.share(),
            Msg::ShareFinished(outcome) => match outcome {
                None => self.copy(),
                Some(ShareOutcome::Shared) => {
                    debug!(target: "vlab.letter", "letter shared");
                    Cmd::none()
                }
                Some(ShareOutcome::Cancelled) => {
                    debug!(target: "vlab.letter", "share cancelled");
                    Cmd::none()
                }
                Some(ShareOutcome::Failed(reason)) => {
                    warn!(target: "vlab.letter", %reason, "share failed");
                    Cmd::none()
                }
            },
            Msg::CountdownTick(local) => {
                if self.countdown.tick(local) == TickOutcome::JustArrived {
                    info!(target: "vlab.countdown", "page cracked");
                }
                Cmd::none()
            }
            Msg::ToggleMusic => {
                let visible = self.music.toggle();
                debug!(target: "vlab.music", visible, "music player toggled");
                Cmd::none()
            }
            Msg::AnimationFrame => Cmd::none(),
        }
    }

    fn view(&self, frame: &mut vlab_core::Frame) {
        crate::view::render(self, frame);
    }

    fn subscriptions(&self) -> Vec<Every<Msg>> {
        let mut subs = Vec::new();
        if !self.countdown.is_arrived() {
            subs.push(Every::new(
                COUNTDOWN_SUB,
                "countdown",
                Duration::from_millis(self.config.countdown.tick_ms),
                |ctx| Msg::CountdownTick(ctx.local),
            ));
        }
        if self.entrances_in_flight() {
            subs.push(Every::new(MOTION_SUB, "motion", ANIMATION_FRAME, |_| {
                Msg::AnimationFrame
            }));
        }
        subs
    }
}
