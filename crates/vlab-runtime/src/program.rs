#![forbid(unsafe_code)]

//! Model / update / view contract and the command vocabulary.
//!
//! The runtime separates state (the [`Model`]) from rendering (`view`) and
//! expresses every side effect as a [`Cmd`] value returned from `init` or
//! `update`. Nothing in a model touches a timer, the clipboard, or the clock
//! directly.
//!
//! # Example
//!
//! ```
//! use vlab_core::{Event, Frame};
//! use vlab_runtime::{Cmd, Model, TimerId};
//! use std::time::Duration;
//!
//! const BLINK: TimerId = TimerId::new("blink");
//!
//! struct Blink {
//!     on: bool,
//! }
//!
//! enum Msg {
//!     Toggle,
//!     Off,
//!     Ignore,
//! }
//!
//! impl From<Event> for Msg {
//!     fn from(event: Event) -> Self {
//!         match event {
//!             Event::Pointer { .. } => Msg::Toggle,
//!             _ => Msg::Ignore,
//!         }
//!     }
//! }
//!
//! impl Model for Blink {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Toggle => {
//!                 self.on = true;
//!                 Cmd::schedule(BLINK, Duration::from_secs(1), Msg::Off)
//!             }
//!             Msg::Off => {
//!                 self.on = false;
//!                 Cmd::none()
//!             }
//!             Msg::Ignore => Cmd::none(),
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         frame.line(if self.on { "*" } else { "." });
//!     }
//! }
//! ```

use core::time::Duration;

use vlab_core::{Event, Frame};

use crate::capabilities::Capabilities;
use crate::subscription::Every;
use crate::timer::TimerId;

/// Application state and behavior.
pub trait Model {
    /// Messages that update the model. Must be convertible from host events.
    type Message: From<Event> + 'static;

    /// Monotonic clock reading at the start of each step, before any message
    /// of that step is applied.
    fn on_step(&mut self, _now: Duration) {}

    /// Startup commands, run once before the first frame.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Apply one message and return the side effects it requires.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Render the current state.
    fn view(&self, frame: &mut Frame);

    /// Fixed-period subscriptions that should be running right now.
    ///
    /// Re-evaluated after every update: ids that appear are started, ids that
    /// disappear are stopped.
    fn subscriptions(&self) -> Vec<Every<Self::Message>> {
        Vec::new()
    }
}

/// A deferred side effect that talks to host capabilities.
///
/// Tasks run after the update that produced them finishes; the message they
/// return is applied on the following step, so a task can never observe or
/// interleave with a half-applied update.
pub struct Task<M> {
    name: &'static str,
    run: Box<dyn FnOnce(&mut Capabilities) -> M>,
}

impl<M> Task<M> {
    pub fn new(name: &'static str, run: impl FnOnce(&mut Capabilities) -> M + 'static) -> Self {
        Self {
            name,
            run: Box::new(run),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Execute the task against the host capabilities.
    pub fn run(self, caps: &mut Capabilities) -> M {
        (self.run)(caps)
    }
}

impl<M> std::fmt::Debug for Task<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task").field("name", &self.name).finish()
    }
}

/// Side effects to be executed by the runtime.
pub enum Cmd<M> {
    /// No operation.
    None,
    /// Stop the program (tears down timers and subscriptions).
    Quit,
    /// Execute several commands in order.
    Batch(Vec<Cmd<M>>),
    /// Apply a message immediately, within the same step.
    Msg(M),
    /// Deliver `msg` once after `delay`.
    ///
    /// A pending timer with the same id is cancelled first, so at most one
    /// timer per id is ever pending.
    Schedule {
        id: TimerId,
        delay: Duration,
        msg: M,
    },
    /// Cancel the pending timer with this id, if any.
    Cancel(TimerId),
    /// Run a capability task after this update.
    Task(Task<M>),
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    #[inline]
    pub fn schedule(id: TimerId, delay: Duration, msg: M) -> Self {
        Self::Schedule { id, delay, msg }
    }

    #[inline]
    pub fn cancel(id: TimerId) -> Self {
        Self::Cancel(id)
    }

    pub fn task(name: &'static str, run: impl FnOnce(&mut Capabilities) -> M + 'static) -> Self {
        Self::Task(Task::new(name, run))
    }

    /// Combine commands, flattening trivial cases.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Short name of the command kind, for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Quit => "quit",
            Self::Batch(_) => "batch",
            Self::Msg(_) => "msg",
            Self::Schedule { .. } => "schedule",
            Self::Cancel(_) => "cancel",
            Self::Task(_) => "task",
        }
    }
}

impl<M> Default for Cmd<M> {
    fn default() -> Self {
        Self::None
    }
}

impl<M> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Quit => f.write_str("Quit"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Msg(_) => f.write_str("Msg(..)"),
            Self::Schedule { id, delay, .. } => f
                .debug_struct("Schedule")
                .field("id", id)
                .field("delay", delay)
                .finish_non_exhaustive(),
            Self::Cancel(id) => f.debug_tuple("Cancel").field(id).finish(),
            Self::Task(task) => f.debug_tuple("Task").field(task).finish(),
        }
    }
}
