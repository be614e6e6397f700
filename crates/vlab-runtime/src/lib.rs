#![forbid(unsafe_code)]

//! Lab runtime.
//!
//! Host-driven Elm-style runtime: the host pushes [`vlab_core::Event`]s and
//! advances a [`vlab_core::Clock`]; the [`StepProgram`] converts events into
//! model messages, applies [`Model::update`], executes the returned
//! [`Cmd`]s, fires due timers and subscriptions, and renders a frame when
//! anything changed.
//!
//! # Key Components
//!
//! - [`Model`] - Trait for application state and behavior
//! - [`Cmd`] - Commands for side effects (messages, keyed timers, tasks)
//! - [`TimerQueue`] - Keyed one-shot timers
//! - [`Every`] - Declared fixed-period subscription
//! - [`Capabilities`] - Clipboard / share / intersection collaborators
//! - [`StepProgram`] - The deterministic step loop
//! - [`CancellationSource`] - Shutdown signal for a host loop waiting between steps
//!
//! Everything is single-threaded: no operation here blocks, and nothing is
//! shared between owners.

pub mod cancellation;
pub mod capabilities;
pub mod program;
pub mod step_program;
pub mod subscription;
pub mod timer;

pub use cancellation::{CancellationSource, CancellationToken};
pub use capabilities::{
    Capabilities, Clipboard, ClipboardError, ClipboardLog, HostFeatures, MemoryClipboard,
    RecordingShare, Share, ShareLog, ShareOutcome, ShareRequest,
};
pub use program::{Cmd, Model, Task};
pub use step_program::{StepProgram, StepResult};
pub use subscription::{Every, SubId, TickContext};
pub use timer::{TimerId, TimerQueue};
