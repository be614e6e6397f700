#![forbid(unsafe_code)]

//! Core: geometry, events, clocks, motion, and text frames.
//!
//! # Role in the lab
//! `vlab-core` is the input and output vocabulary shared by every other
//! crate. The runtime (`vlab-runtime`) consumes [`event::Event`] values and a
//! [`clock::Clock`]; widgets (`vlab-widgets`) use the geometry primitives;
//! the page shell renders into a [`frame::Frame`] and picks a
//! [`motion::Motion`] implementation once at composition time.

pub mod clock;
pub mod event;
pub mod frame;
pub mod geometry;
pub mod motion;

pub use clock::{Clock, DeterministicClock, SystemClock};
pub use event::{ElementId, Event, PointerKind};
pub use frame::Frame;
pub use geometry::{Point, Rect, Size};
pub use motion::{Easing, Entrance, Motion, MotionConfig};
