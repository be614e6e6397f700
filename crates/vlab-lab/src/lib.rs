#![forbid(unsafe_code)]

//! The Valentine Interactive Lab page.
//!
//! [`LabModel`] composes the widgets from `vlab-widgets` into one page and
//! implements the runtime's [`Model`](vlab_runtime::Model). Any host that can
//! push [`Event`](vlab_core::Event)s into a
//! [`StepProgram`](vlab_runtime::StepProgram) can run it; [`host`] is the
//! terminal one used by the `vlab` binary.
//!
//! ```rust,ignore
//! let config = LabConfig::from_toml_file("vlab.toml")?.validated()?;
//! let clock = SystemClock::new();
//! let caps = Capabilities::new().with_clipboard(MemoryClipboard::new());
//! let model = LabModel::new(config, caps.features(), clock.now_local(), None);
//! let mut program = StepProgram::new(model, clock, caps, 72);
//! program.push_event(Event::click(ids::ACCEPT));
//! program.step();
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod view;

pub use app::{LabModel, Msg, Section, ids, route};
pub use config::{ConfigError, LabConfig, LayoutConfig, LoggingConfig};
pub use error::LabError;
pub use host::{Command, CommandError, HostOptions, Osc52Clipboard, VirtualPage, parse_command};
pub use logging::init_tracing;
