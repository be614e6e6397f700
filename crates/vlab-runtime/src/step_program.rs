#![forbid(unsafe_code)]

//! Host-driven step loop.
//!
//! [`StepProgram`] never polls, sleeps, or spawns: the host pushes events,
//! moves the clock, and calls [`StepProgram::step`]. One step:
//!
//! 1. applies messages returned by tasks on the previous step,
//! 2. applies queued host events, in arrival order,
//! 3. fires due one-shot timers, then due subscriptions,
//! 4. runs the capability tasks produced by this step's updates,
//! 5. reconciles declared subscriptions,
//! 6. re-renders if any update ran.
//!
//! With a [`DeterministicClock`] the whole session is reproducible.
//!
//! # Teardown
//!
//! [`StepProgram::shutdown`] (also run on `Cmd::Quit`, `Event::Close`, and
//! drop) cancels every pending timer and stops every subscription.

use core::time::Duration;
use std::collections::VecDeque;

use vlab_core::{Clock, DeterministicClock, Event, Frame};

use crate::capabilities::Capabilities;
use crate::program::{Cmd, Model, Task};
use crate::subscription::{SubId, SubscriptionManager};
use crate::timer::{TimerId, TimerQueue};

/// Outcome of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepResult {
    /// Whether the program is still running after this step.
    pub running: bool,
    /// Whether a new frame was rendered.
    pub rendered: bool,
    /// Number of messages applied.
    pub messages: usize,
}

/// Deterministic, host-driven program runner.
pub struct StepProgram<M: Model, C: Clock> {
    model: M,
    clock: C,
    caps: Capabilities,
    timers: TimerQueue<M::Message>,
    subscriptions: SubscriptionManager<M::Message>,
    events: VecDeque<Event>,
    inbox: VecDeque<M::Message>,
    tasks: VecDeque<Task<M::Message>>,
    frame: Frame,
    frames_rendered: u64,
    dirty: bool,
    running: bool,
    initialized: bool,
}

impl<M: Model, C: Clock> StepProgram<M, C> {
    /// Wrap `model`; the frame is rendered `width` columns wide.
    pub fn new(model: M, clock: C, caps: Capabilities, width: usize) -> Self {
        Self {
            model,
            clock,
            caps,
            timers: TimerQueue::new(),
            subscriptions: SubscriptionManager::new(),
            events: VecDeque::new(),
            inbox: VecDeque::new(),
            tasks: VecDeque::new(),
            frame: Frame::new(width),
            frames_rendered: 0,
            dirty: true,
            running: true,
            initialized: false,
        }
    }

    /// Run `Model::init`, start declared subscriptions, render the first frame.
    ///
    /// Calling it again is a no-op.
    pub fn init(&mut self) -> StepResult {
        if self.initialized {
            return StepResult {
                running: self.running,
                ..StepResult::default()
            };
        }
        self.initialized = true;
        tracing::info!(target: "vlab.program", "program init");
        self.model.on_step(self.clock.now_mono());
        let cmd = self.model.init();
        self.execute(cmd);
        self.finish_step(0)
    }

    /// Queue a host event for the next step.
    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Process everything that is ready at the clock's current time.
    pub fn step(&mut self) -> StepResult {
        if !self.initialized {
            self.init();
        }
        if !self.running {
            return StepResult::default();
        }

        let mut applied = 0;
        self.model.on_step(self.clock.now_mono());

        let carried: Vec<M::Message> = self.inbox.drain(..).collect();
        for msg in carried {
            applied += self.apply(msg);
        }

        while let Some(event) = self.events.pop_front() {
            if !self.running {
                break;
            }
            if matches!(event, Event::Close) {
                tracing::info!(target: "vlab.program", "host closed the page");
                self.shutdown();
                break;
            }
            applied += self.apply(M::Message::from(event));
        }

        if self.running {
            let now = self.clock.now_mono();
            for msg in self.timers.pop_due(now) {
                applied += self.apply(msg);
            }
            let local = self.clock.now_local();
            for msg in self.subscriptions.poll(now, local) {
                applied += self.apply(msg);
            }
        }

        self.finish_step(applied)
    }

    fn finish_step(&mut self, applied: usize) -> StepResult {
        if self.running {
            while let Some(task) = self.tasks.pop_front() {
                tracing::debug!(target: "vlab.effect", task = task.name(), "running task");
                let msg = task.run(&mut self.caps);
                self.inbox.push_back(msg);
            }
            let now = self.clock.now_mono();
            self.subscriptions.reconcile(self.model.subscriptions(), now);
        }

        let rendered = self.running && self.dirty;
        if rendered {
            self.render();
        }
        StepResult {
            running: self.running,
            rendered,
            messages: applied,
        }
    }

    fn apply(&mut self, msg: M::Message) -> usize {
        let cmd = self.model.update(msg);
        self.dirty = true;
        1 + self.execute(cmd)
    }

    /// Execute a command; returns how many extra messages were applied inline.
    fn execute(&mut self, cmd: Cmd<M::Message>) -> usize {
        match cmd {
            Cmd::None => 0,
            Cmd::Quit => {
                tracing::info!(target: "vlab.program", "quit requested");
                self.shutdown();
                0
            }
            Cmd::Batch(cmds) => {
                let mut applied = 0;
                for cmd in cmds {
                    if !self.running {
                        break;
                    }
                    applied += self.execute(cmd);
                }
                applied
            }
            Cmd::Msg(msg) => self.apply(msg),
            Cmd::Schedule { id, delay, msg } => {
                let now = self.clock.now_mono();
                if self.timers.schedule(id, now, delay, msg) {
                    tracing::debug!(target: "vlab.timer", timer = id.name(), "timer rescheduled");
                }
                0
            }
            Cmd::Cancel(id) => {
                if self.timers.cancel(id) {
                    tracing::debug!(target: "vlab.timer", timer = id.name(), "timer cancelled");
                }
                0
            }
            Cmd::Task(task) => {
                self.tasks.push_back(task);
                0
            }
        }
    }

    fn render(&mut self) {
        self.frame.clear();
        self.model.view(&mut self.frame);
        self.frames_rendered += 1;
        self.dirty = false;
    }

    /// Cancel all timers, stop all subscriptions, stop accepting events.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.timers.cancel_all();
        self.subscriptions.stop_all();
        self.tasks.clear();
        self.inbox.clear();
        self.events.clear();
        tracing::info!(
            target: "vlab.program",
            frames = self.frames_rendered,
            "program stopped"
        );
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.timers.is_pending(id)
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_timer_due(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    #[must_use]
    pub fn active_subscriptions(&self) -> Vec<SubId> {
        self.subscriptions.active_ids()
    }
}

impl<M: Model> StepProgram<M, DeterministicClock> {
    /// Advance the clock by `dt` and step once.
    pub fn advance(&mut self, dt: Duration) -> StepResult {
        self.clock.advance(dt);
        self.step()
    }

    /// Advance `total` in increments of `resolution`, stepping after each.
    pub fn run_for(&mut self, total: Duration, resolution: Duration) -> StepResult {
        let resolution = resolution.max(Duration::from_millis(1));
        let mut left = total;
        let mut last = StepResult {
            running: self.running,
            ..StepResult::default()
        };
        while !left.is_zero() && self.running {
            let dt = left.min(resolution);
            left -= dt;
            let result = self.advance(dt);
            last = StepResult {
                running: result.running,
                rendered: last.rendered || result.rendered,
                messages: last.messages + result.messages,
            };
        }
        last
    }
}

impl<M: Model, C: Clock> Drop for StepProgram<M, C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
