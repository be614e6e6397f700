#![forbid(unsafe_code)]

//! Terminal host.
//!
//! Reads line commands from stdin on a reader thread, feeds them into a
//! [`StepProgram`] driven by the system clock, and prints the page whenever
//! a step renders. Copying uses an OSC 52 escape sequence, which most
//! terminal emulators forward to the system clipboard.
//!
//! The terminal has no viewport, so the host keeps a virtual one: `scroll`
//! moves it over a fixed page layout and reports intersection ratios for
//! every card and timeline entry.

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, info, warn};
use vlab_core::{Clock, Event, Frame, Rect, Size, SystemClock};
use vlab_runtime::{CancellationSource, Capabilities, Clipboard, ClipboardError, StepProgram};
use vlab_widgets::StoryAction;
use vlab_widgets::reveal::intersection_ratio;

use crate::app::{LabModel, Section, ids};
use crate::config::LabConfig;
use crate::error::LabError;

/// Longest pause between steps when nothing is scheduled sooner.
const IDLE_WAIT: Duration = Duration::from_millis(50);

pub const HELP: &str = "\
commands:
  advance | listen | decline | cute | romantic | reset   story choices
  no | yes                                               escape game
  mood <Romantic|Funny|Shy>  emoji <🥹|💘|😂>  length <Short|Long>
  copy | share                                           letter actions
  music                                                  toggle the player
  resize <w> <h>                                         re-measure the escape zone
  seen <card 1-5> <ratio>                                report card visibility
  scroll <y>                                             move the virtual viewport
  help | quit";

/// A parsed stdin command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(Event),
    Resize(Size),
    Seen { card: u16, ratio: f64 },
    Scroll(f64),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("card must be 1-5, got {0}")]
    NoSuchCard(u16),
}

fn number(value: &str) -> Result<f64, CommandError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CommandError::NotANumber(value.to_owned()))
}

fn argument<'a>(
    value: Option<&'a str>,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    value.ok_or(CommandError::MissingArgument { command, expected })
}

/// Parse one line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();
    let first = rest.first().copied();

    if let Some(action) = StoryAction::from_word(head) {
        return Ok(Some(Command::Event(Event::click(ids::story_button(action)))));
    }
    let command = match head {
        "no" => Command::Event(Event::hover(ids::DECLINE)),
        "yes" => Command::Event(Event::click(ids::ACCEPT)),
        "mood" => Command::Event(Event::select(
            ids::LETTER_MOOD,
            argument(first, "mood", "a mood")?,
        )),
        "emoji" => Command::Event(Event::select(
            ids::LETTER_EMOJI,
            argument(first, "emoji", "an emoji")?,
        )),
        "length" => Command::Event(Event::select(
            ids::LETTER_LENGTH,
            argument(first, "length", "a length")?,
        )),
        "copy" => Command::Event(Event::click(ids::LETTER_COPY)),
        "share" => Command::Event(Event::click(ids::LETTER_SHARE)),
        "music" => Command::Event(Event::click(ids::MUSIC_TOGGLE)),
        "resize" => {
            let w = number(argument(first, "resize", "<w> <h>")?)?;
            let h = number(argument(rest.get(1).copied(), "resize", "<w> <h>")?)?;
            Command::Resize(Size::new(w, h))
        }
        "seen" => {
            let card_text = argument(first, "seen", "<card> <ratio>")?;
            let card = card_text
                .parse::<u16>()
                .map_err(|_| CommandError::NotANumber(card_text.to_owned()))?;
            if !(1..=5).contains(&card) {
                return Err(CommandError::NoSuchCard(card));
            }
            let ratio = number(argument(rest.get(1).copied(), "seen", "<card> <ratio>")?)?;
            Command::Seen {
                card: card - 1,
                ratio: ratio.clamp(0.0, 1.0),
            }
        }
        "scroll" => Command::Scroll(number(argument(first, "scroll", "<y>")?)?),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_owned())),
    };
    Ok(Some(command))
}

/// Fixed page geometry used to turn a scroll offset into intersections.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualPage {
    viewport: Size,
    root_margin: f64,
    cards: Vec<Rect>,
    entries: Vec<Rect>,
}

impl VirtualPage {
    const TOP: f64 = 240.0;
    const CARD_HEIGHT: f64 = 420.0;
    const GAP: f64 = 32.0;
    const ENTRY_HEIGHT: f64 = 96.0;

    #[must_use]
    pub fn new(viewport: Size, root_margin: f64) -> Self {
        let cards: Vec<Rect> = Section::ALL
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let y = Self::TOP + i as f64 * (Self::CARD_HEIGHT + Self::GAP);
                Rect::new(0.0, y, viewport.width, Self::CARD_HEIGHT)
            })
            .collect();
        let timeline = cards[Section::Timeline.index()];
        let entries = (0..3)
            .map(|i| {
                let y = timeline.y + 100.0 + f64::from(i) * Self::ENTRY_HEIGHT;
                Rect::new(0.0, y, viewport.width, Self::ENTRY_HEIGHT)
            })
            .collect();
        Self {
            viewport,
            root_margin,
            cards,
            entries,
        }
    }

    /// Intersection events for every observed element at scroll offset `y`.
    #[must_use]
    pub fn scroll_events(&self, y: f64) -> Vec<Event> {
        let view = Rect::new(0.0, y.max(0.0), self.viewport.width, self.viewport.height);
        let cards = Section::ALL.iter().zip(&self.cards).map(|(section, rect)| {
            Event::Intersection {
                target: section.id(),
                ratio: intersection_ratio(*rect, view, self.root_margin),
            }
        });
        let entries = self.entries.iter().enumerate().map(|(i, rect)| Event::Intersection {
            target: ids::timeline_entry(i as u16),
            ratio: intersection_ratio(*rect, view, self.root_margin),
        });
        cards.chain(entries).collect()
    }
}

/// Clipboard that writes an OSC 52 sequence to a terminal.
#[derive(Debug)]
pub struct Osc52Clipboard<W: Write> {
    writer: W,
    max_payload: usize,
}

impl<W: Write> Osc52Clipboard<W> {
    /// Common terminal limit on the base64 payload, in bytes.
    pub const DEFAULT_MAX_PAYLOAD: usize = 74_994;

    pub fn new(writer: W) -> Self {
        Self {
            writer,
            max_payload: Self::DEFAULT_MAX_PAYLOAD,
        }
    }

    #[must_use]
    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let encoded = STANDARD.encode(text.as_bytes());
        if encoded.len() > self.max_payload {
            return Err(ClipboardError::Denied(format!(
                "OSC 52 payload too large ({} > {})",
                encoded.len(),
                self.max_payload
            )));
        }
        write!(self.writer, "\x1b]52;c;{encoded}\x07")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Options the binary passes to [`run`].
#[derive(Debug, Clone, Default)]
pub struct HostOptions {
    pub seed: Option<u64>,
    /// Skip viewport simulation and show every card immediately.
    pub reveal_all: bool,
}

fn print_frame(out: &mut impl Write, frame: &Frame, redraw: bool) -> io::Result<()> {
    if redraw {
        write!(out, "\x1b[H\x1b[2J")?;
    }
    writeln!(out, "{}", frame.to_text())?;
    writeln!(out)?;
    out.flush()
}

/// Run the page until `quit` or end of input.
pub fn run(config: LabConfig, options: HostOptions) -> Result<(), LabError> {
    let clock = SystemClock::new();
    let caps = Capabilities::new()
        .with_clipboard(Osc52Clipboard::new(io::stdout()))
        .with_intersection(!options.reveal_all);
    let page = VirtualPage::new(
        Size::new(config.layout.escape_zone.width * 2.0, 800.0),
        config.reveal.root_margin,
    );
    let decline = config.layout.decline_button;
    let columns = config.layout.columns;
    let model = LabModel::new(config, caps.features(), clock.now_local(), options.seed);
    let mut program = StepProgram::new(model, clock, caps, columns);

    let shutdown = CancellationSource::new();
    let token = shutdown.token();
    let (tx, rx) = mpsc::channel::<Command>();
    let reader = thread::Builder::new()
        .name("vlab-stdin".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match parse_command(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => {
                        if tx.send(command).is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => eprintln!("{err}"),
                }
            }
            let _ = tx.send(Command::Quit);
            shutdown.cancel();
        })?;

    let mut out = io::stdout();
    let redraw = out.is_terminal();
    program.init();
    if !options.reveal_all {
        for event in page.scroll_events(0.0) {
            program.push_event(event);
        }
    }
    info!(target: "vlab.lab", columns, "terminal host started");

    loop {
        for command in rx.try_iter() {
            match command {
                Command::Event(event) => program.push_event(event),
                Command::Resize(container) => program.push_event(Event::Resize {
                    target: ids::ESCAPE_ZONE,
                    container,
                    element: decline,
                }),
                Command::Seen { card, ratio } => program.push_event(Event::Intersection {
                    target: Section::ALL[usize::from(card)].id(),
                    ratio,
                }),
                Command::Scroll(y) => {
                    debug!(target: "vlab.lab", y, "scroll");
                    for event in page.scroll_events(y) {
                        program.push_event(event);
                    }
                }
                Command::Help => writeln!(out, "{HELP}")?,
                Command::Quit => program.push_event(Event::Close),
            }
        }

        let result = program.step();
        if result.rendered {
            print_frame(&mut out, program.frame(), redraw)?;
        }
        if !result.running {
            break;
        }

        let now = program.clock().now_mono();
        let wait = program
            .next_timer_due()
            .map_or(IDLE_WAIT, |due| due.saturating_sub(now).min(IDLE_WAIT));
        token.wait_timeout(wait);
    }

    if reader.is_finished() {
        if reader.join().is_err() {
            warn!(target: "vlab.lab", "stdin reader panicked");
        }
    } else {
        debug!(target: "vlab.lab", "leaving stdin reader blocked on input");
    }
    info!(target: "vlab.lab", frames = program.frames_rendered(), "terminal host stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_words_click_story_buttons() {
        assert_eq!(
            parse_command("cute").unwrap(),
            Some(Command::Event(Event::click(ids::story_button(StoryAction::Cute))))
        );
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn select_commands_keep_their_value() {
        assert_eq!(
            parse_command("emoji 💘").unwrap(),
            Some(Command::Event(Event::select(ids::LETTER_EMOJI, "💘")))
        );
        assert_eq!(
            parse_command("mood").unwrap_err(),
            CommandError::MissingArgument {
                command: "mood",
                expected: "a mood"
            }
        );
    }

    #[test]
    fn numeric_arguments_are_checked() {
        assert_eq!(
            parse_command("resize 300 120").unwrap(),
            Some(Command::Resize(Size::new(300.0, 120.0)))
        );
        assert_eq!(
            parse_command("resize 300 tall").unwrap_err(),
            CommandError::NotANumber("tall".into())
        );
        assert_eq!(
            parse_command("seen 6 0.5").unwrap_err(),
            CommandError::NoSuchCard(6)
        );
        assert_eq!(
            parse_command("seen 2 3").unwrap(),
            Some(Command::Seen { card: 1, ratio: 1.0 })
        );
        assert_eq!(
            parse_command("dance").unwrap_err().to_string(),
            "unknown command `dance` (try `help`)"
        );
    }

    #[test]
    fn scrolling_reveals_cards_in_order() {
        let page = VirtualPage::new(Size::new(640.0, 800.0), -0.10);
        let ratio_of = |events: &[Event], target| {
            events.iter().find_map(|e| match e {
                Event::Intersection { target: t, ratio } if *t == target => Some(*ratio),
                _ => None,
            })
        };
        let top = page.scroll_events(0.0);
        assert_eq!(top.len(), 8);
        assert!(ratio_of(&top, Section::Story.id()).unwrap() > 0.3);
        assert_eq!(ratio_of(&top, Section::Countdown.id()), Some(0.0));

        let bottom = page.scroll_events(2000.0);
        assert!(ratio_of(&bottom, Section::Countdown.id()).unwrap() > 0.3);
        assert_eq!(ratio_of(&bottom, Section::Story.id()), Some(0.0));
    }

    #[test]
    fn osc52_writes_base64_payload() {
        let mut clipboard = Osc52Clipboard::new(Vec::new());
        clipboard.write_text("hi").unwrap();
        assert_eq!(clipboard.into_inner(), b"\x1b]52;c;aGk=\x07".to_vec());
    }

    #[test]
    fn osc52_rejects_oversized_payload() {
        let mut clipboard = Osc52Clipboard::new(Vec::new()).with_max_payload(4);
        let err = clipboard.write_text("hello").unwrap_err();
        assert!(err.to_string().contains("payload too large"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_line_parses_or_errors(line in "\\PC{0,40}") {
                let _ = parse_command(&line);
            }

            #[test]
            fn seen_ratio_is_clamped(card in 1u16..=5, ratio in -10.0f64..10.0) {
                let parsed = parse_command(&format!("seen {card} {ratio}")).unwrap();
                match parsed {
                    Some(Command::Seen { card: c, ratio: r }) => {
                        prop_assert_eq!(c, card - 1);
                        prop_assert!((0.0..=1.0).contains(&r));
                    }
                    other => prop_assert!(false, "unexpected {:?}", other),
                }
            }
        }
    }
}
