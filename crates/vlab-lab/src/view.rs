#![forbid(unsafe_code)]

//! Text rendering of the page.
//!
//! Cards that have not been revealed yet render their header only. Cards
//! that are still entering show their entrance progress next to the header.

use vlab_core::{Entrance, Frame};
use vlab_widgets::countdown::CountdownClock;
use vlab_widgets::particles::Heart;
use vlab_widgets::story::Choice;
use vlab_widgets::timeline::CLOSING_LINE;
use vlab_widgets::{CopyStatus, MusicToggle};

use crate::app::{LabModel, Section};

const EYEBROW: &str = "Valentine Interactive Lab";
const HEADLINE: &str = "Хайрын 5 төрөлт туршлага ❤️";
const SUBTITLE: &str = "Бүгд нь нэг хуудсан дээр “КDL-ийн зүрхэнд”  байрласан.";

impl Section {
    #[must_use]
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Story => "1️⃣",
            Self::Timeline => "2️⃣",
            Self::Escape => "3️⃣",
            Self::Letter => "4️⃣",
            Self::Countdown => "5️⃣",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Story => "“Choose Your Ending” Valentine 💘",
            Self::Timeline => "“Memory Timeline” ❤️",
            Self::Escape => "Халинаа, чи KDL-ийн Валентайн болох уу? 😈",
            Self::Letter => "Love Letter Generator ✍️",
            Self::Countdown => "Countdown to Valentine ⏳",
        }
    }

    #[must_use]
    pub const fn note(self) -> &'static str {
        match self {
            Self::Story => "“Надад чамд хэлэх нэг зүйл байна…”",
            Self::Timeline => "Scroll хийх тусам түүх амилна.",
            Self::Escape => "NO товч зугтана. YES л ялна.",
            Self::Letter => "Mood + Emoji + Length = AI маягийн захиа",
            Self::Countdown => "Feb 14 хүртэл countdown.",
        }
    }
}

/// Render the whole page.
pub fn render(model: &LabModel, frame: &mut Frame) {
    if model.is_cracked() {
        frame.rule('╳');
    }
    hearts_line(model, frame, |heart| heart_glyph(heart.size));
    frame.line(EYEBROW);
    frame.line(HEADLINE);
    frame.line(SUBTITLE);
    music(model.music(), frame);

    for section in Section::ALL {
        frame.blank();
        frame.rule('─');
        let entrance = model.entrance(section);
        if !model.is_revealed(section) {
            frame.line(format!("{} {}", section.badge(), section.title()));
            frame.indented(1, "…");
            continue;
        }
        frame.line(header(section, entrance));
        frame.indented(1, section.note());
        match section {
            Section::Story => story(model, frame),
            Section::Timeline => timeline(model, frame),
            Section::Escape => escape(model, frame),
            Section::Letter => letter(model, frame),
            Section::Countdown => countdown(model.countdown(), frame),
        }
    }

    if model.is_cracked() {
        frame.rule('╳');
    }
}

fn header(section: Section, entrance: Entrance) -> String {
    if entrance.is_settled() {
        format!("{} {}", section.badge(), section.title())
    } else {
        format!(
            "{} {}  ⋯ {:.0}%",
            section.badge(),
            section.title(),
            entrance.opacity * 100.0
        )
    }
}

/// Hearts at or above this font size render as the heavy glyph.
const BIG_HEART_PX: u8 = 34;

fn heart_glyph(size: u8) -> char {
    if size >= BIG_HEART_PX { '❤' } else { '♥' }
}

/// One row of particles, each placed at its percentage of the frame width.
fn hearts_line(model: &LabModel, frame: &mut Frame, glyph: impl Fn(&Heart) -> char) {
    let width = frame.width().max(1);
    let mut row = vec![' '; width];
    for heart in model.particles().hearts() {
        let col = usize::from(heart.left) * (width - 1) / 100;
        row[col] = glyph(heart);
    }
    frame.line(row.into_iter().collect::<String>().trim_end().to_owned());
}

fn confetti_line(model: &LabModel, frame: &mut Frame) {
    const GLYPHS: [char; 4] = ['✦', '✧', '•', '◆'];
    let width = frame.width().max(1);
    let mut row = vec![' '; width];
    for piece in model.particles().confetti() {
        let col = ((piece.left / 100.0) * (width - 1) as f64) as usize;
        row[col.min(width - 1)] = GLYPHS[usize::from(piece.hue / 90) % GLYPHS.len()];
    }
    frame.indented(1, row.into_iter().collect::<String>().trim_end());
}

fn music(music: &MusicToggle, frame: &mut Frame) {
    frame.line(format!("[ {} ]", music.button_label()));
    if music.is_visible() {
        frame.indented(1, MusicToggle::HINT);
        frame.indented(1, format!("▶ {}", music.embed_url()));
        frame.indented(1, format!("{}: {}", MusicToggle::LINK_LABEL, music.watch_url()));
    }
}

fn buttons(choices: &[Choice]) -> String {
    choices
        .iter()
        .map(|choice| {
            if choice.primary {
                format!("[ {} ]", choice.label)
            } else {
                format!("( {} )", choice.label)
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn story(model: &LabModel, frame: &mut Frame) {
    let scene = model.story().scene();
    frame.blank();
    if let Some(title) = scene.title {
        frame.indented(1, format!("★ {title}"));
    }
    frame.indented(1, scene.line);
    frame.indented(1, buttons(scene.choices));
    if model.story().burst_active() {
        confetti_line(model, frame);
    }
}

fn timeline(model: &LabModel, frame: &mut Frame) {
    frame.blank();
    for (memory, tracker) in model.timeline().entries() {
        if tracker.is_revealed() {
            frame.indented(1, format!("{} {}", memory.icon, memory.title));
            frame.indented(2, memory.subtitle);
            frame.indented(2, memory.note);
        } else {
            frame.indented(1, "○ …");
        }
    }
    frame.indented(1, CLOSING_LINE);
}

fn escape(model: &LabModel, frame: &mut Frame) {
    let game = model.escape();
    frame.blank();
    frame.indented(1, format!("[ YES ] ×{:.2}", game.scale()));
    if game.decline_visible() {
        let pos = game.position();
        frame.indented(1, format!("( NO ) @ {:.0},{:.0}", pos.x, pos.y));
    }
    frame.indented(1, game.status().message());
    if game.is_accepted() {
        hearts_line(model, frame, |heart| heart_glyph(heart.overlay_size()));
    }
}

fn letter(model: &LabModel, frame: &mut Frame) {
    let composer = model.letter();
    let params = composer.params();
    frame.blank();
    frame.indented(
        1,
        format!(
            "Mood: {}   Emoji: {}   Length: {}",
            params.mood.label(),
            params.emoji.glyph(),
            params.length.label()
        ),
    );
    let width = frame.width().saturating_sub(4).max(20);
    for line in wrap(composer.text(), width) {
        frame.indented(2, line);
    }
    let status = composer.status();
    if status == CopyStatus::Idle {
        frame.indented(1, "[ Copy ]  ( Share )");
    } else {
        frame.indented(1, format!("[ Copy ]  ( Share )  {}", status.label()));
    }
}

fn countdown(clock: &CountdownClock, frame: &mut Frame) {
    frame.blank();
    let cells: Vec<String> = clock
        .remaining()
        .fields()
        .iter()
        .map(|(value, unit)| format!("{value} {unit}"))
        .collect();
    frame.indented(1, cells.join("  "));
    if clock.is_arrived() {
        frame.indented(1, CountdownClock::arrival_message());
    }
}

/// Greedy word wrap on character counts.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in text.split_whitespace() {
        let len = word.chars().count();
        if current_len > 0 && current_len + 1 + len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += len;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
