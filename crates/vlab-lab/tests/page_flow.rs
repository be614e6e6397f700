//! End-to-end page sessions on a deterministic clock.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use vlab_core::{DeterministicClock, Event};
use vlab_lab::{LabConfig, LabModel, Section, ids};
use vlab_runtime::{Capabilities, MemoryClipboard, RecordingShare, ShareOutcome, StepProgram};
use vlab_widgets::{CopyStatus, EscapeStatus, StoryAction, StoryStep};

type Page = StepProgram<LabModel, DeterministicClock>;

fn at(month: u32, day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, month, day)
        .and_then(|d| d.and_hms_opt(h, m, s))
        .unwrap()
}

fn page_with(config: LabConfig, caps: Capabilities, origin: NaiveDateTime) -> Page {
    let model = LabModel::new(config, caps.features(), origin, Some(42));
    let mut page = StepProgram::new(model, DeterministicClock::starting_at(origin), caps, 72);
    page.init();
    page
}

fn page(caps: Capabilities) -> Page {
    page_with(LabConfig::default(), caps, at(2, 1, 12, 0, 0))
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn click_story(page: &mut Page, action: StoryAction) {
    page.push_event(Event::click(ids::story_button(action)));
}

#[test]
fn reentering_an_ending_restarts_the_burst() {
    let mut page = page(Capabilities::new());
    click_story(&mut page, StoryAction::Advance);
    click_story(&mut page, StoryAction::DeclineJoke);
    page.step();
    assert_eq!(page.model().story().step(), StoryStep::EndingFunny);
    assert!(page.model().story().burst_active());

    page.clock_mut().advance(ms(1000));
    click_story(&mut page, StoryAction::Reset);
    click_story(&mut page, StoryAction::Advance);
    click_story(&mut page, StoryAction::DeclineJoke);
    page.step();
    assert_eq!(page.pending_timers(), 1);

    // The first burst would have ended here.
    page.advance(ms(1400));
    assert!(page.model().story().burst_active());

    page.advance(ms(1000));
    assert!(!page.model().story().burst_active());
    assert_eq!(page.pending_timers(), 0);
}

#[test]
fn story_buttons_follow_the_scene() {
    let mut page = page(Capabilities::new());
    assert!(page.frame().contains("[ Сонголтоо үзье ]"));
    click_story(&mut page, StoryAction::Advance);
    // Not offered on the choice scene.
    click_story(&mut page, StoryAction::Romantic);
    page.step();
    assert_eq!(page.model().story().step(), StoryStep::Choice);
    assert!(!page.model().story().burst_active());

    click_story(&mut page, StoryAction::Listen);
    click_story(&mut page, StoryAction::Romantic);
    page.step();
    assert_eq!(page.model().story().step(), StoryStep::EndingRomantic);
    assert!(page.frame().contains("★"));
}

#[test]
fn copy_shows_status_then_clears() {
    let clipboard = MemoryClipboard::new();
    let log = clipboard.log();
    let mut page = page(Capabilities::new().with_clipboard(clipboard));
    page.push_event(Event::select(ids::LETTER_MOOD, "Funny"));
    page.push_event(Event::click(ids::LETTER_COPY));
    page.step();
    assert_eq!(page.model().letter().status(), CopyStatus::Idle);

    page.step();
    assert_eq!(page.model().letter().status(), CopyStatus::Copied);
    assert!(page.frame().contains("Copied!"));
    assert_eq!(log.writes(), vec![page.model().letter().text().to_owned()]);

    page.advance(ms(1499));
    assert_eq!(page.model().letter().status(), CopyStatus::Copied);
    page.advance(ms(1));
    assert_eq!(page.model().letter().status(), CopyStatus::Idle);
    assert!(!page.frame().contains("Copied!"));
}

#[test]
fn second_copy_extends_the_status() {
    let mut page = page(Capabilities::new().with_clipboard(MemoryClipboard::new()));
    page.push_event(Event::click(ids::LETTER_COPY));
    page.step();
    page.step();
    page.advance(ms(1000));
    page.push_event(Event::click(ids::LETTER_COPY));
    page.step();
    page.step();
    page.advance(ms(1000));
    assert_eq!(page.model().letter().status(), CopyStatus::Copied);
    page.advance(ms(500));
    assert_eq!(page.model().letter().status(), CopyStatus::Idle);
}

#[test]
fn denied_clipboard_reports_failure() {
    let mut page = page(Capabilities::new().with_clipboard(MemoryClipboard::denying("no focus")));
    page.push_event(Event::click(ids::LETTER_COPY));
    page.step();
    page.step();
    assert_eq!(page.model().letter().status(), CopyStatus::Failed);
    assert!(page.frame().contains("Copy failed"));
}

#[test]
fn missing_clipboard_reports_failure() {
    let mut page = page(Capabilities::new());
    page.push_event(Event::click(ids::LETTER_COPY));
    page.step();
    page.step();
    assert_eq!(page.model().letter().status(), CopyStatus::Failed);
}

#[test]
fn native_share_gets_title_and_letter() {
    let share = RecordingShare::new(ShareOutcome::Shared);
    let share_log = share.log();
    let clipboard = MemoryClipboard::new();
    let clip_log = clipboard.log();
    let mut page = page(
        Capabilities::new()
            .with_clipboard(clipboard)
            .with_share(share),
    );
    page.push_event(Event::select(ids::LETTER_EMOJI, "💘"));
    page.push_event(Event::click(ids::LETTER_SHARE));
    page.step();
    page.step();

    let requests = share_log.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].title, "Love Letter");
    assert_eq!(requests[0].text, page.model().letter().text());
    assert!(requests[0].text.contains("💘"));
    assert!(clip_log.writes().is_empty());
    assert_eq!(page.model().letter().status(), CopyStatus::Idle);
}

#[test]
fn cancelled_share_changes_nothing() {
    let mut page = page(Capabilities::new().with_share(RecordingShare::new(ShareOutcome::Cancelled)));
    page.push_event(Event::click(ids::LETTER_SHARE));
    page.step();
    page.step();
    assert_eq!(page.model().letter().status(), CopyStatus::Idle);
    assert_eq!(page.pending_timers(), 0);
}

#[test]
fn share_without_native_support_copies() {
    let clipboard = MemoryClipboard::new();
    let log = clipboard.log();
    let mut page = page(Capabilities::new().with_clipboard(clipboard));
    page.push_event(Event::click(ids::LETTER_SHARE));
    page.step();
    page.step();
    assert_eq!(log.writes().len(), 1);
    assert_eq!(page.model().letter().status(), CopyStatus::Copied);
}

#[test]
fn countdown_arrives_and_cracks_the_page() {
    let mut config = LabConfig::default();
    config.motion.enabled = false;
    let mut page = page_with(config, Capabilities::new(), at(2, 13, 23, 59, 58));
    assert_eq!(page.active_subscriptions(), vec![1]);
    assert!(!page.model().is_cracked());

    page.advance(ms(1000));
    assert!(page.frame().contains("1 Seconds"));

    page.advance(ms(1000));
    assert!(page.model().is_cracked());
    assert!(page.active_subscriptions().is_empty());
    assert!(page.frame().contains("Одоо би чамд үүнийг хэлэх цаг боллоо…"));
    assert!(page.frame().lines()[0].starts_with('╳'));
    assert!(page.frame().lines().last().is_some_and(|l| l.starts_with('╳')));
}

#[test]
fn revealed_cards_animate_alongside_the_countdown() {
    let mut page = page_with(LabConfig::default(), Capabilities::new(), at(2, 13, 23, 59, 58));
    assert_eq!(page.active_subscriptions(), vec![1, 2]);

    page.run_for(ms(500), ms(50));
    assert_eq!(page.active_subscriptions(), vec![1]);

    page.run_for(ms(1500), ms(500));
    assert!(page.model().is_cracked());
    assert!(page.active_subscriptions().is_empty());
}

#[test]
fn starting_on_valentines_day_counts_to_next_year() {
    let page = page_with(LabConfig::default(), Capabilities::new(), at(2, 14, 0, 0, 0));
    assert!(!page.model().is_cracked());
    assert!(page.model().countdown().remaining().days >= 364);
}

#[test]
fn countdown_card_renders_remaining_time() {
    let mut config = LabConfig::default();
    config.motion.enabled = false;
    let page = page_with(config, Capabilities::new(), at(2, 13, 23, 59, 58));
    let lines = page.frame().lines();
    let tail: Vec<&str> = lines[lines.len() - 4..].iter().map(String::as_str).collect();
    assert_eq!(
        tail,
        vec![
            "5️⃣ Countdown to Valentine ⏳",
            "  Feb 14 хүртэл countdown.",
            "",
            "  0 Days  0 Hours  0 Minutes  2 Seconds",
        ]
    );
}

#[test]
fn cards_stay_hidden_until_seen() {
    let mut page = page(Capabilities::new().with_intersection(true));
    assert!(Section::ALL.iter().all(|s| !page.model().is_revealed(*s)));
    assert!(!page.frame().contains("Feb 14 хүртэл countdown."));

    page.push_event(Event::Intersection {
        target: Section::Countdown.id(),
        ratio: 0.2,
    });
    page.step();
    assert!(!page.model().is_revealed(Section::Countdown));

    page.push_event(Event::Intersection {
        target: Section::Countdown.id(),
        ratio: 0.6,
    });
    page.step();
    assert!(page.model().is_revealed(Section::Countdown));
    assert!(page.frame().contains("⋯ 0%"));

    page.push_event(Event::Intersection {
        target: Section::Countdown.id(),
        ratio: 0.0,
    });
    page.step();
    assert!(page.model().is_revealed(Section::Countdown));
    assert!(!page.model().is_revealed(Section::Story));
}

#[test]
fn entrance_frames_stop_once_settled() {
    let mut page = page(Capabilities::new().with_intersection(true));
    assert_eq!(page.active_subscriptions(), vec![1]);

    page.push_event(Event::Intersection {
        target: Section::Story.id(),
        ratio: 1.0,
    });
    page.step();
    assert_eq!(page.active_subscriptions(), vec![1, 2]);

    page.run_for(ms(250), ms(50));
    assert!(!page.model().entrance(Section::Story).is_settled());

    page.run_for(ms(250), ms(50));
    assert!(page.model().entrance(Section::Story).is_settled());
    assert_eq!(page.active_subscriptions(), vec![1]);
    assert!(!page.frame().contains("⋯"));
}

#[test]
fn timeline_entries_reveal_one_by_one() {
    let mut page = page(Capabilities::new().with_intersection(true));
    page.push_event(Event::Intersection {
        target: Section::Timeline.id(),
        ratio: 1.0,
    });
    page.push_event(Event::Intersection {
        target: ids::timeline_entry(0),
        ratio: 0.9,
    });
    page.step();
    assert_eq!(page.model().timeline().revealed_count(), 1);
    assert!(page.frame().contains("○ …"));
}

#[test]
fn decline_runs_away_until_accept() {
    let mut page = page(Capabilities::new());
    for _ in 0..4 {
        page.push_event(Event::hover(ids::DECLINE));
    }
    page.step();
    let game = page.model().escape();
    assert_eq!(game.evasions(), 4);
    assert_eq!(game.status(), EscapeStatus::Nudge);
    assert!(game.scale() > 1.05);
    assert!(game.position().x <= game.bounds().width);
    assert!(page.frame().contains(EscapeStatus::Nudge.message()));

    page.push_event(Event::click(ids::ACCEPT));
    page.step();
    assert_eq!(page.model().escape().status(), EscapeStatus::Celebrate);
    assert!(!page.frame().contains("( NO )"));
    assert!(page.frame().contains(EscapeStatus::Celebrate.message()));

    page.push_event(Event::hover(ids::DECLINE));
    page.step();
    assert_eq!(page.model().escape().evasions(), 4);
}

#[test]
fn music_toggle_shows_the_player() {
    let mut page = page(Capabilities::new());
    assert!(!page.frame().contains("youtube"));
    page.push_event(Event::click(ids::MUSIC_TOGGLE));
    page.step();
    assert!(page.model().music().is_visible());
    assert!(page.frame().contains("NXmRAQ-9Eis"));
    page.push_event(Event::click(ids::MUSIC_TOGGLE));
    page.step();
    assert!(!page.model().music().is_visible());
}

#[test]
fn close_tears_the_page_down() {
    let mut page = page(Capabilities::new());
    click_story(&mut page, StoryAction::Advance);
    click_story(&mut page, StoryAction::DeclineJoke);
    page.push_event(Event::click(ids::LETTER_COPY));
    page.step();
    assert_eq!(page.pending_timers(), 1);

    page.push_event(Event::Close);
    let result = page.step();
    assert!(!result.running);
    assert_eq!(page.pending_timers(), 0);
    assert!(page.active_subscriptions().is_empty());

    page.advance(ms(5000));
    assert!(page.model().story().burst_active());
}

#[test]
fn same_seed_same_page() {
    let a = page(Capabilities::new());
    let b = page(Capabilities::new());
    assert_eq!(a.frame().to_text(), b.frame().to_text());
    assert_eq!(a.model().escape().position(), b.model().escape().position());
}
