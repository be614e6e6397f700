#![forbid(unsafe_code)]

//! Memory timeline: three fixed entries, each revealed independently as it
//! scrolls into view.

use core::time::Duration;

use crate::reveal::{RevealConfig, RevealTracker};

/// One timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Memory {
    pub icon: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub note: &'static str,
}

pub const MEMORIES: [Memory; 3] = [
    Memory {
        icon: "🌸",
        title: "Танилцсан өдөр",
        subtitle: "Анхны харц, анхны догдлол",
        note: "Бидний түүх эндээс эхэлсэн.",
    },
    Memory {
        icon: "💬",
        title: "Анхны чат",
        subtitle: "“Сайн уу?” гэдэг үг",
        note: "Тэр хоёрхон үг бүхнийг өөрчилсөн.",
    },
    Memory {
        icon: "😄",
        title: "Анхны инээсэн мөч",
        subtitle: "Инээдээр эхэлсэн хайр",
        note: "Тэр мөчөөс хойш бид үргэлж инээдэг болсон.",
    },
];

pub const CLOSING_LINE: &str = "“Энэ бүхэн зөвхөн эхлэл байсан…”";

/// Reveal state for every entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTimeline {
    trackers: Vec<RevealTracker>,
}

impl MemoryTimeline {
    #[must_use]
    pub fn new(config: &RevealConfig) -> Self {
        Self {
            trackers: MEMORIES
                .iter()
                .map(|_| RevealTracker::from_config(config))
                .collect(),
        }
    }

    /// Feed a report for entry `index`. Out-of-range indices are ignored.
    pub fn observe(&mut self, index: usize, ratio: f64, at: Duration) -> bool {
        self.trackers
            .get_mut(index)
            .is_some_and(|tracker| tracker.observe(ratio, at))
    }

    pub fn fail_open(&mut self, at: Duration) {
        for tracker in &mut self.trackers {
            tracker.fail_open(at);
        }
    }

    /// Entries paired with their reveal state.
    pub fn entries(&self) -> impl Iterator<Item = (&'static Memory, &RevealTracker)> {
        MEMORIES.iter().zip(self.trackers.iter())
    }

    #[must_use]
    pub fn is_revealed(&self, index: usize) -> bool {
        self.trackers.get(index).is_some_and(RevealTracker::is_revealed)
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.trackers.iter().filter(|t| t.is_revealed()).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}
