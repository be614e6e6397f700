#![forbid(unsafe_code)]

//! Host capabilities: clipboard, native share, viewport intersection.
//!
//! Each collaborator is optional. [`HostFeatures`] is the feature-detection
//! snapshot the page shell is composed with; [`Capabilities`] holds the live
//! implementations that [`Task`](crate::Task)s talk to.
//!
//! In-memory implementations ([`MemoryClipboard`], [`RecordingShare`]) are
//! provided for hosts without a platform clipboard and for tests; each hands
//! back a shared log handle so the caller can inspect what happened after
//! the implementation has been moved into [`Capabilities`].

use std::cell::RefCell;
use std::rc::Rc;

/// Clipboard write failure.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// The host has no clipboard.
    #[error("clipboard unavailable")]
    Unavailable,
    /// The platform refused the write (permissions, focus, ...).
    #[error("clipboard write denied: {0}")]
    Denied(String),
    #[error("clipboard I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes text to a clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Payload of a native share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
}

/// Result of a native share attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// The user dismissed the share sheet.
    Cancelled,
    Failed(String),
}

/// Native share sheet.
pub trait Share {
    fn share(&mut self, request: &ShareRequest) -> ShareOutcome;
}

/// Feature-detection snapshot of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostFeatures {
    pub clipboard: bool,
    pub share: bool,
    /// Whether the host reports viewport intersections.
    pub intersection: bool,
}

/// Live host collaborators.
#[derive(Default)]
pub struct Capabilities {
    clipboard: Option<Box<dyn Clipboard>>,
    share: Option<Box<dyn Share>>,
    intersection: bool,
}

impl Capabilities {
    /// A host with no capabilities at all.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Some(Box::new(clipboard));
        self
    }

    #[must_use]
    pub fn with_share(mut self, share: impl Share + 'static) -> Self {
        self.share = Some(Box::new(share));
        self
    }

    #[must_use]
    pub fn with_intersection(mut self, available: bool) -> Self {
        self.intersection = available;
        self
    }

    #[must_use]
    pub fn features(&self) -> HostFeatures {
        HostFeatures {
            clipboard: self.clipboard.is_some(),
            share: self.share.is_some(),
            intersection: self.intersection,
        }
    }

    /// Write to the clipboard, failing with `Unavailable` if there is none.
    pub fn write_clipboard(&mut self, text: &str) -> Result<(), ClipboardError> {
        match self.clipboard.as_mut() {
            Some(clipboard) => clipboard.write_text(text),
            None => Err(ClipboardError::Unavailable),
        }
    }

    /// Open the native share sheet; `None` when sharing is unsupported.
    pub fn share(&mut self, request: &ShareRequest) -> Option<ShareOutcome> {
        self.share.as_mut().map(|share| share.share(request))
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("features", &self.features())
            .finish()
    }
}

/// Shared view of what a [`MemoryClipboard`] received.
#[derive(Debug, Clone, Default)]
pub struct ClipboardLog(Rc<RefCell<Vec<String>>>);

impl ClipboardLog {
    /// Every successful write, oldest first.
    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.0.borrow().last().cloned()
    }
}

/// In-memory clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    log: ClipboardLog,
    deny: Option<String>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that refuses every write with `reason`.
    #[must_use]
    pub fn denying(reason: impl Into<String>) -> Self {
        Self {
            log: ClipboardLog::default(),
            deny: Some(reason.into()),
        }
    }

    #[must_use]
    pub fn log(&self) -> ClipboardLog {
        self.log.clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if let Some(reason) = &self.deny {
            return Err(ClipboardError::Denied(reason.clone()));
        }
        self.log.0.borrow_mut().push(text.to_owned());
        Ok(())
    }
}

/// Shared view of what a [`RecordingShare`] was asked to share.
#[derive(Debug, Clone, Default)]
pub struct ShareLog(Rc<RefCell<Vec<ShareRequest>>>);

impl ShareLog {
    #[must_use]
    pub fn requests(&self) -> Vec<ShareRequest> {
        self.0.borrow().clone()
    }
}

/// Share sheet that records requests and answers with a fixed outcome.
#[derive(Debug, Clone)]
pub struct RecordingShare {
    log: ShareLog,
    outcome: ShareOutcome,
}

impl RecordingShare {
    #[must_use]
    pub fn new(outcome: ShareOutcome) -> Self {
        Self {
            log: ShareLog::default(),
            outcome,
        }
    }

    #[must_use]
    pub fn log(&self) -> ShareLog {
        self.log.clone()
    }
}

impl Share for RecordingShare {
    fn share(&mut self, request: &ShareRequest) -> ShareOutcome {
        self.log.0.borrow_mut().push(request.clone());
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_host_has_no_features() {
        let mut caps = Capabilities::new();
        assert_eq!(caps.features(), HostFeatures::default());
        assert!(matches!(
            caps.write_clipboard("x"),
            Err(ClipboardError::Unavailable)
        ));
        let req = ShareRequest {
            title: "t".into(),
            text: "x".into(),
        };
        assert_eq!(caps.share(&req), None);
    }

    #[test]
    fn memory_clipboard_records_writes() {
        let clipboard = MemoryClipboard::new();
        let log = clipboard.log();
        let mut caps = Capabilities::new().with_clipboard(clipboard);
        assert!(caps.features().clipboard);
        caps.write_clipboard("hello").unwrap();
        assert_eq!(log.writes(), vec!["hello".to_string()]);
    }

    #[test]
    fn denying_clipboard_reports_reason() {
        let mut caps = Capabilities::new().with_clipboard(MemoryClipboard::denying("no focus"));
        let err = caps.write_clipboard("x").unwrap_err();
        assert_eq!(err.to_string(), "clipboard write denied: no focus");
    }

    #[test]
    fn recording_share_answers_with_outcome() {
        let share = RecordingShare::new(ShareOutcome::Cancelled);
        let log = share.log();
        let mut caps = Capabilities::new()
            .with_share(share)
            .with_intersection(true);
        let features = caps.features();
        assert!(features.share && features.intersection && !features.clipboard);
        let req = ShareRequest {
            title: "Love Letter".into(),
            text: "hi".into(),
        };
        assert_eq!(caps.share(&req), Some(ShareOutcome::Cancelled));
        assert_eq!(log.requests(), vec![req]);
    }
}
