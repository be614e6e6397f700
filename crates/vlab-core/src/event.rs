#![forbid(unsafe_code)]

//! Canonical host events.
//!
//! The host (browser shim, terminal host, or a test) translates whatever its
//! platform produces into these values and pushes them into the runtime.
//! Targets are identified by [`ElementId`], a static name plus an index for
//! repeated elements such as timeline entries.

use crate::geometry::Size;

/// Identifier of an interactive element on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId {
    name: &'static str,
    index: u16,
}

impl ElementId {
    /// A unique element.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name, index: 0 }
    }

    /// The `index`-th element of a repeated group.
    #[must_use]
    pub const fn nth(name: &'static str, index: u16) -> Self {
        Self { name, index }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn index(&self) -> u16 {
        self.index
    }

    /// Whether this id belongs to the group called `name`.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.index == 0 {
            f.write_str(self.name)
        } else {
            write!(f, "{}#{}", self.name, self.index)
        }
    }
}

/// Kind of pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Pointer entered the element (hover).
    Enter,
    /// Primary activation (click or tap).
    Click,
}

/// Canonical host event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Pointer interaction with an element.
    Pointer {
        kind: PointerKind,
        target: ElementId,
    },

    /// A select-style control changed value.
    Select { target: ElementId, value: String },

    /// A container was (re)measured.
    ///
    /// `container` is the container's inner size; `element` the size of the
    /// element placed inside it.
    Resize {
        target: ElementId,
        container: Size,
        element: Size,
    },

    /// Viewport intersection report for an observed element.
    ///
    /// `ratio` is the visible fraction of the element in `[0, 1]`.
    Intersection { target: ElementId, ratio: f64 },

    /// The host is tearing the page down.
    Close,
}

impl Event {
    /// Shorthand for a click on `target`.
    #[must_use]
    pub const fn click(target: ElementId) -> Self {
        Self::Pointer {
            kind: PointerKind::Click,
            target,
        }
    }

    /// Shorthand for a hover over `target`.
    #[must_use]
    pub const fn hover(target: ElementId) -> Self {
        Self::Pointer {
            kind: PointerKind::Enter,
            target,
        }
    }

    /// Shorthand for a select change.
    #[must_use]
    pub fn select(target: ElementId, value: impl Into<String>) -> Self {
        Self::Select {
            target,
            value: value.into(),
        }
    }

    /// The element this event is addressed to, if any.
    #[must_use]
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Self::Pointer { target, .. }
            | Self::Select { target, .. }
            | Self::Resize { target, .. }
            | Self::Intersection { target, .. } => Some(*target),
            Self::Close => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUTTON: ElementId = ElementId::new("button");

    #[test]
    fn display_unique_and_indexed() {
        assert_eq!(BUTTON.to_string(), "button");
        assert_eq!(ElementId::nth("item", 2).to_string(), "item#2");
    }

    #[test]
    fn target_of_events() {
        assert_eq!(Event::click(BUTTON).target(), Some(BUTTON));
        assert_eq!(Event::select(BUTTON, "x").target(), Some(BUTTON));
        assert_eq!(Event::Close.target(), None);
    }

    #[test]
    fn group_membership() {
        let id = ElementId::nth("item", 3);
        assert!(id.is("item"));
        assert!(!id.is("button"));
        assert_eq!(id.index(), 3);
    }
}
