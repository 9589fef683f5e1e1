#![forbid(unsafe_code)]

//! Output side of the page: style, class, and text mutations.
//!
//! The runtime never touches the DOM. It hands every visual change to a
//! [`Surface`], which the host applies to real elements. [`RecordingSurface`]
//! captures the mutations instead, for headless hosts and tests.

use std::cell::RefCell;
use std::time::Duration;

use folio_core::ElementId;

/// Class added to revealed sections and cards.
pub const CLASS_VISIBLE: &str = "visible";
/// Class added to the header once the page is scrolled.
pub const CLASS_SCROLLED: &str = "scrolled";
/// Class added to the body when the page is mounted.
pub const CLASS_LOADED: &str = "loaded";

/// Sink for visual mutations.
///
/// Methods take `&self`; implementations share the surface behind an `Rc`.
/// Unknown elements are ignored.
pub trait Surface {
    /// Replace the element's text content.
    fn set_text(&self, element: ElementId, text: &str);

    /// Set the element's width as a percentage of its container.
    fn set_width_percent(&self, element: ElementId, percent: u8);

    /// Add a class (no-op if present).
    fn add_class(&self, element: ElementId, class: &str);

    /// Remove a class (no-op if absent).
    fn remove_class(&self, element: ElementId, class: &str);

    /// Set the element's CSS transition delay.
    fn set_transition_delay(&self, element: ElementId, delay: Duration);
}

/// A single recorded mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// `textContent = text`.
    Text { element: ElementId, text: String },
    /// `style.width = percent%`.
    Width { element: ElementId, percent: u8 },
    /// `classList.add(class)`.
    AddClass { element: ElementId, class: String },
    /// `classList.remove(class)`.
    RemoveClass { element: ElementId, class: String },
    /// `style.transitionDelay = delay`.
    TransitionDelay { element: ElementId, delay: Duration },
}

impl Mutation {
    /// The element this mutation applies to.
    #[must_use]
    pub fn element(&self) -> ElementId {
        match self {
            Self::Text { element, .. }
            | Self::Width { element, .. }
            | Self::AddClass { element, .. }
            | Self::RemoveClass { element, .. }
            | Self::TransitionDelay { element, .. } => *element,
        }
    }
}

/// Surface that records mutations in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    log: RefCell<Vec<Mutation>>,
}

impl RecordingSurface {
    /// Create an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every mutation so far.
    #[must_use]
    pub fn mutations(&self) -> Vec<Mutation> {
        self.log.borrow().clone()
    }

    /// Take every mutation so far, leaving the recording empty.
    pub fn drain(&self) -> Vec<Mutation> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    /// Number of recorded mutations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// Replay class mutations to tell whether `element` currently has `class`.
    #[must_use]
    pub fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.log.borrow().iter().fold(false, |has, m| match m {
            Mutation::AddClass { element: e, class: c } if *e == element && c == class => true,
            Mutation::RemoveClass { element: e, class: c } if *e == element && c == class => false,
            _ => has,
        })
    }

    /// Latest text set on `element`.
    #[must_use]
    pub fn text_of(&self, element: ElementId) -> Option<String> {
        self.log.borrow().iter().rev().find_map(|m| match m {
            Mutation::Text { element: e, text } if *e == element => Some(text.clone()),
            _ => None,
        })
    }

    /// Every text set on `element`, oldest first.
    #[must_use]
    pub fn text_history(&self, element: ElementId) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|m| match m {
                Mutation::Text { element: e, text } if *e == element => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Latest width set on `element`.
    #[must_use]
    pub fn width_of(&self, element: ElementId) -> Option<u8> {
        self.log.borrow().iter().rev().find_map(|m| match m {
            Mutation::Width { element: e, percent } if *e == element => Some(*percent),
            _ => None,
        })
    }

    /// Latest transition delay set on `element`.
    #[must_use]
    pub fn transition_delay_of(&self, element: ElementId) -> Option<Duration> {
        self.log.borrow().iter().rev().find_map(|m| match m {
            Mutation::TransitionDelay { element: e, delay } if *e == element => Some(*delay),
            _ => None,
        })
    }

    fn push(&self, mutation: Mutation) {
        self.log.borrow_mut().push(mutation);
    }
}

impl Surface for RecordingSurface {
    fn set_text(&self, element: ElementId, text: &str) {
        self.push(Mutation::Text {
            element,
            text: text.to_string(),
        });
    }

    fn set_width_percent(&self, element: ElementId, percent: u8) {
        self.push(Mutation::Width { element, percent });
    }

    fn add_class(&self, element: ElementId, class: &str) {
        self.push(Mutation::AddClass {
            element,
            class: class.to_string(),
        });
    }

    fn remove_class(&self, element: ElementId, class: &str) {
        self.push(Mutation::RemoveClass {
            element,
            class: class.to_string(),
        });
    }

    fn set_transition_delay(&self, element: ElementId, delay: Duration) {
        self.push(Mutation::TransitionDelay { element, delay });
    }
}
