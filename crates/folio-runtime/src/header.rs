#![forbid(unsafe_code)]

//! Header scroll state.

use std::cell::Cell;
use std::rc::Rc;

use folio_core::ElementId;

use crate::surface::{CLASS_SCROLLED, Surface};

/// Tracks whether the page is scrolled past the header threshold.
///
/// Class mutations are emitted only when the state flips.
pub struct HeaderState {
    element: ElementId,
    threshold_px: f64,
    scrolled: Cell<bool>,
    last_offset: Cell<f64>,
    surface: Rc<dyn Surface>,
}

impl HeaderState {
    #[must_use]
    pub fn new(element: ElementId, threshold_px: f64, surface: Rc<dyn Surface>) -> Self {
        Self {
            element,
            threshold_px,
            scrolled: Cell::new(false),
            last_offset: Cell::new(0.0),
            surface,
        }
    }

    /// Record a new scroll offset. Returns `true` if the state flipped.
    pub fn update(&self, offset_px: f64) -> bool {
        self.last_offset.set(offset_px);
        let scrolled = offset_px > self.threshold_px;
        if scrolled == self.scrolled.replace(scrolled) {
            return false;
        }
        if scrolled {
            self.surface.add_class(self.element, CLASS_SCROLLED);
        } else {
            self.surface.remove_class(self.element, CLASS_SCROLLED);
        }
        tracing::trace!(target: "folio.page", offset_px, scrolled, "header state changed");
        true
    }

    #[must_use]
    pub fn is_scrolled(&self) -> bool {
        self.scrolled.get()
    }

    #[must_use]
    pub fn last_offset(&self) -> f64 {
        self.last_offset.get()
    }
}

impl std::fmt::Debug for HeaderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderState")
            .field("element", &self.element)
            .field("threshold_px", &self.threshold_px)
            .field("scrolled", &self.scrolled.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Mutation, RecordingSurface};

    #[test]
    fn toggles_only_on_crossing() {
        let recording = Rc::new(RecordingSurface::new());
        let header = HeaderState::new(ElementId(1), 50.0, recording.clone());
        assert!(!header.update(10.0));
        assert!(!header.update(50.0), "threshold itself is not scrolled");
        assert!(header.update(51.0));
        assert!(!header.update(400.0));
        assert!(header.is_scrolled());
        assert!(header.update(0.0));
        assert!(!header.is_scrolled());
        assert_eq!(header.last_offset(), 0.0);
        assert_eq!(
            recording.mutations(),
            vec![
                Mutation::AddClass {
                    element: ElementId(1),
                    class: CLASS_SCROLLED.into()
                },
                Mutation::RemoveClass {
                    element: ElementId(1),
                    class: CLASS_SCROLLED.into()
                },
            ]
        );
    }
}
