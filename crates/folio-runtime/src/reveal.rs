#![forbid(unsafe_code)]

//! Section reveal: elements fade in as they scroll into view.
//!
//! Unlike the one-shot triggers, a reveal observer stays connected for the
//! page lifetime. Each element gets the `visible` class the first time it is
//! reported intersecting; later reports are ignored since the class is never
//! removed.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;

use folio_core::host::ObserverId;
use folio_core::{ElementId, ObserveOptions, VisibilityEntry, VisibilityObserver};

use crate::surface::{CLASS_VISIBLE, Surface};

/// Observer marking sections and hobby cards visible.
pub struct SectionReveal {
    observer: Rc<dyn VisibilityObserver>,
    registration: Option<ObserverId>,
    revealed: Rc<RefCell<BTreeSet<ElementId>>>,
}

impl SectionReveal {
    /// Stagger card transition delays and start observing every element.
    ///
    /// Card `i` gets a transition delay of `i * card_stagger`.
    pub fn mount(
        observer: Rc<dyn VisibilityObserver>,
        surface: Rc<dyn Surface>,
        sections: &[ElementId],
        cards: &[ElementId],
        options: ObserveOptions,
        card_stagger: Duration,
    ) -> Self {
        for (index, card) in cards.iter().enumerate() {
            surface.set_transition_delay(*card, card_stagger.saturating_mul(index as u32));
        }

        let revealed = Rc::new(RefCell::new(BTreeSet::new()));
        let mut elements = sections.iter().chain(cards.iter()).copied();
        let registration = elements.next().map(|first| {
            let seen = Rc::clone(&revealed);
            let id = observer.observe(
                first,
                options,
                Rc::new(move |entry: &VisibilityEntry| {
                    if entry.is_intersecting && seen.borrow_mut().insert(entry.element) {
                        tracing::trace!(
                            target: "folio.page",
                            element = entry.element.0,
                            "element revealed"
                        );
                        surface.add_class(entry.element, CLASS_VISIBLE);
                    }
                }),
            );
            for element in elements {
                observer.observe_more(id, element);
            }
            id
        });

        tracing::debug!(
            target: "folio.page",
            sections = sections.len(),
            cards = cards.len(),
            threshold = options.threshold,
            root_margin_px = options.root_margin_px,
            "section reveal mounted"
        );

        Self {
            observer,
            registration,
            revealed,
        }
    }

    /// Whether `element` has been revealed.
    #[must_use]
    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.revealed.borrow().contains(&element)
    }

    /// Number of revealed elements.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed.borrow().len()
    }

    /// Whether the observer is connected.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registration.is_some()
    }
}

impl std::fmt::Debug for SectionReveal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionReveal")
            .field("registration", &self.registration)
            .field("revealed", &self.revealed.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Drop for SectionReveal {
    fn drop(&mut self) {
        if let Some(id) = self.registration.take() {
            self.observer.disconnect(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use folio_core::VirtualHost;

    const MS: Duration = Duration::from_millis(1);

    fn mount(
        host: &Rc<VirtualHost>,
        recording: &Rc<RecordingSurface>,
        sections: &[ElementId],
        cards: &[ElementId],
    ) -> SectionReveal {
        SectionReveal::mount(
            host.clone(),
            recording.clone(),
            sections,
            cards,
            ObserveOptions::threshold(0.1).with_root_margin(-50),
            MS * 100,
        )
    }

    #[test]
    fn cards_get_staggered_delays() {
        let host = Rc::new(VirtualHost::new());
        let recording = Rc::new(RecordingSurface::new());
        let cards = [ElementId(10), ElementId(11), ElementId(12)];
        let _reveal = mount(&host, &recording, &[], &cards);
        assert_eq!(recording.transition_delay_of(ElementId(10)), Some(Duration::ZERO));
        assert_eq!(recording.transition_delay_of(ElementId(12)), Some(MS * 200));
    }

    #[test]
    fn elements_are_revealed_once() {
        let host = Rc::new(VirtualHost::new());
        let recording = Rc::new(RecordingSurface::new());
        let reveal = mount(&host, &recording, &[ElementId(1), ElementId(2)], &[ElementId(10)]);
        assert!(reveal.is_active());

        host.report_visibility(ElementId(1), 0.05);
        assert!(!reveal.is_revealed(ElementId(1)));
        host.report_visibility(ElementId(1), 0.5);
        host.report_visibility(ElementId(1), 0.0);
        host.report_visibility(ElementId(1), 0.9);
        host.report_visibility(ElementId(10), 1.0);

        assert!(reveal.is_revealed(ElementId(1)));
        assert!(recording.has_class(ElementId(1), CLASS_VISIBLE));
        assert!(recording.has_class(ElementId(10), CLASS_VISIBLE));
        assert!(!recording.has_class(ElementId(2), CLASS_VISIBLE));
        assert_eq!(reveal.revealed_count(), 2);
        // One delay for the card plus one class per revealed element.
        assert_eq!(recording.len(), 3);
    }

    #[test]
    fn observer_keeps_configured_options() {
        let host = Rc::new(VirtualHost::new());
        let recording = Rc::new(RecordingSurface::new());
        let reveal = mount(&host, &recording, &[ElementId(1)], &[]);
        let id = reveal.registration.unwrap();
        assert_eq!(host.observer_options(id).map(|o| o.root_margin_px), Some(-50));
    }

    #[test]
    fn empty_page_registers_nothing_and_drop_disconnects() {
        let host = Rc::new(VirtualHost::new());
        let recording = Rc::new(RecordingSurface::new());
        let empty = mount(&host, &recording, &[], &[]);
        assert!(!empty.is_active());

        let reveal = mount(&host, &recording, &[ElementId(1)], &[]);
        assert!(host.is_observed(ElementId(1)));
        drop(reveal);
        assert!(!host.is_observed(ElementId(1)));
    }
}
