#![forbid(unsafe_code)]

//! One-shot visibility trigger.
//!
//! A [`OneShotTrigger`] runs an action exactly once, the first time its
//! target element is reported visible at or above a ratio threshold. It then
//! drops its observer registration and ignores every later report.
//!
//! # State machine
//!
//! ```text
//!   Idle ──(qualifying report)──▶ Fired
//!    │                              │
//!    └─(non-qualifying: stay)       └─(any report: ignored)
//! ```
//!
//! # Invariants
//!
//! 1. `state()` moves `Idle -> Fired` at most once and never back.
//! 2. The action runs exactly once per fired trigger (it is `FnOnce`).
//! 3. After firing, the trigger holds no observer registration.
//! 4. Instances never share state; two triggers on the same element fire
//!    independently.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::host::{ElementId, ObserveOptions, ObserverId, VisibilityEntry, VisibilityObserver};

/// Trigger lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerState {
    /// Waiting for the first qualifying report.
    #[default]
    Idle,
    /// The action has run. Terminal.
    Fired,
}

/// Runs an action once when a watched element first becomes visible.
///
/// Cloning yields another handle to the same trigger.
#[derive(Clone)]
pub struct OneShotTrigger {
    inner: Rc<TriggerInner>,
}

struct TriggerInner {
    target: ElementId,
    options: ObserveOptions,
    state: Cell<TriggerState>,
    action: RefCell<Option<Box<dyn FnOnce()>>>,
    observer: Option<Rc<dyn VisibilityObserver>>,
    registration: Cell<Option<ObserverId>>,
}

impl OneShotTrigger {
    /// Create a detached trigger. Reports are delivered with [`notify`](Self::notify).
    pub fn new(
        target: ElementId,
        options: ObserveOptions,
        action: impl FnOnce() + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(TriggerInner {
                target,
                options,
                state: Cell::new(TriggerState::Idle),
                action: RefCell::new(Some(Box::new(action))),
                observer: None,
                registration: Cell::new(None),
            }),
        }
    }

    /// Create a trigger subscribed to `observer` for `target`.
    pub fn watch(
        observer: Rc<dyn VisibilityObserver>,
        target: ElementId,
        options: ObserveOptions,
        action: impl FnOnce() + 'static,
    ) -> Self {
        let inner = Rc::new(TriggerInner {
            target,
            options,
            state: Cell::new(TriggerState::Idle),
            action: RefCell::new(Some(Box::new(action))),
            observer: Some(Rc::clone(&observer)),
            registration: Cell::new(None),
        });
        let weak: Weak<TriggerInner> = Rc::downgrade(&inner);
        let id = observer.observe(
            target,
            options,
            Rc::new(move |entry: &VisibilityEntry| {
                if let Some(inner) = weak.upgrade() {
                    inner.notify(entry);
                }
            }),
        );
        inner.registration.set(Some(id));
        tracing::debug!(
            target: "folio.trigger",
            element = target.0,
            threshold = options.threshold,
            "one-shot trigger armed"
        );
        Self { inner }
    }

    /// Deliver a visibility report.
    ///
    /// Returns `true` if this report fired the trigger.
    pub fn notify(&self, entry: &VisibilityEntry) -> bool {
        self.inner.notify(entry)
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TriggerState {
        self.inner.state.get()
    }

    /// Whether the action has run.
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.state() == TriggerState::Fired
    }

    /// The watched element.
    #[must_use]
    pub fn target(&self) -> ElementId {
        self.inner.target
    }

    /// Whether the trigger still holds an observer registration.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.inner.registration.get().is_some()
    }
}

impl std::fmt::Debug for OneShotTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneShotTrigger")
            .field("target", &self.inner.target)
            .field("options", &self.inner.options)
            .field("state", &self.inner.state.get())
            .field("subscribed", &self.inner.registration.get().is_some())
            .finish()
    }
}

impl TriggerInner {
    fn notify(&self, entry: &VisibilityEntry) -> bool {
        if self.state.get() == TriggerState::Fired {
            return false;
        }
        if entry.element != self.target
            || !entry.is_intersecting
            || !self.options.accepts(entry.ratio)
        {
            return false;
        }

        self.state.set(TriggerState::Fired);
        tracing::debug!(
            target: "folio.trigger",
            element = self.target.0,
            ratio = entry.ratio,
            "one-shot trigger fired"
        );
        let action = self.action.borrow_mut().take();
        if let Some(action) = action {
            action();
        }
        self.release();
        true
    }

    fn release(&self) {
        if let (Some(observer), Some(id)) = (&self.observer, self.registration.take()) {
            observer.disconnect(id);
        }
    }
}

impl Drop for TriggerInner {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_host::VirtualHost;

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        (hits, move || h.set(h.get() + 1))
    }

    fn entry(element: u32, ratio: f64) -> VisibilityEntry {
        VisibilityEntry {
            element: ElementId(element),
            ratio,
            is_intersecting: ratio > 0.0,
        }
    }

    #[test]
    fn starts_idle() {
        let (_, action) = counter();
        let t = OneShotTrigger::new(ElementId(1), ObserveOptions::threshold(0.5), action);
        assert_eq!(t.state(), TriggerState::Idle);
        assert!(!t.has_fired());
        assert_eq!(t.target(), ElementId(1));
    }

    #[test]
    fn two_qualifying_reports_fire_once() {
        let (hits, action) = counter();
        let t = OneShotTrigger::new(ElementId(1), ObserveOptions::threshold(0.5), action);
        assert!(t.notify(&entry(1, 0.8)));
        assert!(!t.notify(&entry(1, 0.9)));
        assert_eq!(hits.get(), 1);
        assert_eq!(t.state(), TriggerState::Fired);
    }

    #[test]
    fn below_threshold_and_other_elements_are_ignored() {
        let (hits, action) = counter();
        let t = OneShotTrigger::new(ElementId(1), ObserveOptions::threshold(0.5), action);
        assert!(!t.notify(&entry(1, 0.49)));
        assert!(!t.notify(&entry(2, 1.0)));
        assert!(!t.notify(&VisibilityEntry {
            element: ElementId(1),
            ratio: 0.9,
            is_intersecting: false,
        }));
        assert_eq!(hits.get(), 0);
        assert_eq!(t.state(), TriggerState::Idle);
    }

    #[test]
    fn watched_trigger_fires_and_unsubscribes() {
        let host = Rc::new(VirtualHost::new());
        let (hits, action) = counter();
        let t = OneShotTrigger::watch(
            host.clone(),
            ElementId(3),
            ObserveOptions::threshold(0.3),
            action,
        );
        assert!(t.is_subscribed());
        assert_eq!(host.report_visibility(ElementId(3), 0.1), 1);
        assert!(!t.has_fired());
        host.report_visibility(ElementId(3), 0.4);
        assert!(t.has_fired());
        assert!(!t.is_subscribed());
        assert!(!host.is_observed(ElementId(3)));
        assert_eq!(host.report_visibility(ElementId(3), 1.0), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn instances_have_independent_state() {
        let host = Rc::new(VirtualHost::new());
        let (a_hits, a) = counter();
        let (b_hits, b) = counter();
        let ta = OneShotTrigger::watch(host.clone(), ElementId(1), ObserveOptions::threshold(0.3), a);
        let tb = OneShotTrigger::watch(host.clone(), ElementId(1), ObserveOptions::threshold(0.5), b);
        host.report_visibility(ElementId(1), 0.4);
        assert!(ta.has_fired());
        assert!(!tb.has_fired());
        host.report_visibility(ElementId(1), 0.6);
        assert!(tb.has_fired());
        assert_eq!((a_hits.get(), b_hits.get()), (1, 1));
    }

    #[test]
    fn dropping_idle_trigger_disconnects() {
        let host = Rc::new(VirtualHost::new());
        let (hits, action) = counter();
        let t = OneShotTrigger::watch(host.clone(), ElementId(9), ObserveOptions::default(), action);
        drop(t);
        assert!(!host.is_observed(ElementId(9)));
        host.report_visibility(ElementId(9), 1.0);
        assert_eq!(hits.get(), 0);
    }
}
