#![forbid(unsafe_code)]

//! Deterministic host driven explicitly by the embedder.
//!
//! [`VirtualHost`] implements every capability in [`crate::host`] without a
//! real clock or rendering surface:
//!
//! - **Time** only moves when [`advance`](VirtualHost::advance) is called.
//!   Due timers fire in deadline order; ties fire in scheduling order. The
//!   clock reads each timer's deadline while its callback runs.
//! - **Frames** only run on [`tick_frame`](VirtualHost::tick_frame). Frames
//!   requested during a tick wait for the next tick.
//! - **Visibility** is reported with
//!   [`report_visibility`](VirtualHost::report_visibility). Every report is
//!   delivered to every observer watching the element; the host does not
//!   deduplicate. Root margins are recorded but the reported ratio is taken
//!   as already margin-adjusted.
//!
//! Callbacks always run after the host's internal borrow is released, so a
//! callback may schedule, cancel, request frames, or unobserve re-entrantly.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//! use folio_core::host::TimerHost;
//! use folio_core::virtual_host::VirtualHost;
//!
//! let host = VirtualHost::new();
//! let hits = Rc::new(Cell::new(0));
//! let h = Rc::clone(&hits);
//! host.schedule(Duration::from_millis(10), Box::new(move || h.set(h.get() + 1)));
//!
//! host.advance(Duration::from_millis(9));
//! assert_eq!(hits.get(), 0);
//! host.advance(Duration::from_millis(1));
//! assert_eq!(hits.get(), 1);
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use crate::host::{
    Clock, ElementId, FrameCallback, FrameId, FrameScheduler, ObserveOptions, ObserverId,
    TimerCallback, TimerHost, TimerId, VisibilityCallback, VisibilityEntry, VisibilityObserver,
};

/// Deterministic implementation of all host capabilities.
#[derive(Default)]
pub struct VirtualHost {
    state: RefCell<HostState>,
}

#[derive(Default)]
struct HostState {
    now: Duration,
    next_id: u64,
    /// Pending timers keyed by (deadline, id) so iteration is firing order.
    timers: BTreeMap<(Duration, u64), TimerCallback>,
    deadlines: HashMap<u64, Duration>,
    frames: Vec<(FrameId, FrameCallback)>,
    /// Frames cancelled while a tick already holds them.
    cancelled_in_tick: HashSet<FrameId>,
    observers: Vec<ObserverRecord>,
    frame_count: u64,
}

struct ObserverRecord {
    id: ObserverId,
    options: ObserveOptions,
    callback: VisibilityCallback,
    elements: Vec<ElementId>,
}

impl HostState {
    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl std::fmt::Debug for VirtualHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("VirtualHost")
            .field("now", &state.now)
            .field("pending_timers", &state.timers.len())
            .field("pending_frames", &state.frames.len())
            .field("observers", &state.observers.len())
            .finish()
    }
}

impl VirtualHost {
    /// Create a host with the clock at `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `dt`, firing every timer that comes due.
    ///
    /// Returns the number of timers fired. Timers scheduled by a firing
    /// callback also fire if their deadline falls within the window.
    pub fn advance(&self, dt: Duration) -> usize {
        let target = self.state.borrow().now.saturating_add(dt);
        self.advance_to(target)
    }

    /// Advance the clock to the absolute time `target`.
    ///
    /// A `target` in the past leaves the clock unchanged.
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut fired = 0;
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let due = state
                    .timers
                    .keys()
                    .next()
                    .copied()
                    .filter(|(deadline, _)| *deadline <= target);
                due.and_then(|key| {
                    let callback = state.timers.remove(&key)?;
                    state.deadlines.remove(&key.1);
                    if key.0 > state.now {
                        state.now = key.0;
                    }
                    Some((key.1, callback))
                })
            };
            let Some((id, callback)) = next else { break };
            tracing::trace!(target: "folio.host", timer_id = id, "timer fired");
            callback();
            fired += 1;
        }
        let mut state = self.state.borrow_mut();
        if target > state.now {
            state.now = target;
        }
        fired
    }

    /// Run every frame callback requested before this call.
    ///
    /// Returns the number of callbacks run.
    pub fn tick_frame(&self) -> usize {
        let (frames, now) = {
            let mut state = self.state.borrow_mut();
            state.frame_count += 1;
            (std::mem::take(&mut state.frames), state.now)
        };
        let mut ran = 0;
        for (id, callback) in frames {
            if self.state.borrow_mut().cancelled_in_tick.remove(&id) {
                continue;
            }
            callback(now);
            ran += 1;
        }
        self.state.borrow_mut().cancelled_in_tick.clear();
        ran
    }

    /// Tick frames until no callback is pending or `max_ticks` is reached.
    ///
    /// Returns the number of ticks performed.
    pub fn run_frames(&self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && self.pending_frames() > 0 {
            self.tick_frame();
            ticks += 1;
        }
        ticks
    }

    /// Report that `element` is now `ratio` visible.
    ///
    /// Returns the number of observers notified.
    pub fn report_visibility(&self, element: ElementId, ratio: f64) -> usize {
        let deliveries: Vec<(VisibilityCallback, VisibilityEntry)> = {
            let state = self.state.borrow();
            state
                .observers
                .iter()
                .filter(|o| o.elements.contains(&element))
                .map(|o| {
                    let entry = VisibilityEntry {
                        element,
                        ratio,
                        is_intersecting: o.options.accepts(ratio),
                    };
                    (o.callback.clone(), entry)
                })
                .collect()
        };
        tracing::trace!(
            target: "folio.host",
            element = element.0,
            ratio,
            observers = deliveries.len(),
            "visibility reported"
        );
        for (callback, entry) in &deliveries {
            callback(entry);
        }
        deliveries.len()
    }

    /// Number of timers waiting to fire.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Number of frame callbacks waiting for the next tick.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    /// Total frame ticks performed so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.state.borrow().frame_count
    }

    /// Whether any observer currently watches `element`.
    #[must_use]
    pub fn is_observed(&self, element: ElementId) -> bool {
        self.state
            .borrow()
            .observers
            .iter()
            .any(|o| o.elements.contains(&element))
    }

    /// Options an observer was registered with, if it is still connected.
    #[must_use]
    pub fn observer_options(&self, observer: ObserverId) -> Option<ObserveOptions> {
        self.state
            .borrow()
            .observers
            .iter()
            .find(|o| o.id == observer)
            .map(|o| o.options)
    }
}

impl Clock for VirtualHost {
    fn now(&self) -> Duration {
        self.state.borrow().now
    }
}

impl TimerHost for VirtualHost {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let mut state = self.state.borrow_mut();
        let id = state.alloc_id();
        let deadline = state.now.saturating_add(delay);
        state.timers.insert((deadline, id), callback);
        state.deadlines.insert(id, deadline);
        TimerId(id)
    }

    fn cancel(&self, id: TimerId) {
        let mut state = self.state.borrow_mut();
        if let Some(deadline) = state.deadlines.remove(&id.0) {
            state.timers.remove(&(deadline, id.0));
        }
    }
}

impl FrameScheduler for VirtualHost {
    fn request_frame(&self, callback: FrameCallback) -> FrameId {
        let mut state = self.state.borrow_mut();
        let id = FrameId(state.alloc_id());
        state.frames.push((id, callback));
        id
    }

    fn cancel_frame(&self, id: FrameId) {
        let mut state = self.state.borrow_mut();
        let before = state.frames.len();
        state.frames.retain(|(fid, _)| *fid != id);
        if state.frames.len() == before {
            state.cancelled_in_tick.insert(id);
        }
    }
}

impl VisibilityObserver for VirtualHost {
    fn observe(
        &self,
        element: ElementId,
        options: ObserveOptions,
        callback: VisibilityCallback,
    ) -> ObserverId {
        let mut state = self.state.borrow_mut();
        let id = ObserverId(state.alloc_id());
        state.observers.push(ObserverRecord {
            id,
            options,
            callback,
            elements: vec![element],
        });
        id
    }

    fn observe_more(&self, observer: ObserverId, element: ElementId) {
        let mut state = self.state.borrow_mut();
        if let Some(record) = state.observers.iter_mut().find(|o| o.id == observer) {
            if !record.elements.contains(&element) {
                record.elements.push(element);
            }
        }
    }

    fn unobserve(&self, observer: ObserverId, element: ElementId) {
        let mut state = self.state.borrow_mut();
        if let Some(record) = state.observers.iter_mut().find(|o| o.id == observer) {
            record.elements.retain(|e| *e != element);
        }
    }

    fn disconnect(&self, observer: ObserverId) {
        self.state
            .borrow_mut()
            .observers
            .retain(|o| o.id != observer);
    }
}
