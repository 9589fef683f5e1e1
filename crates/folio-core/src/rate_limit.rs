#![forbid(unsafe_code)]

//! Debounce and throttle wrappers over a [`TimerHost`].
//!
//! Both wrappers own a boxed action and a single piece of timer state:
//!
//! - [`Debounced`]: one pending timer. Every call supersedes the previous
//!   one, so the action runs once per quiescence window with the last
//!   arguments.
//! - [`Throttled`]: one cooldown flag. The first call in a window runs
//!   synchronously; calls during the cooldown are dropped, never queued.
//!
//! # Usage
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use std::time::Duration;
//! use folio_core::rate_limit::debounce;
//! use folio_core::virtual_host::VirtualHost;
//!
//! let host = Rc::new(VirtualHost::new());
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let search = debounce(host.clone(), Duration::from_millis(250), move |q: &'static str| {
//!     sink.borrow_mut().push(q);
//! });
//!
//! search.call("r");
//! host.advance(Duration::from_millis(10));
//! search.call("ru");
//! host.advance(Duration::from_millis(10));
//! search.call("rust");
//! host.advance(Duration::from_millis(250));
//!
//! assert_eq!(*seen.borrow(), vec!["rust"]);
//! ```
//!
//! # Lifetimes
//!
//! Scheduled timers hold only a weak reference to the wrapper. Dropping the
//! last handle cancels any pending debounce and any open cooldown.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::host::{TimerHost, TimerId};

type Action<A> = RefCell<Box<dyn FnMut(A)>>;

// ---------------------------------------------------------------------------
// Debounce
// ---------------------------------------------------------------------------

/// Wrap `action` so it runs only after `delay` without further calls.
pub fn debounce<A, F>(timers: Rc<dyn TimerHost>, delay: Duration, action: F) -> Debounced<A>
where
    A: 'static,
    F: FnMut(A) + 'static,
{
    Debounced {
        inner: Rc::new(DebounceInner {
            timers,
            delay,
            action: RefCell::new(Box::new(action)),
            pending: Cell::new(None),
            fired: Cell::new(0),
        }),
    }
}

/// A debounced action. Cloning yields another handle to the same state.
pub struct Debounced<A: 'static> {
    inner: Rc<DebounceInner<A>>,
}

struct DebounceInner<A> {
    timers: Rc<dyn TimerHost>,
    delay: Duration,
    action: Action<A>,
    pending: Cell<Option<TimerId>>,
    fired: Cell<u64>,
}

impl<A: 'static> Debounced<A> {
    /// Supersede any pending invocation and schedule `action(args)` after
    /// the quiescence delay.
    pub fn call(&self, args: A) {
        let inner = &self.inner;
        if let Some(previous) = inner.pending.take() {
            inner.timers.cancel(previous);
            tracing::trace!(
                target: "folio.rate_limit",
                timer_id = previous.0,
                "debounce superseded pending call"
            );
        }
        let weak = Rc::downgrade(inner);
        let id = inner.timers.schedule(
            inner.delay,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else { return };
                inner.pending.set(None);
                inner.fired.set(inner.fired.get() + 1);
                (inner.action.borrow_mut())(args);
            }),
        );
        inner.pending.set(Some(id));
    }

    /// Whether an invocation is scheduled and not yet run.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.pending.get().is_some()
    }

    /// Drop the pending invocation, if any, without running it.
    pub fn cancel(&self) {
        if let Some(id) = self.inner.pending.take() {
            self.inner.timers.cancel(id);
        }
    }

    /// Quiescence delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    /// Number of times the action has run.
    #[must_use]
    pub fn fired_count(&self) -> u64 {
        self.inner.fired.get()
    }
}

impl<A: 'static> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A: 'static> std::fmt::Debug for Debounced<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debounced")
            .field("delay", &self.inner.delay)
            .field("pending", &self.inner.pending.get())
            .field("fired", &self.inner.fired.get())
            .finish_non_exhaustive()
    }
}

impl<A> Drop for DebounceInner<A> {
    fn drop(&mut self) {
        if let Some(id) = self.pending.take() {
            self.timers.cancel(id);
        }
    }
}

// ---------------------------------------------------------------------------
// Throttle
// ---------------------------------------------------------------------------

/// Wrap `action` so it runs at most once per `interval`, leading edge only.
pub fn throttle<A, F>(timers: Rc<dyn TimerHost>, interval: Duration, action: F) -> Throttled<A>
where
    A: 'static,
    F: FnMut(A) + 'static,
{
    Throttled {
        inner: Rc::new(ThrottleInner {
            timers,
            interval,
            action: RefCell::new(Box::new(action)),
            cooldown: Cell::new(None),
            fired: Cell::new(0),
            dropped: Cell::new(0),
        }),
    }
}

/// A throttled action. Cloning yields another handle to the same state.
pub struct Throttled<A: 'static> {
    inner: Rc<ThrottleInner<A>>,
}

struct ThrottleInner<A> {
    timers: Rc<dyn TimerHost>,
    interval: Duration,
    action: Action<A>,
    /// Timer that ends the current cooldown; `Some` while cooling down.
    cooldown: Cell<Option<TimerId>>,
    fired: Cell<u64>,
    dropped: Cell<u64>,
}

impl<A: 'static> Throttled<A> {
    /// Run `action(args)` now unless a cooldown is open.
    ///
    /// Returns `true` if the action ran, `false` if the call was dropped.
    pub fn call(&self, args: A) -> bool {
        let inner = &self.inner;
        if inner.cooldown.get().is_some() {
            inner.dropped.set(inner.dropped.get() + 1);
            tracing::trace!(
                target: "folio.rate_limit",
                dropped = inner.dropped.get(),
                "throttle dropped call"
            );
            return false;
        }

        // Open the cooldown before running so a re-entrant call is dropped.
        let weak = Rc::downgrade(inner);
        let id = inner.timers.schedule(
            inner.interval,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.cooldown.set(None);
                }
            }),
        );
        inner.cooldown.set(Some(id));
        inner.fired.set(inner.fired.get() + 1);
        (inner.action.borrow_mut())(args);
        true
    }

    /// Whether calls are currently being dropped.
    #[must_use]
    pub fn is_cooling_down(&self) -> bool {
        self.inner.cooldown.get().is_some()
    }

    /// Cooldown interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Number of times the action has run.
    #[must_use]
    pub fn fired_count(&self) -> u64 {
        self.inner.fired.get()
    }

    /// Number of calls dropped during cooldowns.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.inner.dropped.get()
    }
}

impl<A: 'static> Clone for Throttled<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A: 'static> std::fmt::Debug for Throttled<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttled")
            .field("interval", &self.inner.interval)
            .field("cooling_down", &self.inner.cooldown.get().is_some())
            .field("fired", &self.inner.fired.get())
            .field("dropped", &self.inner.dropped.get())
            .finish_non_exhaustive()
    }
}

impl<A> Drop for ThrottleInner<A> {
    fn drop(&mut self) {
        if let Some(id) = self.cooldown.take() {
            self.timers.cancel(id);
        }
    }
}
