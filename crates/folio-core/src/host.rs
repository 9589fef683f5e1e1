#![forbid(unsafe_code)]

//! Host capability traits.
//!
//! Folio never touches a real timer, refresh loop, or viewport directly. The
//! embedding environment provides them through the traits in this module:
//!
//! - [`Clock`]: monotonic time since an unspecified epoch.
//! - [`TimerHost`]: one-shot deferred callbacks (`setTimeout` / `clearTimeout`).
//! - [`FrameScheduler`]: next display-refresh callbacks (`requestAnimationFrame`).
//! - [`VisibilityObserver`]: viewport intersection reports with a ratio threshold.
//!
//! All capabilities are single-threaded. Methods take `&self` so that a
//! capability can be shared behind an `Rc` and called re-entrantly from inside
//! one of its own callbacks.
//!
//! [`VirtualHost`](crate::virtual_host::VirtualHost) implements every trait
//! deterministically for headless drivers and tests.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Deferred callback run by a [`TimerHost`].
pub type TimerCallback = Box<dyn FnOnce()>;

/// Callback run on the next display refresh, receiving the frame timestamp.
pub type FrameCallback = Box<dyn FnOnce(Duration)>;

/// Callback receiving visibility reports for observed elements.
///
/// Shared (`Rc`) because a single observer watches many elements and is
/// invoked once per report.
pub type VisibilityCallback = Rc<dyn Fn(&VisibilityEntry)>;

/// Opaque handle naming an element on the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Handle for a requested display-refresh callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

/// Handle for a visibility observer registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u64);

/// Observation parameters for a [`VisibilityObserver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Minimum visible ratio (0.0–1.0) for an entry to count as intersecting.
    pub threshold: f64,
    /// Vertical margin applied to the viewport, in pixels. Negative values
    /// shrink the region (`-50px 0px`).
    pub root_margin_px: i32,
}

impl ObserveOptions {
    /// Options with the given threshold and no root margin.
    #[must_use]
    pub const fn threshold(threshold: f64) -> Self {
        Self {
            threshold,
            root_margin_px: 0,
        }
    }

    /// Set the vertical root margin (builder pattern).
    #[must_use]
    pub const fn with_root_margin(mut self, px: i32) -> Self {
        self.root_margin_px = px;
        self
    }

    /// Whether a visible ratio satisfies these options.
    ///
    /// A ratio of zero never intersects, even with a zero threshold.
    #[must_use]
    pub fn accepts(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self::threshold(0.0)
    }
}

/// A single visibility report for one observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEntry {
    /// The element the report is about.
    pub element: ElementId,
    /// Visible fraction of the element (0.0–1.0).
    pub ratio: f64,
    /// Whether the ratio satisfied the observer's threshold.
    pub is_intersecting: bool,
}

/// Monotonic clock.
pub trait Clock {
    /// Elapsed time since an unspecified epoch, monotonically increasing.
    fn now(&self) -> Duration;
}

/// One-shot timer capability.
pub trait TimerHost {
    /// Run `callback` once after `delay`. A zero delay still defers the call.
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId;

    /// Cancel a pending timer. Unknown or already-fired ids are ignored.
    fn cancel(&self, id: TimerId);
}

/// Display-refresh capability.
pub trait FrameScheduler {
    /// Run `callback` on the next refresh. Callbacks re-arm themselves by
    /// requesting another frame.
    fn request_frame(&self, callback: FrameCallback) -> FrameId;

    /// Cancel a requested frame callback that has not run yet.
    fn cancel_frame(&self, id: FrameId);
}

/// Viewport intersection capability.
pub trait VisibilityObserver {
    /// Start watching `element`, delivering reports to `callback`.
    ///
    /// Each call registers a new observer; use [`observe_more`](Self::observe_more)
    /// to add elements to an existing one.
    fn observe(
        &self,
        element: ElementId,
        options: ObserveOptions,
        callback: VisibilityCallback,
    ) -> ObserverId;

    /// Add another element to an existing observer.
    fn observe_more(&self, observer: ObserverId, element: ElementId);

    /// Stop reporting `element` to `observer`.
    fn unobserve(&self, observer: ObserverId, element: ElementId);

    /// Drop the observer and all of its elements.
    fn disconnect(&self, observer: ObserverId);
}

/// Wall clock backed by [`web_time::Instant`], usable on native and wasm32.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: web_time::Instant,
}

impl SystemClock {
    /// Clock whose epoch is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: web_time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}
