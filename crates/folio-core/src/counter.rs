#![forbid(unsafe_code)]

//! Numeric counter animation.
//!
//! [`CounterAnimation`] is a pure stepper: each [`step`](CounterAnimation::step)
//! adds `target / steps` to a running value and yields the integer to
//! display. [`animate_counter`] drives a stepper from a [`FrameScheduler`],
//! one step per display refresh.
//!
//! # Invariants
//!
//! 1. Displayed values are monotonically non-decreasing.
//! 2. No displayed value exceeds the target.
//! 3. The final frame displays exactly the target, then the stepper is done.
//! 4. A target ≤ 0 is displayed on the first frame, which is final.
//!
//! The number of frames is about `steps`, so the wall-clock duration follows
//! the host's refresh rate.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::host::{FrameId, FrameScheduler};

/// Default number of increments from zero to the target.
pub const DEFAULT_COUNTER_STEPS: u32 = 100;

/// One displayed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterFrame {
    /// Integer to display.
    pub value: i64,
    /// Whether this is the last frame.
    pub is_final: bool,
}

/// Stepper counting from zero up to a target.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    target: i64,
    increment: f64,
    current: f64,
    done: bool,
}

impl CounterAnimation {
    /// Counter with [`DEFAULT_COUNTER_STEPS`] increments.
    #[must_use]
    pub fn new(target: i64) -> Self {
        Self::with_steps(target, DEFAULT_COUNTER_STEPS)
    }

    /// Counter reaching `target` in about `steps` increments.
    ///
    /// Zero steps is treated as one.
    #[must_use]
    pub fn with_steps(target: i64, steps: u32) -> Self {
        Self {
            target,
            increment: target as f64 / f64::from(steps.max(1)),
            current: 0.0,
            done: false,
        }
    }

    /// Target value.
    #[must_use]
    pub fn target(&self) -> i64 {
        self.target
    }

    /// Whether the final frame has been produced.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advance one increment. Returns `None` once the final frame was produced.
    pub fn step(&mut self) -> Option<CounterFrame> {
        if self.done {
            return None;
        }
        let target = self.target as f64;
        if self.current < target {
            self.current += self.increment;
        }
        if self.current >= target {
            self.done = true;
            return Some(CounterFrame {
                value: self.target,
                is_final: true,
            });
        }
        // Float drift can put ceil() one past the target.
        let shown = (self.current.ceil() as i64).min(self.target);
        Some(CounterFrame {
            value: shown,
            is_final: false,
        })
    }
}

impl Iterator for CounterAnimation {
    type Item = CounterFrame;

    fn next(&mut self) -> Option<CounterFrame> {
        self.step()
    }
}

/// Handle to a counter running on a [`FrameScheduler`].
#[derive(Clone)]
pub struct CounterRun {
    inner: Rc<RunInner>,
}

struct RunInner {
    frames: Rc<dyn FrameScheduler>,
    animation: RefCell<CounterAnimation>,
    on_display: RefCell<Box<dyn FnMut(i64)>>,
    displayed: Cell<Option<i64>>,
    pending: Cell<Option<FrameId>>,
    cancelled: Cell<bool>,
    frames_run: Cell<u32>,
}

/// Start animating a counter to `target`, calling `on_display` once per frame.
///
/// The first step runs on the next refresh, not synchronously.
pub fn animate_counter(
    frames: Rc<dyn FrameScheduler>,
    target: i64,
    steps: u32,
    on_display: impl FnMut(i64) + 'static,
) -> CounterRun {
    let inner = Rc::new(RunInner {
        frames,
        animation: RefCell::new(CounterAnimation::with_steps(target, steps)),
        on_display: RefCell::new(Box::new(on_display)),
        displayed: Cell::new(None),
        pending: Cell::new(None),
        cancelled: Cell::new(false),
        frames_run: Cell::new(0),
    });
    tracing::trace!(
        target: "folio.counter",
        counter_target = target,
        steps,
        "counter animation started"
    );
    RunInner::arm(&inner);
    CounterRun { inner }
}

impl RunInner {
    fn arm(this: &Rc<Self>) {
        let next = Rc::clone(this);
        let id = this.frames.request_frame(Box::new(move |_ts: Duration| next.on_frame()));
        this.pending.set(Some(id));
    }

    fn on_frame(self: Rc<Self>) {
        self.pending.set(None);
        if self.cancelled.get() {
            return;
        }
        let frame = self.animation.borrow_mut().step();
        let Some(frame) = frame else { return };
        self.frames_run.set(self.frames_run.get() + 1);
        self.displayed.set(Some(frame.value));
        (self.on_display.borrow_mut())(frame.value);
        if frame.is_final {
            tracing::trace!(
                target: "folio.counter",
                value = frame.value,
                frames = self.frames_run.get(),
                "counter animation finished"
            );
        } else if !self.cancelled.get() {
            Self::arm(&self);
        }
    }
}

impl CounterRun {
    /// Last displayed value, if any frame has run.
    #[must_use]
    pub fn displayed(&self) -> Option<i64> {
        self.inner.displayed.get()
    }

    /// Whether the final frame has been displayed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.animation.borrow().is_done()
    }

    /// Frames run so far.
    #[must_use]
    pub fn frames_run(&self) -> u32 {
        self.inner.frames_run.get()
    }

    /// Stop the animation where it is. The displayed value is left unchanged.
    ///
    /// Safe to call from inside the display callback.
    pub fn cancel(&self) {
        self.inner.cancelled.set(true);
        if let Some(id) = self.inner.pending.take() {
            self.inner.frames.cancel_frame(id);
        }
    }
}

impl std::fmt::Debug for CounterRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterRun")
            .field("target", &self.inner.animation.borrow().target())
            .field("displayed", &self.inner.displayed.get())
            .field("frames_run", &self.inner.frames_run.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_host::VirtualHost;

    fn values(target: i64, steps: u32) -> Vec<i64> {
        CounterAnimation::with_steps(target, steps)
            .map(|f| f.value)
            .collect()
    }

    #[test]
    fn target_fifty_ends_exactly_at_fifty() {
        let shown = values(50, 100);
        assert_eq!(shown.last(), Some(&50));
        assert!(shown.windows(2).all(|w| w[0] <= w[1]));
        assert!(shown.iter().all(|v| *v <= 50));
    }

    #[test]
    fn first_frame_rounds_up() {
        let mut anim = CounterAnimation::new(50);
        assert_eq!(
            anim.step(),
            Some(CounterFrame {
                value: 1,
                is_final: false
            })
        );
    }

    #[test]
    fn frame_count_is_about_steps() {
        let n = values(1234, 100).len();
        assert!((100..=101).contains(&n), "got {n} frames");
    }

    #[test]
    fn float_drift_never_overshoots() {
        for target in [7, 13, 99, 101, 333, 1001] {
            let shown = values(target, 100);
            assert!(shown.iter().all(|v| *v <= target), "target {target}: {shown:?}");
            assert_eq!(shown.last(), Some(&target));
        }
    }

    #[test]
    fn non_positive_target_is_immediately_final() {
        for target in [0, -5] {
            let mut anim = CounterAnimation::new(target);
            assert_eq!(
                anim.step(),
                Some(CounterFrame {
                    value: target,
                    is_final: true
                })
            );
            assert_eq!(anim.step(), None);
        }
    }

    #[test]
    fn zero_steps_is_one_step() {
        assert_eq!(values(10, 0), vec![10]);
    }

    #[test]
    fn animate_counter_runs_one_step_per_frame() {
        let host = Rc::new(VirtualHost::new());
        let shown = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&shown);
        let run = animate_counter(host.clone(), 50, 100, move |v| sink.borrow_mut().push(v));

        assert_eq!(run.displayed(), None);
        host.tick_frame();
        assert_eq!(run.displayed(), Some(1));
        let ticks = host.run_frames(1000);
        assert!(run.is_finished());
        assert_eq!(run.displayed(), Some(50));
        assert_eq!(shown.borrow().len() as u32, run.frames_run());
        assert_eq!(ticks as u32 + 1, run.frames_run());
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn cancel_stops_rearming() {
        let host = Rc::new(VirtualHost::new());
        let run = animate_counter(host.clone(), 500, 100, |_| {});
        host.tick_frame();
        host.tick_frame();
        run.cancel();
        assert_eq!(host.run_frames(1000), 0);
        assert_eq!(run.displayed(), Some(10));
        assert!(!run.is_finished());
    }

    #[test]
    fn cancel_from_display_stops_run() {
        let host = Rc::new(VirtualHost::new());
        let slot: Rc<RefCell<Option<CounterRun>>> = Rc::new(RefCell::new(None));
        let handle = Rc::clone(&slot);
        let run = animate_counter(host.clone(), 500, 100, move |v| {
            if v >= 10 {
                if let Some(run) = handle.borrow().as_ref() {
                    run.cancel();
                }
            }
        });
        *slot.borrow_mut() = Some(run.clone());

        let ticks = host.run_frames(1000);
        assert_eq!(ticks, 2);
        assert_eq!(run.frames_run(), 2);
        assert_eq!(run.displayed(), Some(10));
        assert!(!run.is_finished());
        assert_eq!(host.pending_frames(), 0);
        slot.borrow_mut().take();
    }

    #[test]
    fn cancel_before_first_frame_shows_nothing() {
        let host = Rc::new(VirtualHost::new());
        let run = animate_counter(host.clone(), 50, 100, |_| {});
        run.cancel();
        host.run_frames(1000);
        assert_eq!(run.displayed(), None);
        assert_eq!(run.frames_run(), 0);
    }
}
