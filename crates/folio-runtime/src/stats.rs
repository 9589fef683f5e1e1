#![forbid(unsafe_code)]

//! Stat counters counting up on display refresh.

use std::rc::Rc;

use folio_core::{CounterRun, FrameScheduler, animate_counter};

use crate::layout::StatCounter;
use crate::surface::Surface;

/// Start one counter animation per stat, writing each frame as text.
pub fn start_stat_counters(
    frames: &Rc<dyn FrameScheduler>,
    surface: &Rc<dyn Surface>,
    counters: &[StatCounter],
    steps: u32,
) -> Vec<CounterRun> {
    tracing::debug!(
        target: "folio.page",
        counters = counters.len(),
        steps,
        "starting stat counters"
    );
    counters
        .iter()
        .map(|counter| {
            let surface = Rc::clone(surface);
            let element = counter.element;
            animate_counter(Rc::clone(frames), counter.target, steps, move |value| {
                surface.set_text(element, &value.to_string());
            })
        })
        .collect()
}
