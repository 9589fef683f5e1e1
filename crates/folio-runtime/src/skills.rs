#![forbid(unsafe_code)]

//! Staggered skill-bar fill.

use std::rc::Rc;
use std::time::Duration;

use folio_core::TimerHost;
use folio_core::host::TimerId;

use crate::layout::SkillBar;
use crate::surface::Surface;

/// Schedule each bar's width to its level, bar `i` after `i * stagger`.
///
/// Every bar goes through the timer queue, including the first one with a
/// zero delay. Returns the scheduled timers in bar order.
pub fn fill_skill_bars(
    timers: &Rc<dyn TimerHost>,
    surface: &Rc<dyn Surface>,
    bars: &[SkillBar],
    stagger: Duration,
) -> Vec<TimerId> {
    tracing::debug!(
        target: "folio.page",
        bars = bars.len(),
        stagger_ms = stagger.as_millis() as u64,
        "filling skill bars"
    );
    bars.iter()
        .enumerate()
        .map(|(index, bar)| {
            let surface = Rc::clone(surface);
            let bar = *bar;
            timers.schedule(
                stagger.saturating_mul(index as u32),
                Box::new(move || surface.set_width_percent(bar.element, bar.level)),
            )
        })
        .collect()
}
