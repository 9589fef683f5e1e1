#![forbid(unsafe_code)]

//! Mounted page: every behavior wired to the host capabilities.
//!
//! [`Page::mount`] performs the page-load wiring once:
//!
//! 1. `loaded` on the body.
//! 2. A one-shot trigger on the skills section that fills the skill bars.
//! 3. A one-shot trigger on the about section that starts the stat counters.
//! 4. The section/card reveal observer.
//! 5. Header scroll state and the debounced resize hook.
//!
//! Missing layout elements skip their step silently. The host then forwards
//! scroll and resize events with [`Page::on_scroll`] and [`Page::on_resize`];
//! visibility, timers and frames reach the page through the capabilities.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use std::time::Duration;
//! use folio_core::{ElementId, PageConfig, VirtualHost};
//! use folio_runtime::{Page, PageHost, PageLayout, RecordingSurface, StatCounter};
//!
//! let host = Rc::new(VirtualHost::new());
//! let surface = Rc::new(RecordingSurface::new());
//! let about = ElementId(1);
//! let years = ElementId(2);
//! let layout = PageLayout::new().about(about, [StatCounter::new(years, 5)]);
//!
//! let page = Page::mount(&PageHost::from_virtual(&host), surface.clone(), layout, PageConfig::default());
//! host.report_visibility(about, 0.6);
//! host.run_frames(1_000);
//!
//! assert!(page.counters_fired());
//! assert_eq!(surface.text_of(years).as_deref(), Some("5"));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::{
    CounterRun, Debounced, FrameScheduler, OneShotTrigger, PageConfig, TimerHost, TriggerState,
    VirtualHost, VisibilityObserver, debounce,
};

use crate::header::HeaderState;
use crate::layout::PageLayout;
use crate::reveal::SectionReveal;
use crate::skills::fill_skill_bars;
use crate::stats::start_stat_counters;
use crate::surface::{CLASS_LOADED, Surface};

type ResizeHook = Box<dyn FnMut(u32, u32)>;

/// Capabilities the page runs on.
#[derive(Clone)]
pub struct PageHost {
    /// Timers for skill-bar stagger and the resize debounce.
    pub timers: Rc<dyn TimerHost>,
    /// Display refresh for the stat counters.
    pub frames: Rc<dyn FrameScheduler>,
    /// Viewport intersection for triggers and reveal.
    pub observer: Rc<dyn VisibilityObserver>,
}

impl PageHost {
    /// Use one [`VirtualHost`] for every capability.
    #[must_use]
    pub fn from_virtual(host: &Rc<VirtualHost>) -> Self {
        Self {
            timers: host.clone(),
            frames: host.clone(),
            observer: host.clone(),
        }
    }
}

impl std::fmt::Debug for PageHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageHost").finish_non_exhaustive()
    }
}

/// A mounted portfolio page.
pub struct Page {
    config: PageConfig,
    skills: Option<OneShotTrigger>,
    counters: Option<OneShotTrigger>,
    counter_runs: Rc<RefCell<Vec<CounterRun>>>,
    reveal: SectionReveal,
    header: Option<HeaderState>,
    resize: Debounced<(u32, u32)>,
    resize_hook: Rc<RefCell<Option<ResizeHook>>>,
}

impl Page {
    /// Wire every behavior described by `layout`.
    pub fn mount(
        host: &PageHost,
        surface: Rc<dyn Surface>,
        layout: PageLayout,
        config: PageConfig,
    ) -> Self {
        let PageLayout {
            body,
            header,
            skills_section,
            skill_bars,
            about_section,
            stat_counters,
            sections,
            hobby_cards,
        } = layout;

        let skills = skills_section.map(|section| {
            let timers = Rc::clone(&host.timers);
            let surface = Rc::clone(&surface);
            let stagger = config.skill_stagger();
            OneShotTrigger::watch(
                Rc::clone(&host.observer),
                section,
                config.skills_observe(),
                move || {
                    fill_skill_bars(&timers, &surface, &skill_bars, stagger);
                },
            )
        });

        let counter_runs = Rc::new(RefCell::new(Vec::new()));
        let counters = about_section.map(|section| {
            let frames = Rc::clone(&host.frames);
            let surface = Rc::clone(&surface);
            let runs = Rc::clone(&counter_runs);
            let steps = config.counters.steps;
            OneShotTrigger::watch(
                Rc::clone(&host.observer),
                section,
                config.counters_observe(),
                move || {
                    let started = start_stat_counters(&frames, &surface, &stat_counters, steps);
                    runs.borrow_mut().extend(started);
                },
            )
        });

        let reveal = SectionReveal::mount(
            Rc::clone(&host.observer),
            Rc::clone(&surface),
            &sections,
            &hobby_cards,
            config.reveal_observe(),
            config.card_stagger(),
        );

        let header = header.map(|element| {
            HeaderState::new(element, config.header.scroll_threshold_px, Rc::clone(&surface))
        });

        let resize_hook: Rc<RefCell<Option<ResizeHook>>> = Rc::new(RefCell::new(None));
        let hook = Rc::clone(&resize_hook);
        let resize = debounce(
            Rc::clone(&host.timers),
            config.resize_debounce(),
            move |(width, height): (u32, u32)| {
                tracing::debug!(target: "folio.page", width, height, "resize settled");
                if let Some(hook) = hook.borrow_mut().as_mut() {
                    hook(width, height);
                }
            },
        );

        if let Some(body) = body {
            surface.add_class(body, CLASS_LOADED);
        }

        tracing::debug!(
            target: "folio.page",
            skills = skills.is_some(),
            counters = counters.is_some(),
            header = header.is_some(),
            reveal = reveal.is_active(),
            "page mounted"
        );

        Self {
            config,
            skills,
            counters,
            counter_runs,
            reveal,
            header,
            resize,
            resize_hook,
        }
    }

    /// Forward a scroll offset from the host.
    pub fn on_scroll(&self, offset_px: f64) {
        if let Some(header) = &self.header {
            header.update(offset_px);
        }
    }

    /// Forward a viewport resize from the host. The hook runs once the
    /// resizes settle.
    pub fn on_resize(&self, width: u32, height: u32) {
        self.resize.call((width, height));
    }

    /// Install the hook run after resizes settle, replacing any previous one.
    pub fn set_resize_hook(&self, hook: impl FnMut(u32, u32) + 'static) {
        *self.resize_hook.borrow_mut() = Some(Box::new(hook));
    }

    /// State of the skill-bar trigger, if the page has a skills section.
    #[must_use]
    pub fn skills_state(&self) -> Option<TriggerState> {
        self.skills.as_ref().map(OneShotTrigger::state)
    }

    /// State of the stat-counter trigger, if the page has an about section.
    #[must_use]
    pub fn counters_state(&self) -> Option<TriggerState> {
        self.counters.as_ref().map(OneShotTrigger::state)
    }

    /// Whether the skill bars have started filling.
    #[must_use]
    pub fn skills_fired(&self) -> bool {
        self.skills_state() == Some(TriggerState::Fired)
    }

    /// Whether the stat counters have started.
    #[must_use]
    pub fn counters_fired(&self) -> bool {
        self.counters_state() == Some(TriggerState::Fired)
    }

    /// Counter animations started so far.
    #[must_use]
    pub fn counter_runs(&self) -> Vec<CounterRun> {
        self.counter_runs.borrow().clone()
    }

    /// Whether the header is in its scrolled state.
    #[must_use]
    pub fn header_scrolled(&self) -> bool {
        self.header.as_ref().is_some_and(HeaderState::is_scrolled)
    }

    /// Section reveal observer.
    #[must_use]
    pub fn reveal(&self) -> &SectionReveal {
        &self.reveal
    }

    /// Whether a resize is waiting to settle.
    #[must_use]
    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// Configuration the page was mounted with.
    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("skills", &self.skills_state())
            .field("counters", &self.counters_state())
            .field("reveal", &self.reveal)
            .field("header", &self.header)
            .field("resize", &self.resize)
            .finish_non_exhaustive()
    }
}
