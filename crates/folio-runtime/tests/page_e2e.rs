#![forbid(unsafe_code)]

//! End-to-end page scenarios on the virtual host.
//!
//! Each test mounts a full page layout, drives the host the way a browser
//! would (scrolling sections into view, ticking frames, advancing time), and
//! checks the exact mutation stream the surface receives.

use std::rc::Rc;
use std::time::Duration;

use folio_core::{ElementId, PageConfig, TriggerState, VirtualHost};
use folio_runtime::{
    CLASS_LOADED, CLASS_SCROLLED, CLASS_VISIBLE, Mutation, Page, PageHost, PageLayout,
    RecordingSurface, SkillBar, StatCounter,
};
use pretty_assertions::assert_eq;

const BODY: ElementId = ElementId(1);
const HEADER: ElementId = ElementId(2);
const SKILLS: ElementId = ElementId(3);
const BAR_RUST: ElementId = ElementId(4);
const BAR_GO: ElementId = ElementId(5);
const ABOUT: ElementId = ElementId(6);
const STAT_YEARS: ElementId = ElementId(7);
const STAT_PROJECTS: ElementId = ElementId(8);
const CONTACT: ElementId = ElementId(9);
const CARD_A: ElementId = ElementId(10);
const CARD_B: ElementId = ElementId(11);

const MS: Duration = Duration::from_millis(1);

fn portfolio() -> PageLayout {
    PageLayout::new()
        .body(BODY)
        .header(HEADER)
        .skills(
            SKILLS,
            [SkillBar::new(BAR_RUST, 90), SkillBar::new(BAR_GO, 75)],
        )
        .about(
            ABOUT,
            [
                StatCounter::new(STAT_YEARS, 50),
                StatCounter::new(STAT_PROJECTS, 120),
            ],
        )
        .sections([SKILLS, ABOUT, CONTACT])
        .hobby_cards([CARD_A, CARD_B])
}

fn mount(config: PageConfig) -> (Rc<VirtualHost>, Rc<RecordingSurface>, Page) {
    let host = Rc::new(VirtualHost::new());
    let surface = Rc::new(RecordingSurface::new());
    let page = Page::mount(
        &PageHost::from_virtual(&host),
        surface.clone(),
        portfolio(),
        config,
    );
    (host, surface, page)
}

fn add(element: ElementId, class: &str) -> Mutation {
    Mutation::AddClass {
        element,
        class: class.to_string(),
    }
}

fn width(element: ElementId, percent: u8) -> Mutation {
    Mutation::Width { element, percent }
}

#[test]
fn mount_staggers_cards_and_marks_body_loaded() {
    let (_host, surface, page) = mount(PageConfig::default());
    assert_eq!(
        surface.drain(),
        vec![
            Mutation::TransitionDelay {
                element: CARD_A,
                delay: Duration::ZERO
            },
            Mutation::TransitionDelay {
                element: CARD_B,
                delay: MS * 100
            },
            add(BODY, CLASS_LOADED),
        ]
    );
    assert_eq!(page.skills_state(), Some(TriggerState::Idle));
    assert_eq!(page.counters_state(), Some(TriggerState::Idle));
}

#[test]
fn scrolling_through_the_page() {
    let (host, surface, page) = mount(PageConfig::default());
    surface.drain();

    // Skills section enters the viewport: revealed now, bars fill on timers.
    host.report_visibility(SKILLS, 0.35);
    assert!(page.skills_fired());
    assert_eq!(surface.drain(), vec![add(SKILLS, CLASS_VISIBLE)]);
    host.advance(Duration::ZERO);
    assert_eq!(surface.drain(), vec![width(BAR_RUST, 90)]);
    host.advance(MS * 200);
    assert_eq!(surface.drain(), vec![width(BAR_GO, 75)]);

    // Leaving and re-entering neither refills bars nor re-reveals.
    host.report_visibility(SKILLS, 0.0);
    host.report_visibility(SKILLS, 1.0);
    host.advance(MS * 1000);
    assert!(surface.is_empty());

    // About section: revealed at 10%, counters wait for 50%.
    host.report_visibility(ABOUT, 0.2);
    assert_eq!(surface.drain(), vec![add(ABOUT, CLASS_VISIBLE)]);
    assert!(!page.counters_fired());
    host.report_visibility(ABOUT, 0.5);
    assert!(page.counters_fired());
    assert!(surface.is_empty(), "counters start on the next frame");

    host.run_frames(1_000);
    assert_eq!(surface.text_of(STAT_YEARS).as_deref(), Some("50"));
    assert_eq!(surface.text_of(STAT_PROJECTS).as_deref(), Some("120"));
    assert!(page.counter_runs().iter().all(|r| r.is_finished()));

    let years: Vec<i64> = surface
        .text_history(STAT_YEARS)
        .iter()
        .map(|t| t.parse().unwrap())
        .collect();
    assert!(years.windows(2).all(|w| w[0] <= w[1]));
    assert!(years.iter().all(|v| *v <= 50));

    // Header follows the scroll offset.
    surface.drain();
    page.on_scroll(120.0);
    page.on_scroll(300.0);
    assert_eq!(surface.drain(), vec![add(HEADER, CLASS_SCROLLED)]);
    assert!(page.header_scrolled());
}

#[test]
fn both_triggers_fire_exactly_once_under_repeated_reports() {
    let (host, surface, page) = mount(PageConfig::default());
    for _ in 0..5 {
        host.report_visibility(SKILLS, 1.0);
        host.report_visibility(ABOUT, 1.0);
    }
    host.advance(MS * 1000);
    host.run_frames(1_000);

    let widths = surface
        .mutations()
        .iter()
        .filter(|m| matches!(m, Mutation::Width { .. }))
        .count();
    assert_eq!(widths, 2);
    assert_eq!(page.counter_runs().len(), 2);
    assert!(page.reveal().is_revealed(ABOUT));
}

#[test]
fn config_changes_thresholds_and_stagger() {
    let mut config = PageConfig::default();
    config.skills.threshold = 0.8;
    config.skills.stagger_ms = 50;
    config.counters.steps = 10;
    let (host, surface, page) = mount(config);

    host.report_visibility(SKILLS, 0.5);
    assert!(!page.skills_fired());
    host.report_visibility(SKILLS, 0.8);
    assert!(page.skills_fired());
    host.advance(MS * 50);
    assert_eq!(surface.width_of(BAR_GO), Some(75));

    host.report_visibility(ABOUT, 0.5);
    assert_eq!(host.run_frames(1_000), 10);
    assert_eq!(surface.text_history(STAT_YEARS).len(), 10);
}

#[test]
fn resize_storm_settles_once() {
    let (host, _surface, page) = mount(PageConfig::default());
    let sizes = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = Rc::clone(&sizes);
    page.set_resize_hook(move |w, h| sink.borrow_mut().push((w, h)));

    for (i, w) in [800u32, 900, 1000, 1100].into_iter().enumerate() {
        page.on_resize(w, 700);
        host.advance(MS * (10 * i as u32 + 10));
    }
    host.advance(MS * 250);
    assert_eq!(*sizes.borrow(), vec![(1100, 700)]);
}
