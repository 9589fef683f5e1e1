#![forbid(unsafe_code)]

//! Folio Runtime
//!
//! Page wiring for the portfolio: this crate composes the primitives in
//! `folio-core` into a mounted [`Page`] and writes every visual change to a
//! [`Surface`].
//!
//! # Key Components
//!
//! - [`Page`] - Page-load wiring plus scroll/resize entry points
//! - [`PageHost`] - The timer, frame, and visibility capabilities a page runs on
//! - [`PageLayout`] - Which elements exist and what they carry
//! - [`Surface`] / [`RecordingSurface`] - Output sink for style mutations
//! - [`SectionReveal`] - Repeating reveal observer for sections and cards
//! - [`HeaderState`] - Header scroll state
//!
//! # How it fits in the system
//! The host is in charge of time and the viewport: it advances timers, ticks
//! frames, reports visibility, and forwards scroll and resize events. This
//! crate decides what those events mean for the page.

pub mod header;
pub mod layout;
pub mod page;
pub mod reveal;
pub mod skills;
pub mod stats;
pub mod surface;

pub use header::HeaderState;
pub use layout::{PageLayout, SkillBar, StatCounter, parse_leading_int};
pub use page::{Page, PageHost};
pub use reveal::SectionReveal;
pub use skills::fill_skill_bars;
pub use stats::start_stat_counters;
pub use surface::{CLASS_LOADED, CLASS_SCROLLED, CLASS_VISIBLE, Mutation, RecordingSurface, Surface};
