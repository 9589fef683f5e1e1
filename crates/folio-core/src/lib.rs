// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: host capabilities, rate limiting, one-shot triggers, and counters.
//!
//! # Role in Folio
//! `folio-core` holds the reusable behavior of the portfolio page with no
//! knowledge of any particular page layout. Everything time- or
//! viewport-dependent goes through the capability traits in [`host`], so the
//! same code runs against a browser shim or the deterministic
//! [`VirtualHost`](virtual_host::VirtualHost).
//!
//! # Primary responsibilities
//! - **Capabilities**: [`Clock`], [`TimerHost`], [`FrameScheduler`],
//!   [`VisibilityObserver`].
//! - **Rate limiting**: [`debounce`] and [`throttle`].
//! - **One-shot triggers**: [`OneShotTrigger`] with its [`TriggerState`].
//! - **Counters**: [`CounterAnimation`] and [`animate_counter`].
//! - **Configuration**: [`PageConfig`] (TOML/JSON with the `config` feature).
//!
//! # How it fits in the system
//! `folio-runtime` composes these pieces into a mounted page and writes the
//! resulting style mutations to a surface.

pub mod config;
pub mod counter;
pub mod host;
pub mod rate_limit;
pub mod trigger;
pub mod virtual_host;

pub use config::{ConfigError, PageConfig};
pub use counter::{CounterAnimation, CounterFrame, CounterRun, animate_counter};
pub use host::{
    Clock, ElementId, FrameScheduler, ObserveOptions, SystemClock, TimerHost, VisibilityEntry,
    VisibilityObserver,
};
pub use rate_limit::{Debounced, Throttled, debounce, throttle};
pub use trigger::{OneShotTrigger, TriggerState};
pub use virtual_host::VirtualHost;
