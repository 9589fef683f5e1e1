#![forbid(unsafe_code)]

//! Page tuning as data.
//!
//! [`PageConfig`] groups every tunable threshold and delay used by the page
//! wiring so a host can override them at startup without a rebuild.
//!
//! # Loading
//!
//! ```toml
//! # folio.toml
//! [skills]
//! threshold = 0.25
//! stagger_ms = 150
//!
//! [header]
//! scroll_threshold_px = 80
//! ```
//!
//! ```rust,ignore
//! let config = PageConfig::from_toml_file("folio.toml")?;
//! let config = PageConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `PageConfig::default()` reproduces the stock page: skill bars at 30%
//! visibility with a 200ms stagger, counters at 50% in 100 steps, section
//! reveal at 10% with a `-50px` root margin and a 100ms card stagger, the
//! header switching style past 50px, and a 250ms resize debounce.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::counter::DEFAULT_COUNTER_STEPS;
use crate::host::ObserveOptions;

/// Top-level page configuration.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PageConfig {
    /// Skill-bar trigger parameters.
    pub skills: SkillsConfig,
    /// Stat-counter trigger parameters.
    pub counters: CountersConfig,
    /// Section and card reveal parameters.
    pub reveal: RevealConfig,
    /// Header scroll-state parameters.
    pub header: HeaderConfig,
    /// Resize hook parameters.
    pub resize: ResizeConfig,
}

/// Skill bars: fill once the skills section is visible.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SkillsConfig {
    /// Visible ratio of the skills section that fires the trigger.
    pub threshold: f64,
    /// Delay between consecutive bars, in milliseconds.
    pub stagger_ms: u64,
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            stagger_ms: 200,
        }
    }
}

/// Stat counters: count up once the about section is visible.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct CountersConfig {
    /// Visible ratio of the about section that fires the trigger.
    pub threshold: f64,
    /// Increments from zero to each counter's target.
    pub steps: u32,
}

impl Default for CountersConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            steps: DEFAULT_COUNTER_STEPS,
        }
    }
}

/// Section reveal: sections and hobby cards fade in as they scroll into view.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RevealConfig {
    /// Visible ratio that marks an element visible.
    pub threshold: f64,
    /// Vertical viewport margin in pixels.
    pub root_margin_px: i32,
    /// Transition delay step between hobby cards, in milliseconds.
    pub card_stagger_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin_px: -50,
            card_stagger_ms: 100,
        }
    }
}

/// Header: switches to its compact style once the page is scrolled.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct HeaderConfig {
    /// Scroll offset (exclusive) past which the header is `scrolled`.
    pub scroll_threshold_px: f64,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            scroll_threshold_px: 50.0,
        }
    }
}

/// Resize hook debounce.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ResizeConfig {
    /// Quiescence before the resize hook runs, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self { debounce_ms: 250 }
    }
}

impl PageConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to pretty JSON.
    #[cfg(feature = "config")]
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Check every parameter is in range.
    ///
    /// Returns a list of problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (name, value) in [
            ("skills.threshold", self.skills.threshold),
            ("counters.threshold", self.counters.threshold),
            ("reveal.threshold", self.reveal.threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("{name} must be in [0.0, 1.0], got {value}"));
            }
        }
        if self.counters.steps == 0 {
            errors.push("counters.steps must be > 0".to_string());
        }
        if !self.header.scroll_threshold_px.is_finite() {
            errors.push(format!(
                "header.scroll_threshold_px must be finite, got {}",
                self.header.scroll_threshold_px
            ));
        }
        errors
    }

    /// Validate, returning the config or every problem found.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Observer options for the skill-bar trigger.
    #[must_use]
    pub fn skills_observe(&self) -> ObserveOptions {
        ObserveOptions::threshold(self.skills.threshold)
    }

    /// Observer options for the stat-counter trigger.
    #[must_use]
    pub fn counters_observe(&self) -> ObserveOptions {
        ObserveOptions::threshold(self.counters.threshold)
    }

    /// Observer options for section reveal.
    #[must_use]
    pub fn reveal_observe(&self) -> ObserveOptions {
        ObserveOptions::threshold(self.reveal.threshold).with_root_margin(self.reveal.root_margin_px)
    }

    /// Delay between skill bars.
    #[must_use]
    pub fn skill_stagger(&self) -> Duration {
        Duration::from_millis(self.skills.stagger_ms)
    }

    /// Transition delay step between hobby cards.
    #[must_use]
    pub fn card_stagger(&self) -> Duration {
        Duration::from_millis(self.reveal.card_stagger_ms)
    }

    /// Resize hook quiescence.
    #[must_use]
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize.debounce_ms)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a page configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse error.
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The config parsed but has out-of-range values.
    #[error("invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
