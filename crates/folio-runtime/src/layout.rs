#![forbid(unsafe_code)]

//! The host's description of the page.
//!
//! Every element is optional. A missing section simply means the behavior
//! bound to it is never wired up.

use folio_core::ElementId;

/// A skill progress bar and the level it fills to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillBar {
    pub element: ElementId,
    /// Fill level, clamped to 0–100.
    pub level: u8,
}

impl SkillBar {
    #[must_use]
    pub fn new(element: ElementId, level: u8) -> Self {
        Self {
            element,
            level: level.min(100),
        }
    }

    /// Build from a `data-skill` attribute value. Returns `None` if the
    /// value has no leading integer.
    #[must_use]
    pub fn from_attr(element: ElementId, attr: &str) -> Option<Self> {
        let level = parse_leading_int(attr)?.clamp(0, 100);
        Some(Self::new(element, level as u8))
    }
}

/// A numeric stat that counts up to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCounter {
    pub element: ElementId,
    pub target: i64,
}

impl StatCounter {
    #[must_use]
    pub fn new(element: ElementId, target: i64) -> Self {
        Self { element, target }
    }

    /// Build from a `data-target` attribute value. Returns `None` if the
    /// value has no leading integer.
    #[must_use]
    pub fn from_attr(element: ElementId, attr: &str) -> Option<Self> {
        parse_leading_int(attr).map(|target| Self::new(element, target))
    }
}

/// Elements the page wires behavior to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    /// Receives `loaded` on mount.
    pub body: Option<ElementId>,
    /// Receives `scrolled` past the scroll threshold.
    pub header: Option<ElementId>,
    /// Watched by the skill-bar trigger.
    pub skills_section: Option<ElementId>,
    pub skill_bars: Vec<SkillBar>,
    /// Watched by the stat-counter trigger.
    pub about_section: Option<ElementId>,
    pub stat_counters: Vec<StatCounter>,
    /// Revealed as they scroll into view.
    pub sections: Vec<ElementId>,
    /// Revealed with a staggered transition delay.
    pub hobby_cards: Vec<ElementId>,
}

impl PageLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn body(mut self, element: ElementId) -> Self {
        self.body = Some(element);
        self
    }

    #[must_use]
    pub fn header(mut self, element: ElementId) -> Self {
        self.header = Some(element);
        self
    }

    /// Set the skills section and its bars.
    #[must_use]
    pub fn skills(mut self, section: ElementId, bars: impl IntoIterator<Item = SkillBar>) -> Self {
        self.skills_section = Some(section);
        self.skill_bars = bars.into_iter().collect();
        self
    }

    /// Set the about section and its counters.
    #[must_use]
    pub fn about(
        mut self,
        section: ElementId,
        counters: impl IntoIterator<Item = StatCounter>,
    ) -> Self {
        self.about_section = Some(section);
        self.stat_counters = counters.into_iter().collect();
        self
    }

    #[must_use]
    pub fn sections(mut self, sections: impl IntoIterator<Item = ElementId>) -> Self {
        self.sections = sections.into_iter().collect();
        self
    }

    #[must_use]
    pub fn hobby_cards(mut self, cards: impl IntoIterator<Item = ElementId>) -> Self {
        self.hobby_cards = cards.into_iter().collect();
        self
    }
}

/// Parse the leading integer of an attribute value, skipping leading
/// whitespace and accepting one sign: `"50+"` is `50`, `"abc"` is `None`.
#[must_use]
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}
