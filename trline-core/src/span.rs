//! Visible span of a single project
//!
//! The span runs from the earliest populated date slot to the latest one,
//! widened by a margin on both sides. Projects with no dates at all get a
//! window starting today so they still render.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default margin added on each side of a span, in days
pub const DEFAULT_PAD_DAYS: i64 = 15;

/// Default length of the window used when a project has no end date, in days
pub const DEFAULT_MISSING_END_DAYS: i64 = 90;

/// A padded start/end pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Span {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// True when the end lies before the start
    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    /// Width in whole days; negative for an inverted span
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Apply a policy to an inverted span; well-formed spans pass through
    pub fn apply(self, policy: SpanPolicy) -> Self {
        if !self.is_inverted() {
            return self;
        }
        match policy {
            SpanPolicy::Clamp => Span::new(self.start, self.start),
            SpanPolicy::Swap => Span::new(self.end, self.start),
            SpanPolicy::Keep => self,
        }
    }
}

/// What to do when out-of-order milestone data yields an end before the start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanPolicy {
    /// Collapse to a zero-width span at the start date
    #[default]
    Clamp,
    /// Exchange start and end
    Swap,
    /// Pass the inverted span through unchanged
    Keep,
}

impl SpanPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "clamp" => Some(SpanPolicy::Clamp),
            "swap" => Some(SpanPolicy::Swap),
            "keep" => Some(SpanPolicy::Keep),
            _ => None,
        }
    }
}

impl fmt::Display for SpanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanPolicy::Clamp => write!(f, "clamp"),
            SpanPolicy::Swap => write!(f, "swap"),
            SpanPolicy::Keep => write!(f, "keep"),
        }
    }
}

/// Move `date` by `days`, saturating at the calendar limits instead of panicking
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let amount = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(amount).unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(amount).unwrap_or(NaiveDate::MIN)
    }
}

/// Resolve a project's padded span from its date slots in chronological order
///
/// The first present slot is the base start and the last present slot is
/// the base end. An inverted result is returned as-is; see [`Span::apply`].
pub fn resolve_span(
    slots: &[Option<NaiveDate>],
    pad_days: i64,
    missing_end_days: i64,
    today: NaiveDate,
) -> Span {
    let base_start = slots.iter().flatten().next().copied().unwrap_or(today);
    let base_end = slots
        .iter()
        .rev()
        .flatten()
        .next()
        .copied()
        .unwrap_or_else(|| shift_days(today, missing_end_days));

    Span::new(
        shift_days(base_start, -pad_days),
        shift_days(base_end, pad_days),
    )
}
