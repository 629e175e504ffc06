//! Date normalization
//!
//! Source cells arrive as free text, spreadsheet serial numbers or native
//! dates. [`normalize`] collapses all of them into `Option<NaiveDate>`; it is
//! total, and anything it cannot read is simply absent.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

/// Text values treated as "no value"
const NULL_TOKENS: &[&str] = &["nan", "nat", "null", "none", "n/a", "-"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Largest serial day number that still lands on a valid date (9999-12-31)
const MAX_SERIAL_DAY: f64 = 2_958_465.0;

/// Years accepted from any source; chrono's signed extended years are not
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// A raw cell value before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl RawValue {
    /// Trimmed text form of the value, used for project names
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            RawValue::Null => return None,
            RawValue::Text(s) => s.trim().to_string(),
            RawValue::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
            RawValue::Number(n) => n.to_string(),
            RawValue::Date(d) => d.to_string(),
            RawValue::DateTime(dt) => dt.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(d: NaiveDate) -> Self {
        RawValue::Date(d)
    }
}

impl From<NaiveDateTime> for RawValue {
    fn from(dt: NaiveDateTime) -> Self {
        RawValue::DateTime(dt)
    }
}

impl From<Option<NaiveDate>> for RawValue {
    fn from(d: Option<NaiveDate>) -> Self {
        d.map(RawValue::Date).unwrap_or(RawValue::Null)
    }
}

impl From<Option<&str>> for RawValue {
    fn from(s: Option<&str>) -> Self {
        s.map(RawValue::from).unwrap_or(RawValue::Null)
    }
}

/// Convert any raw value into a calendar date, or `None` when absent or unreadable
pub fn normalize(raw: impl Into<RawValue>) -> Option<NaiveDate> {
    let date = match raw.into() {
        RawValue::Null => None,
        RawValue::Date(d) => Some(d),
        RawValue::DateTime(dt) => Some(dt.date()),
        RawValue::Number(n) => from_serial(n),
        RawValue::Text(s) => parse_text(&s),
    };
    date.filter(|d| (MIN_YEAR..=MAX_YEAR).contains(&d.year()))
}

/// Spreadsheet serial day number (days since 1899-12-30); zero means empty
fn from_serial(n: f64) -> Option<NaiveDate> {
    if !n.is_finite() || n <= 0.0 || n > MAX_SERIAL_DAY {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(n.trunc() as i64))
}

fn parse_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() || NULL_TOKENS.iter().any(|t| s.eq_ignore_ascii_case(t)) {
        return None;
    }

    // Compact YYYYMMDD must win over the serial-number reading
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(s, "%Y%m%d").ok();
    }
    if let Ok(n) = s.parse::<f64>() {
        return from_serial(n);
    }

    let s = if s.contains('年') {
        s.replace('年', "-").replace('月', "-").replace('日', "")
    } else {
        s.to_string()
    };
    let s = s.trim();

    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.naive_local().date())
        })
}
