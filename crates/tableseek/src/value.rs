//! Typed views over JSON field values.
//!
//! Records are schema-less [`serde_json::Value`] trees. Comparisons never
//! coerce implicitly: a comparator picks one of the typed views below
//! ([`Number`], [`Timestamp`], `bool`, or the string form) and a value that
//! cannot be read through that view simply does not compare.

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value as Json;

/// Numeric value read from a JSON number or a numeric string.
///
/// Numbers keep their integer variant when they have one so that
/// comparisons between two integers stay exact:
/// - `I64` for signed integers
/// - `U64` for integers above `i64::MAX`
/// - `F64` for everything else
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Reads a number from a JSON value.
    ///
    /// Accepts JSON numbers and strings holding a finite number (form inputs
    /// deliver numbers as text). Everything else yields `None`.
    pub fn from_json(value: &Json) -> Option<Number> {
        match value {
            Json::Number(n) => n
                .as_i64()
                .map(Number::I64)
                .or_else(|| n.as_u64().map(Number::U64))
                .or_else(|| n.as_f64().map(Number::F64)),
            Json::String(s) => Number::parse(s),
            _ => None,
        }
    }

    /// Parses a number from text, ignoring surrounding whitespace.
    pub fn parse(text: &str) -> Option<Number> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(n) = text.parse::<i64>() {
            return Some(Number::I64(n));
        }
        text.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Number::F64)
    }

    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed variants.
    ///
    /// Total: mixed variants are compared through `f64::total_cmp`.
    pub fn compare(self, other: Number) -> Ordering {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => a.cmp(&b),
            (Number::U64(a), Number::U64(b)) => a.cmp(&b),
            _ => self.to_f64().total_cmp(&other.to_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(*other))
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

/// Timestamp value represented as milliseconds since Unix epoch (UTC).
///
/// # Example
///
/// ```
/// use tableseek::Timestamp;
///
/// let a = Timestamp::parse("2024-01-15T10:00:00Z").unwrap();
/// let b = Timestamp::parse("2024-01-20").unwrap();
/// assert!(a < b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Parses a date or date-time string.
    ///
    /// Accepted forms, tried in order:
    /// - RFC 3339 (`2024-01-15T10:00:00Z`, `2024-01-15T10:00:00+02:00`)
    /// - naive date-time with `T` or space separator, optional fraction (UTC)
    /// - plain date `YYYY-MM-DD` (midnight UTC)
    pub fn parse(text: &str) -> Option<Timestamp> {
        let text = text.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Timestamp(dt.timestamp_millis()));
        }

        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                return Some(Timestamp(dt.and_utc().timestamp_millis()));
            }
        }

        let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
        Some(Timestamp(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis()))
    }

    /// Reads a timestamp from a JSON value.
    ///
    /// Strings are parsed with [`Timestamp::parse`]; integers are taken as
    /// epoch milliseconds.
    pub fn from_json(value: &Json) -> Option<Timestamp> {
        match value {
            Json::String(s) => Timestamp::parse(s),
            Json::Number(n) => n.as_i64().map(Timestamp),
            _ => None,
        }
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

/// Reads a boolean from a JSON bool or a `"true"`/`"false"` string.
pub fn bool_from_json(value: &Json) -> Option<bool> {
    match value {
        Json::Bool(b) => Some(*b),
        Json::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Json::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Drops JSON `null`, so absent and null both read as "no value".
pub fn defined(value: Option<&Json>) -> Option<&Json> {
    value.filter(|v| !v.is_null())
}

/// Returns the string form of a field value.
///
/// Absent and null become the empty string, arrays join their elements
/// with `,`, and objects render as compact JSON.
pub fn display_string(value: Option<&Json>) -> Cow<'_, str> {
    match value {
        None | Some(Json::Null) => Cow::Borrowed(""),
        Some(Json::String(s)) => Cow::Borrowed(s),
        Some(Json::Bool(true)) => Cow::Borrowed("true"),
        Some(Json::Bool(false)) => Cow::Borrowed("false"),
        Some(Json::Number(n)) => Cow::Owned(n.to_string()),
        Some(Json::Array(items)) => Cow::Owned(
            items
                .iter()
                .map(|item| display_string(Some(item)))
                .collect::<Vec<_>>()
                .join(","),
        ),
        Some(object @ Json::Object(_)) => Cow::Owned(object.to_string()),
    }
}

/// Returns `true` if the value counts as empty.
///
/// Empty means falsy: absent, null, `""`, `false` or numeric zero.
/// Arrays and objects are never empty, even when they have no elements.
pub fn is_empty_value(value: Option<&Json>) -> bool {
    match value {
        None | Some(Json::Null) => true,
        Some(Json::String(s)) => s.is_empty(),
        Some(Json::Bool(b)) => !b,
        Some(Json::Number(n)) => n.as_f64() == Some(0.0),
        Some(Json::Array(_)) | Some(Json::Object(_)) => false,
    }
}
