//! Compact numeric tables: range maps and plain arrays.
//!
//! A range map is a comma-separated list of `key:value` entries. A key may
//! also be an inclusive integer range `low~high`, which assigns the value to
//! every integer in the range:
//!
//! ```
//! use factored_capacity::range::parse_range_table;
//!
//! let table = parse_range_table("-5~-3:1.2, 0:1.0").unwrap();
//! assert_eq!(table.len(), 4);
//! assert_eq!(table.get(-4), Some(1.2));
//! assert_eq!(table.floor(7), Some(1.0));
//! ```
//!
//! Parsing builds into a local buffer, so a failure never leaves a partially
//! filled table behind.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::config::MAX_RANGE_SPAN;
use crate::error::{DecodeError, Result};

/// One range map entry: key or `low~high`, a colon, and the value token.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ENTRY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?\d+)(?:\s*~\s*([+-]?\d+))?\s*:\s*(\S+)$").expect("valid regex")
});

/// Integer-keyed lookup table of float values.
///
/// Keys are unique and kept in ascending order. Lookups come in two
/// flavours: [`RangeTable::get`] is an exact match and [`RangeTable::floor`]
/// returns the value of the greatest key not above the requested one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RangeTable {
    entries: BTreeMap<i32, f64>,
}

impl RangeTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact lookup.
    #[must_use]
    pub fn get(&self, key: i32) -> Option<f64> {
        self.entries.get(&key).copied()
    }

    /// Value of the greatest key `<= key`, or `None` below the first key.
    #[must_use]
    pub fn floor(&self, key: i32) -> Option<f64> {
        self.entries.range(..=key).next_back().map(|(_, v)| *v)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries.keys().copied()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (i32, f64)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(i32, f64)> for RangeTable {
    fn from_iter<I: IntoIterator<Item = (i32, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Parse a finite float, tolerating surrounding whitespace.
pub(crate) fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a range map such as `"-20~-11:1.2, -10:1.0, 0~5:0.9"`.
///
/// Empty segments (for example a trailing comma) are ignored, but a table
/// without any entry is malformed. When keys repeat, the last entry wins.
///
/// # Errors
/// Returns `MalformedTable` carrying the offending token.
pub fn parse_range_table(text: &str) -> Result<RangeTable> {
    let malformed = |token: &str| DecodeError::MalformedTable {
        token: token.to_string(),
        text: text.to_string(),
    };

    let mut entries = BTreeMap::new();
    for segment in text.split(',') {
        let token = segment.trim();
        if token.is_empty() {
            continue;
        }

        let caps = ENTRY_PATTERN.captures(token).ok_or_else(|| malformed(token))?;
        let low: i32 = caps[1].parse().map_err(|_| malformed(token))?;
        let high: i32 = match caps.get(2) {
            Some(m) => m.as_str().parse().map_err(|_| malformed(token))?,
            None => low,
        };
        let value = parse_finite(&caps[3]).ok_or_else(|| malformed(token))?;

        let span = i64::from(high) - i64::from(low) + 1;
        if span < 1 || span > MAX_RANGE_SPAN {
            return Err(malformed(token));
        }

        for key in low..=high {
            entries.insert(key, value);
        }
    }

    if entries.is_empty() {
        return Err(malformed(text.trim()));
    }

    Ok(RangeTable { entries })
}

/// Parse a positional array of floats separated by commas and/or whitespace.
///
/// # Errors
/// Returns `MalformedArray` carrying the offending token, or the whole text
/// when it holds no entries.
pub fn parse_f64_array(text: &str) -> Result<Vec<f64>> {
    let malformed = |token: &str| DecodeError::MalformedArray {
        token: token.to_string(),
        text: text.to_string(),
    };

    let values = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| parse_finite(token).ok_or_else(|| malformed(token)))
        .collect::<Result<Vec<f64>>>()?;

    if values.is_empty() {
        return Err(malformed(text.trim()));
    }

    Ok(values)
}
