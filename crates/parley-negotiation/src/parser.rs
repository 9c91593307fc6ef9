//! `Accept` header parsing.
//!
//! The header is split on `,` into media ranges and each range on `;` into the
//! media range itself and its parameters. Parsing never drops a range: every
//! comma-separated piece yields exactly one [`PreferenceEntry`], even when it
//! is empty or its parameters are garbage.
//!
//! Quality values are read in one of two modes (see [`QualityParsing`]):
//!
//! - `Lenient` coerces like a loose float cast. The longest leading decimal
//!   number is used, and a value without one becomes `0.0`.
//! - `Strict` rejects the header when a `q` value is not entirely a number.

use crate::error::NegotiationError;
use crate::types::PreferenceEntry;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

/// Leading decimal number, optionally preceded by whitespace.
static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t\n\r\x0B\x0C]*([+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("valid regex")
});

/// Entire value is a decimal number.
static WHOLE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
        .expect("valid regex")
});

/// How malformed `q` values are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityParsing {
    /// Loose coercion: `"0.5x"` is 0.5, `"abc"` is 0.0.
    #[default]
    Lenient,
    /// Reject the header with [`NegotiationError::MalformedQuality`].
    Strict,
}

/// Parse an `Accept` header, coercing malformed quality values.
///
/// # Example
///
/// ```
/// use parley_negotiation::parse_header;
///
/// let entries = parse_header("text/html,application/xml;q=0.9,*/*;q=0.1");
/// assert_eq!(entries.len(), 3);
/// assert_eq!(entries[1].value, "application/xml");
/// assert_eq!(entries[1].quality, 0.9);
/// assert_eq!(entries[2].index, 2);
/// ```
pub fn parse_header(header: &str) -> Vec<PreferenceEntry> {
    header
        .split(',')
        .enumerate()
        .map(|(index, range)| {
            parse_range(range, index, |value| Ok(lenient_quality(value)))
                .unwrap_or_else(|never: Infallible| match never {})
        })
        .collect()
}

/// Parse an `Accept` header, rejecting it on the first non-numeric `q` value.
pub fn parse_header_strict(header: &str) -> Result<Vec<PreferenceEntry>, NegotiationError> {
    header
        .split(',')
        .enumerate()
        .map(|(index, range)| {
            parse_range(range, index, |value| {
                strict_quality(value).ok_or_else(|| NegotiationError::MalformedQuality {
                    index,
                    value: value.to_string(),
                })
            })
        })
        .collect()
}

/// Parse an `Accept` header using the given quality mode.
pub fn parse_header_with(
    header: &str,
    mode: QualityParsing,
) -> Result<Vec<PreferenceEntry>, NegotiationError> {
    match mode {
        QualityParsing::Lenient => Ok(parse_header(header)),
        QualityParsing::Strict => parse_header_strict(header),
    }
}

fn parse_range<F, E>(range: &str, index: usize, quality: F) -> Result<PreferenceEntry, E>
where
    F: Fn(&str) -> Result<f64, E>,
{
    let mut segments = range.trim().split(';').map(str::trim);
    let media_range = segments.next().unwrap_or_default();
    let mut entry = PreferenceEntry::new(media_range, index);

    for segment in segments {
        // Tokens without `=` carry nothing we can record.
        let Some((name, value)) = segment.split_once('=') else {
            continue;
        };

        if name == "q" {
            entry.quality = quality(value)?;
        } else {
            entry = entry.with_parameter(name, value);
        }
    }

    Ok(entry)
}

/// Loose float coercion. Never fails.
pub fn lenient_quality(value: &str) -> f64 {
    LEADING_NUMBER
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Strict float parsing. `None` unless the whole value is a decimal number.
pub fn strict_quality(value: &str) -> Option<f64> {
    if WHOLE_NUMBER.is_match(value) {
        value.parse::<f64>().ok()
    } else {
        None
    }
}
