//! Scalar coercion for loosely-typed upstream fields.
//!
//! Offer text and bonus amounts arrive as whatever the research pipeline
//! happened to emit: plain strings, JSON documents serialised into strings,
//! fenced JSON, numbers, numeric strings, or nothing at all. Everything here
//! degrades to a caller-supplied fallback instead of failing.

use serde_json::{Map, Value};

use crate::extract::{extract_json, looks_like_encoded_payload};

/// An offer field resolved once at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum OfferText {
    /// Plain text, displayed verbatim.
    RawText(String),
    /// A JSON object that was embedded in the string.
    EncodedObject(Map<String, Value>),
    /// Nothing displayable: a non-string value, or an embedded array.
    Unusable,
}

impl OfferText {
    pub fn resolve(value: &Value) -> Self {
        let Value::String(s) = value else {
            return OfferText::Unusable;
        };
        if !looks_like_encoded_payload(s) {
            return OfferText::RawText(s.clone());
        }
        match extract_json(Some(s.as_str())) {
            Some(Value::Object(map)) => OfferText::EncodedObject(map),
            Some(Value::Array(_)) => OfferText::Unusable,
            // Unparseable or scalar: the text itself is the best we have.
            _ => OfferText::RawText(s.clone()),
        }
    }

    /// Human-readable form, or `fallback` when nothing readable exists.
    ///
    /// Embedded objects show `promotion`, then `description`.
    pub fn display(&self, fallback: &str) -> String {
        match self {
            OfferText::RawText(s) => s.clone(),
            OfferText::EncodedObject(map) => non_empty_str(map, "promotion")
                .or_else(|| non_empty_str(map, "description"))
                .unwrap_or(fallback)
                .to_string(),
            OfferText::Unusable => fallback.to_string(),
        }
    }
}

fn non_empty_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Best-effort display string for an arbitrary value.
pub fn coerce_display_string(value: &Value, fallback: &str) -> String {
    OfferText::resolve(value).display(fallback)
}

/// Best-effort finite number for an arbitrary value.
///
/// Numbers pass through, strings are parsed by their leading numeric prefix
/// (`"42.5abc"` is `42.5`), everything else is `fallback`. Never NaN, never
/// infinite.
pub fn coerce_number(value: &Value, fallback: f64) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_leading_float(s),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(fallback)
}

/// Parse the longest numeric prefix of `s`, after leading whitespace.
///
/// Accepts an optional sign, digits with an optional fraction, and an optional
/// exponent that is only consumed when digits follow it. A bare `Infinity`
/// prefix parses to an infinity.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
