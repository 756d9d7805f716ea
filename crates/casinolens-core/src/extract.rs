//! Best-effort JSON extraction from text that may be wrapped in markdown code fences.
//!
//! The research pipeline sometimes stores an offer as a JSON document that an
//! LLM returned verbatim, fences and all:
//!
//! ~~~text
//! ```json
//! {"promotion": "100% up to $500", "bonus_amount": 500}
//! ```
//! ~~~
//!
//! Extraction never fails loudly. Anything that does not parse yields `None`.

use serde_json::Value;
use tracing::debug;

const FENCE: &str = "```";
const FENCE_JSON: &str = "```json";

/// Returns true when `s` looks like an encoded payload rather than plain text:
/// after trimming it starts with a code fence or an opening brace.
///
/// This is only a sniff. A plain sentence that happens to start with `{` still
/// passes and is left to [`extract_json`] to reject.
pub fn looks_like_encoded_payload(s: &str) -> bool {
    let s = s.trim();
    s.starts_with(FENCE) || s.starts_with('{')
}

/// Strip optional markdown fences from `content` and parse what is left as JSON.
///
/// Empty or absent input is `None`, as is anything that fails to parse.
pub fn extract_json(content: Option<&str>) -> Option<Value> {
    let content = content?;
    if content.is_empty() {
        return None;
    }

    let cleaned = strip_fences(content.trim());
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(error = %e, "payload is not valid JSON after fence stripping");
            None
        }
    }
}

/// Value-level entry point: only string values are extracted.
///
/// Anything already structured (or null) short-circuits to `None`, so the
/// output of one extraction can never be fed back into another.
pub fn extract_value(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => extract_json(Some(s.as_str())),
        _ => None,
    }
}

fn strip_fences(trimmed: &str) -> String {
    if !trimmed.starts_with(FENCE) {
        return trimmed.to_string();
    }

    let lines: Vec<&str> = trimmed.split('\n').collect();
    let inner = if lines.len() > 2 {
        lines[1..lines.len() - 1].join("\n")
    } else {
        trimmed.to_string()
    };

    // Fences that do not sit on their own lines survive the slice above.
    inner
        .replace(FENCE_JSON, "")
        .replace(FENCE, "")
        .trim()
        .to_string()
}
