//! Best-effort structured-output extraction.
//!
//! LLM collaborators are asked for JSON but routinely wrap it in a code
//! fence or surround it with prose. [`extract`] digs the object out and
//! falls back to a caller-supplied mapping when it cannot.
//!
//! The brace search is greedy: it spans from the first `{` to the last `}`.
//! Text holding two separate objects therefore yields whatever that whole
//! span parses to, which is usually a parse failure and thus the fallback,
//! not the first valid object.

use serde_json::Value;
use tracing::warn;

/// A JSON object.
pub type Mapping = serde_json::Map<String, Value>;

/// Parse `raw` into a JSON object, or return `fallback` unchanged.
///
/// Never fails. Failures are logged with the raw text.
pub fn extract(raw: &str, fallback: Mapping) -> Mapping {
    let unfenced = strip_code_fence(raw);

    let Some(span) = brace_span(unfenced) else {
        warn!(raw = %raw, error = "no brace-delimited object found", "Structured output parse failed");
        return fallback;
    };

    match serde_json::from_str::<Mapping>(span) {
        Ok(map) => map,
        Err(e) => {
            warn!(raw = %raw, error = %e, "Structured output parse failed");
            fallback
        }
    }
}

/// Unwrap text that starts with a triple-backtick fence, with or without a
/// language tag. Anything else is only trimmed.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// First `{` through last `}`, inclusive.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
