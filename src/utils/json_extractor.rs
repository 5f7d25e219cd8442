//! JSON extraction from raw model output.
//!
//! Chat models asked for JSON sometimes wrap it in a Markdown code block:
//!
//! ````text
//! ```json
//! {"overall_sentiment": "positive", "insights": []}
//! ```
//! ````
//!
//! `extract_json` peels that wrapper off. It is a best-effort normalisation,
//! not a Markdown parser: only a leading fence tagged `json` is recognised, and
//! only the first and last line are dropped. Nested or repeated fences get no
//! special treatment, and untagged fences or unfenced text pass through
//! untouched. The result may still be invalid JSON; deciding that is the
//! validator's job.

/// Opening marker of a JSON-tagged code block
pub const JSON_FENCE_OPENER: &str = "```json";

/// Strip a ```json code fence from `raw`, or return `raw` unchanged
pub fn extract_json(raw: &str) -> String {
    if !is_fenced(raw) {
        return raw.to_string();
    }

    let trimmed = raw.trim();
    let lines: Vec<&str> = trimmed.split('\n').collect();
    if lines.len() < 2 {
        // A lone opener has no interior
        return String::new();
    }
    lines[1..lines.len() - 1].join("\n")
}

/// True when `raw` would be unwrapped by `extract_json`
pub fn is_fenced(raw: &str) -> bool {
    raw.trim().starts_with(JSON_FENCE_OPENER)
}
