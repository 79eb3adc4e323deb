//! Structured-response parsing for raw engine output.
//!
//! Engines wrap JSON in markdown fences, prepend commentary, or run out of
//! generation budget mid-object. The parser tries a chain of increasingly
//! tolerant strategies and gives up only when all of them fail.

use serde_json::Value;

/// Extract a JSON value from raw engine output.
///
/// Fallback chain: whole-string parse, fenced code block, first balanced
/// brace span, best-effort repair of truncated output. Returns `None` (not an
/// error) when every strategy fails; the first 500 characters are logged for
/// diagnosis. Pure apart from logging.
pub fn parse_json_response(response: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(response) {
        return Some(value);
    }

    if let Some(block) = extract_fenced_block(response) {
        if let Ok(value) = serde_json::from_str(block) {
            return Some(value);
        }
    }

    if let Some(span) = extract_brace_span(response) {
        if let Ok(value) = serde_json::from_str(span) {
            return Some(value);
        }
    }

    if let Some(value) = repair_truncated_json(response) {
        if value.is_object() || value.is_array() {
            tracing::info!("JSON parsed via repair pass (likely truncated output)");
            return Some(value);
        }
    }

    let preview: String = response.chars().take(500).collect();
    tracing::error!(preview, "failed to parse JSON from engine response");
    None
}

/// Content of the first fenced code block (```json or bare ```).
fn extract_fenced_block(response: &str) -> Option<&str> {
    let start = response.find("```")?;
    let after_fence = &response[start + 3..];
    // Skip an optional language tag on the fence line.
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Span from the first `{` to the last `}`, mirroring a greedy brace match.
fn extract_brace_span(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&response[start..=end])
}

/// Best-effort repair of truncated or malformed JSON.
///
/// Takes the fragment from the first opening bracket, closes an unterminated
/// string, drops a dangling key or trailing comma, then appends the closers
/// for every still-open scope. Accepted only if the result parses.
fn repair_truncated_json(response: &str) -> Option<Value> {
    let start = response.find(['{', '['])?;
    let fragment = &response[start..];

    let mut open_scopes: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for c in fragment.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => open_scopes.push('}'),
            '[' => open_scopes.push(']'),
            '}' | ']' => {
                open_scopes.pop();
            }
            _ => {}
        }
    }

    let mut repaired = fragment.to_string();
    if in_string {
        repaired.push('"');
    }

    // Strip trailing punctuation that would dangle before the closers. A bare
    // `"key":` loses the key as well.
    loop {
        let trimmed = repaired.trim_end().to_string();
        if let Some(stripped) = trimmed.strip_suffix(',') {
            repaired = stripped.to_string();
        } else if let Some(stripped) = trimmed.strip_suffix(':') {
            repaired = strip_trailing_string(stripped.trim_end()).to_string();
        } else {
            repaired = trimmed;
            break;
        }
    }

    for closer in open_scopes.iter().rev() {
        repaired.push(*closer);
    }

    serde_json::from_str(&repaired).ok()
}

/// Remove a trailing quoted string (an orphaned object key).
fn strip_trailing_string(text: &str) -> &str {
    if !text.ends_with('"') {
        return text;
    }
    let body = &text[..text.len() - 1];
    // Scan back for the opening quote, skipping escaped quotes.
    let bytes = body.as_bytes();
    let mut i = body.len();
    while i > 0 {
        i -= 1;
        if bytes[i] == b'"' && (i == 0 || bytes[i - 1] != b'\\') {
            return &text[..i];
        }
    }
    text
}
