//! Context budgeting: selects and truncates report sections per role.
//!
//! Sections are appended in the role's priority order under a character
//! budget derived from the role's token budget via a chars/token heuristic.
//! When space runs out, only the trailing section is truncated; earlier
//! sections are never sacrificed for later ones.

use crate::domain::models::{RoleProfile, ScoringConfig, SectionMap};

/// Marker appended to a truncated tail section.
const TRUNCATION_MARKER: &str = "\n\n[content truncated]";

/// Builds bounded per-role context strings from a section map.
#[derive(Debug, Clone)]
pub struct ContextBudgeter {
    chars_per_token: usize,
    min_keep_chars: usize,
}

impl ContextBudgeter {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            chars_per_token: config.chars_per_token,
            min_keep_chars: config.min_keep_chars,
        }
    }

    /// Concatenate the role's sections under its character budget.
    ///
    /// Returns an empty string when no section was available; the caller must
    /// treat that as "role cannot be evaluated". Output length never exceeds
    /// `budget_tokens * chars_per_token`.
    pub fn build_context(&self, sections: &SectionMap, profile: &RoleProfile) -> String {
        let max_chars = profile.budget_tokens * self.chars_per_token;
        let mut context = String::new();

        for section_id in &profile.sections {
            let Some(text) = sections.get_nonempty(section_id) else {
                continue;
            };
            let header = format!("\n\n=== {} ===\n\n", section_id.to_uppercase());

            if context.len() + header.len() + text.len() > max_chars {
                let remaining = max_chars.saturating_sub(context.len() + header.len());
                if remaining > self.min_keep_chars {
                    let keep = remaining.saturating_sub(TRUNCATION_MARKER.len());
                    let slice = truncate_at_char_boundary(text, keep);
                    context.push_str(&header);
                    context.push_str(slice);
                    context.push_str(TRUNCATION_MARKER);
                    tracing::info!(
                        section = section_id.as_str(),
                        kept = slice.len(),
                        "section truncated to fit budget"
                    );
                } else {
                    tracing::info!(
                        section = section_id.as_str(),
                        remaining,
                        "insufficient space, section dropped"
                    );
                }
                // Budget exhausted either way; lower-priority sections are
                // never appended after a truncation point.
                break;
            }

            context.push_str(&header);
            context.push_str(text);
        }

        let approx_tokens = context.len() / self.chars_per_token.max(1);
        tracing::debug!(chars = context.len(), approx_tokens, "context assembled");
        context
    }
}

/// Slice at most `max_len` bytes, backing off to a char boundary.
fn truncate_at_char_boundary(text: &str, max_len: usize) -> &str {
    if text.len() <= max_len {
        return text;
    }
    let mut end = max_len;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
