// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural check on a cheap model's answer.
//!
//! Decides from the text alone whether a cascade should re-ask the top tier.

use std::sync::LazyLock;

use regex::Regex;
use switchyard_core::OutputShape;

/// A heading or paragraph tag anywhere in the answer.
static HTML_STRUCTURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h[1-3]|<p[> ]").unwrap());

/// Whether `content` is too weak to return for a feature of `shape`.
///
/// - shorter than `min_chars` after trimming: always
/// - json: when it does not parse once code fences are stripped
/// - html: when it has no `<h1>`-`<h3>` or `<p>` tag
/// - plain text: never, beyond the length floor
pub fn should_escalate(content: &str, shape: OutputShape, min_chars: usize) -> bool {
    let content = content.trim();
    if content.chars().count() < min_chars {
        return true;
    }

    match shape {
        OutputShape::Json => {
            let unfenced = strip_code_fences(content);
            serde_json::from_str::<serde_json::Value>(unfenced.trim()).is_err()
        }
        OutputShape::Html => !HTML_STRUCTURE.is_match(content),
        OutputShape::PlainText => false,
    }
}

/// Remove every "```json" and "```" marker.
fn strip_code_fences(content: &str) -> String {
    content.replace("```json", "").replace("```", "")
}
