//! Option cell parsing.
//!
//! Spreadsheet authors put answer choices into a single cell in many
//! different shapes: one per line, separated by semicolons or commas,
//! labeled `A.` / `选项A` / `①` / `1.` or not labeled at all. This module
//! turns such a cell into at most four labeled [`ChoiceOption`]s.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{ChoiceOption, MAX_OPTIONS, OPTION_LABELS};

/// Fallback delimiters tried, in order, when a cell has a single line.
const FALLBACK_DELIMITERS: [char; 4] = [';', '；', '，', ','];

static LETTER_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Da-d])[\.．、:：]\s*(.*)$").unwrap());
static WORD_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^选项\s*([A-Da-d])[\.．、:：]?\s*(.*)$").unwrap());
static CIRCLED_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([①②③④])[\.．、:：]?\s*(.*)$").unwrap());
static DIGIT_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([1-4])[\.．、:：]\s*(.*)$").unwrap());

/// Parse a free-form options cell into labeled choices.
///
/// Never returns more than four entries and never two entries sharing a
/// label; the first occurrence of a label wins. Output order follows the
/// cell, not the labels.
pub fn parse_options(cell: &str) -> Vec<ChoiceOption> {
    let mut options: Vec<ChoiceOption> = Vec::new();

    for (index, fragment) in split_fragments(cell).into_iter().enumerate() {
        let (label, text) = strip_label(fragment)
            .unwrap_or_else(|| (OPTION_LABELS[index].to_string(), fragment.to_string()));

        if options.iter().any(|o| !o.label.is_empty() && o.label == label) {
            continue;
        }
        options.push(ChoiceOption { label, text });
    }

    options
}

/// Render options back into the `"L. text"` line form used for detection.
pub fn options_to_text(options: &[ChoiceOption]) -> String {
    options
        .iter()
        .map(|o| format!("{}. {}", o.label, o.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split a cell into at most four trimmed, non-empty fragments.
fn split_fragments(cell: &str) -> Vec<&str> {
    let content = cell.trim();
    if content.is_empty() {
        return Vec::new();
    }

    let mut pieces: Vec<&str> = content.split('\n').collect();
    if pieces.len() == 1 {
        if let Some(delim) = FALLBACK_DELIMITERS.iter().find(|d| content.contains(**d)) {
            pieces = content.split(*delim).collect();
        }
    }

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .take(MAX_OPTIONS)
        .collect()
}

/// Try each recognized label convention in priority order.
fn strip_label(fragment: &str) -> Option<(String, String)> {
    if let Some(caps) = LETTER_LABEL
        .captures(fragment)
        .or_else(|| WORD_LABEL.captures(fragment))
    {
        return Some((caps[1].to_uppercase(), caps[2].trim().to_string()));
    }

    if let Some(caps) = CIRCLED_LABEL.captures(fragment) {
        let label = match &caps[1] {
            "①" => "A",
            "②" => "B",
            "③" => "C",
            _ => "D",
        };
        return Some((label.to_string(), caps[2].trim().to_string()));
    }

    DIGIT_LABEL.captures(fragment).map(|caps| {
        let label = match &caps[1] {
            "1" => "A",
            "2" => "B",
            "3" => "C",
            _ => "D",
        };
        (label.to_string(), caps[2].trim().to_string())
    })
}
