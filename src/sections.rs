//! Pure text-carving helpers shared by the extraction strategies.
//!
//! Every function takes text and returns strings. None of them log or fail:
//! unmatched input yields an empty result and the caller applies defaults.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::lexicon::{DURATION_PATTERN, OVERVIEW_HEADERS};

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph pattern is valid"));

static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"^(.{10,80})\s*[:：]", r"^(.{10,80})\s*[-–]", r"^(.{10,80})\s*[•·]"]
        .iter()
        .map(|p| Regex::new(p).expect("title pattern is valid"))
        .collect()
});

/// Length in characters, which is what every threshold in the heuristics uses.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Case-insensitive substring test.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Trimmed, non-empty lines.
pub fn non_empty_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Splits on commas, semicolons and newlines, trims, drops empties and
/// removes duplicates while keeping first-seen order.
pub fn extract_list_items(text: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for part in text.split([',', ';', '\n']) {
        let item = part.trim();
        if !item.is_empty() && !items.iter().any(|existing| existing == item) {
            items.push(item.to_string());
        }
    }
    items
}

/// Drops a leading `label:` when the label contains one of `cues`, so
/// `대상: 신입사원, 경력사원` lists the people rather than the label.
pub fn strip_label<'a>(line: &'a str, cues: &[&str]) -> &'a str {
    match line.split_once([':', '：']) {
        Some((label, rest)) if contains_any(label, cues) => rest.trim(),
        _ => line,
    }
}

/// Finds a `<number><unit>` duration such as `3개월` in `line`.
pub fn extract_duration(line: &str) -> Option<String> {
    let caps = DURATION_PATTERN.captures(line)?;
    Some(format!("{}{}", &caps[1], &caps[2]))
}

/// Blank-line separated paragraphs, untrimmed, empties dropped.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .collect()
}

fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?'])
}

/// Derives a title from free text: the first sentence when it has a sane
/// length, else a `prefix:` style heading, else the first 50 characters.
pub fn extract_title(text: &str) -> String {
    if let Some(first) = split_sentences(text).next().map(str::trim) {
        let len = char_len(first);
        if len > 5 && len < 100 {
            return first.to_string();
        }
    }

    for pattern in TITLE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            return caps[1].trim().to_string();
        }
    }

    let head: String = text.chars().take(50).collect();
    let mut title = head.trim().to_string();
    if char_len(text) > 50 {
        title.push_str("...");
    }
    title
}

/// First paragraph followed by the remaining paragraphs rendered as
/// overview (`📋`) or bullet (`•`) sections.
pub fn structured_description(text: &str) -> String {
    let paragraphs = split_paragraphs(text);
    let Some((first, rest)) = paragraphs.split_first() else {
        return text.trim().to_string();
    };

    let mut description = first.trim().to_string();
    let sections: Vec<String> = rest
        .iter()
        .map(|p| p.trim())
        .filter(|p| char_len(p) > 10)
        .map(|p| {
            if OVERVIEW_HEADERS.iter().any(|h| contains_ignore_case(p, h)) {
                format!("📋 {}", p)
            } else {
                format!("• {}", p)
            }
        })
        .collect();

    if !sections.is_empty() {
        description.push_str("\n\n");
        description.push_str(&sections.join("\n\n"));
    }
    description
}

/// For each paragraph containing an anchor, takes the text after the first
/// matching anchor and splits it into sentences longer than 5 characters.
pub fn anchored_items(text: &str, anchors: &[&str]) -> Vec<String> {
    let mut items = Vec::new();
    for paragraph in split_paragraphs(text) {
        let Some((pos, anchor)) = anchors
            .iter()
            .find_map(|a| paragraph.find(a).map(|pos| (pos, *a)))
        else {
            continue;
        };
        let after = paragraph[pos + anchor.len()..].trim();
        if char_len(after) > 10 {
            items.extend(
                split_sentences(after)
                    .map(str::trim)
                    .filter(|s| char_len(s) > 5)
                    .map(str::to_string),
            );
        }
    }
    items
}

/// Returns the remainder of `line` after a `-`, `•` or `N.` list marker.
pub fn strip_list_marker(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix('-').or_else(|| trimmed.strip_prefix('•')) {
        return Some(rest.trim_start());
    }
    let digits = trimmed.len() - trimmed.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(rest) = trimmed[digits..].strip_prefix('.') {
            return Some(rest.trim_start());
        }
    }
    None
}

fn starts_with_any_ignore_case(line: &str, words: &[&str]) -> bool {
    let lower = line.trim_start().to_lowercase();
    words.iter().any(|w| lower.starts_with(&w.to_lowercase()))
}

/// Carves the bulleted block that follows the first `anchors` keyword.
///
/// The block starts at the first list-marker line after the anchor and runs
/// until a line that begins with one of `stops` (or the end of the text).
/// Items are split at list markers; continuation lines stay with their item.
pub fn list_block_items(text: &str, anchors: &[&str], stops: &[&str]) -> Vec<String> {
    if anchors.is_empty() {
        return Vec::new();
    }
    // Matching on the original text keeps byte offsets valid for slicing.
    let pattern = anchors
        .iter()
        .map(|a| regex::escape(a))
        .collect::<Vec<_>>()
        .join("|");
    let Some(anchor_end) = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()
        .and_then(|re| re.find(text).map(|m| m.end()))
    else {
        return Vec::new();
    };

    // The anchor's own line cannot hold the first marker.
    let mut lines = text[anchor_end..].split('\n').skip(1);
    let Some(first_item) = lines.by_ref().find_map(strip_list_marker) else {
        return Vec::new();
    };

    let mut raw_items = vec![first_item.to_string()];
    for line in lines {
        if starts_with_any_ignore_case(line, stops) {
            break;
        }
        match strip_list_marker(line) {
            Some(rest) => raw_items.push(rest.to_string()),
            None => {
                if let Some(current) = raw_items.last_mut() {
                    current.push('\n');
                    current.push_str(line);
                }
            }
        }
    }

    raw_items
        .iter()
        .map(|item| item.trim())
        .filter(|item| char_len(item) > 5)
        .map(str::to_string)
        .collect()
}

/// Anchored sentences plus the bulleted block, capped at `max_items`.
pub fn section_items(
    text: &str,
    anchors: &[&str],
    list_anchors: &[&str],
    list_stops: &[&str],
    max_items: usize,
) -> Vec<String> {
    let mut items = anchored_items(text, anchors);
    items.extend(list_block_items(text, list_anchors, list_stops));
    items.truncate(max_items);
    items
}
