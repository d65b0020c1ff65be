//! Parse provider output into search queries
//!
//! Strategies are tried in strict priority order: a JSON array, then one
//! query per line, then (for a single line only) a comma split. List
//! markers and wrapping quotes are stripped only when every item of a
//! multi-item list carries them, so `2. Weltkrieg` on its own stays intact.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Which strategy produced a parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    /// Nothing to parse (blank text)
    Empty,
    /// The text was a JSON array of strings
    JsonArray,
    /// One query per line
    Lines,
    /// Single line split on commas
    Commas,
}

impl ParseStrategy {
    /// Whether the parse fell back to the non-robust comma split
    pub fn is_degraded(self) -> bool {
        matches!(self, ParseStrategy::Commas)
    }
}

/// Queries extracted from provider output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQueries {
    /// Distinct, trimmed, non-empty queries in output order
    pub queries: Vec<String>,
    /// Strategy that produced them
    pub strategy: ParseStrategy,
}

/// Parse provider output into an ordered list of distinct queries
///
/// Never fails. The result is empty only for blank text or a well-formed
/// empty JSON array.
pub fn parse_queries(text: &str) -> ParsedQueries {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParsedQueries {
            queries: Vec::new(),
            strategy: ParseStrategy::Empty,
        };
    }

    let body = strip_code_fence(trimmed);

    if let Some(items) = parse_json_list(body) {
        debug!("Parsed {} queries from JSON", items.len());
        return finish(items, ParseStrategy::JsonArray);
    }

    let lines: Vec<&str> = body
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() >= 2 || (lines.len() == 1 && !lines[0].contains(',')) {
        return finish(clean_items(lines), ParseStrategy::Lines);
    }

    let items = clean_items(body.split(','));
    warn!(
        "Provider output is a single comma-separated line; split into {} queries",
        items.len()
    );
    finish(items, ParseStrategy::Commas)
}

fn finish(items: Vec<String>, strategy: ParseStrategy) -> ParsedQueries {
    let mut seen = HashSet::new();
    let queries = items
        .into_iter()
        .filter(|q| !q.is_empty())
        .filter(|q| seen.insert(q.clone()))
        .collect();
    ParsedQueries { queries, strategy }
}

/// Remove a surrounding Markdown code fence, if any
fn strip_code_fence(text: &str) -> &str {
    if !text.starts_with("```") {
        return text;
    }
    let after_open = match text.find('\n') {
        Some(idx) => &text[idx + 1..],
        None => return text.trim_start_matches('`').trim(),
    };
    after_open.trim_end().trim_end_matches("```").trim()
}

/// String elements of a JSON array, or of an object's `queries` array
fn parse_json_list(text: &str) -> Option<Vec<String>> {
    let value: Value = serde_json::from_str(text).ok()?;
    let array = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("queries") {
            Some(Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };

    Some(
        array
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                _ => None,
            })
            .collect(),
    )
}

/// Trim items, then strip list markers and wrapping quotes shared by all of them
fn clean_items<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut items: Vec<&str> = items
        .into_iter()
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .collect();

    if items.len() >= 2 {
        if let Some(stripped) = items
            .iter()
            .copied()
            .map(strip_marker)
            .collect::<Option<Vec<_>>>()
        {
            items = stripped;
        }
        if items.iter().all(|i| is_quoted(i)) {
            items = items.into_iter().map(|i| i[1..i.len() - 1].trim()).collect();
        }
    }

    items.into_iter().map(str::to_string).collect()
}

/// The item without its bullet (`- `, `* `, `• `) or numbering (`1. `, `1) `)
fn strip_marker(item: &str) -> Option<&str> {
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = item.strip_prefix(marker) {
            return Some(rest.trim_start());
        }
    }

    let digits = item.len() - item.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let rest = &item[digits..];
    rest.strip_prefix(". ")
        .or_else(|| rest.strip_prefix(") "))
        .map(str::trim_start)
}

fn is_quoted(item: &str) -> bool {
    item.len() >= 2 && item.starts_with('"') && item.ends_with('"')
}
