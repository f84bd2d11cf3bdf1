//! CanView filter files and the filter cascade.
//!
//! A filter file is line oriented: `FILTERS:` opens the level-1 rule list,
//! `SUBFILTERS_<N>:` opens level N, and every other significant line is one
//! rule of the form `<pattern> "<description>" <colour>`. Patterns are hex
//! text where `x` marks a wildcard nibble; a `{s<K>}` suffix inside the
//! description chains the rule into subfilter level K.

use regex::Regex;

use crate::state::{COL_COLOUR, COL_DESCRIPTION};
use crate::table::{LogTable, Value};

/// One filter rule, ordered by file appearance within its level
#[derive(Clone, Debug, PartialEq)]
pub struct FilterRule {
    pub level: u32,
    /// Cleaned match pattern: literal hex characters and `?` wildcards
    pub pattern: String,
    pub description: String,
    /// 0 terminates the cascade; any other value is the level searched next
    pub subfilter_level: u32,
    /// Raw colour tag, kept verbatim so unknown tags round-trip
    pub color: String,
}

/// Check whether the contents look like a CanView filter file
pub fn detect(contents: &str) -> bool {
    contents
        .lines()
        .nth(1)
        .is_some_and(|line| line.contains("// CanView Filter"))
}

/// Parse a filter file into its ordered rule list.
///
/// Malformed rule lines are skipped with a warning; an empty file is an
/// empty rule list, not an error.
pub fn parse_filter_file(contents: &str) -> Vec<FilterRule> {
    let subfilter_regex =
        Regex::new(r"SUBFILTERS_(\d+):").expect("Failed to compile regex");
    let mut rules = Vec::new();
    let mut level = 0u32;

    for line in contents.lines() {
        // Comments, dividers, and anything too short to be a rule
        if line.starts_with("//") || line.starts_with("--") || line.len() < 8 {
            continue;
        }
        if line.contains("FILTERS:") {
            level = 1;
            continue;
        }
        if let Some(captures) = subfilter_regex.captures(line) {
            match captures[1].parse() {
                Ok(n) => level = n,
                Err(_) => tracing::warn!("Bad subfilter header: {}", line),
            }
            continue;
        }

        let normalized = line.replace('\t', " ");
        let parts: Vec<&str> = normalized.split('"').collect();
        if parts.len() < 3 {
            tracing::warn!("Skipping malformed filter line: {}", line);
            continue;
        }

        // " x " is an elided length marker, remaining x's are wildcards
        let pattern = parts[0]
            .replace(" x ", "")
            .replace(' ', "")
            .replace('x', "?");

        let (description, subfilter_level) = match parts[1].split_once("{s") {
            Some((text, suffix)) => {
                let sub = suffix
                    .split_once('}')
                    .and_then(|(n, _)| n.parse().ok())
                    .unwrap_or(0);
                (text.to_string(), sub)
            }
            None => (parts[1].to_string(), 0),
        };

        rules.push(FilterRule {
            level,
            pattern,
            description,
            subfilter_level,
            color: parts[2].trim().to_string(),
        });
    }

    tracing::info!("Parsed CanView filter: {} rules", rules.len());
    rules
}

/// Position-wise wildcard comparison, bounded to the shorter of the two
/// strings. `?` matches any character; zero overlapping characters is a
/// non-match.
pub fn wildcard_match(pattern: &str, test: &str) -> bool {
    let overlap = pattern.len().min(test.len());
    if overlap == 0 {
        return false;
    }
    pattern
        .bytes()
        .zip(test.bytes())
        .all(|(p, t)| p == b'?' || p == t)
}

/// Run the filter cascade over every row, rewriting Description and Colour.
///
/// Both columns are cleared first so repeated passes are deterministic. Per
/// row the matcher starts at level 1, takes the first matching rule in file
/// order, appends its description, overwrites the colour, and continues at
/// the rule's subfilter level until a terminal rule (level 0) or a level
/// with no match.
pub fn apply_filters(table: &mut LogTable, rules: &[FilterRule]) {
    table.clear_annotations();
    for row in 0..table.row_count() {
        let test = table.test_string(row);
        let mut description = String::new();
        let mut color = String::new();
        let mut level = 1u32;
        while level > 0 {
            let hit = rules
                .iter()
                .filter(|rule| rule.level == level)
                .find(|rule| wildcard_match(&rule.pattern, &test));
            match hit {
                Some(rule) => {
                    description.push_str(&rule.description);
                    color = rule.color.clone();
                    level = rule.subfilter_level;
                }
                None => level = 0,
            }
        }
        table.rows[row][COL_DESCRIPTION] = Value::Str(description);
        table.rows[row][COL_COLOUR] = Value::Str(color);
    }
}
