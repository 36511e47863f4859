//! Campaign goal list normalizer.
//!
//! # Responsibility
//! - Turn free-form textarea input (one goal per line) into ordered
//!   `GoalRecord` values.
//! - Render stored records back into editable text.
//!
//! # Invariants
//! - Every non-blank input line yields exactly one record, in input order.
//! - Line numbering counts blank lines, so icon rotation stays aligned with
//!   the original line positions.
//! - Pipe-delimited lines with exactly three fields are taken verbatim.
//! - Parsing and rendering never fail.

use serde::{Deserialize, Serialize};

/// Icon rotation applied to plain-form goal lines.
pub const DEFAULT_GOAL_ICONS: [&str; 10] = [
    "🌱", "🌍", "♻️", "💧", "🌳", "☀️", "🐝", "🌊", "🍃", "🎯",
];

const LEGACY_DELIMITER: char = '|';
const LEGACY_FIELD_COUNT: usize = 3;
const TITLE_MAX_WORDS: usize = 5;
const TITLE_ELLIPSIS: &str = "...";

/// One structured campaign goal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoalRecord {
    pub icon: String,
    pub title: String,
    /// Full trimmed source line.
    pub description: String,
}

impl GoalRecord {
    pub fn new(
        icon: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            icon: icon.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Parses textarea input into goal records.
///
/// Lines of the form `icon | title | description` are read back verbatim.
/// Any other non-blank line is normalized: the icon comes from `icons` by
/// 1-based line position, the title is the first five words (with `...`
/// appended when truncated) with its first character uppercased, and the
/// description keeps the whole trimmed line.
///
/// An empty `icons` slice produces empty icon strings.
pub fn parse_goals<S: AsRef<str>>(text: &str, icons: &[S]) -> Vec<GoalRecord> {
    let mut goals = Vec::new();

    for (offset, line) in text.split('\n').enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(record) = parse_legacy_line(trimmed) {
            goals.push(record);
            continue;
        }

        let icon = icons
            .get(offset % icons.len().max(1))
            .map(|icon| icon.as_ref().to_string())
            .unwrap_or_default();
        goals.push(GoalRecord {
            icon,
            title: derive_title(trimmed),
            description: trimmed.to_string(),
        });
    }

    goals
}

/// Renders goal records as `icon | title | description` lines.
pub fn render_goals(goals: &[GoalRecord]) -> String {
    goals
        .iter()
        .map(|goal| format!("{} | {} | {}", goal.icon, goal.title, goal.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_legacy_line(trimmed: &str) -> Option<GoalRecord> {
    if !trimmed.contains(LEGACY_DELIMITER) {
        return None;
    }

    let parts = trimmed
        .split(LEGACY_DELIMITER)
        .map(str::trim)
        .collect::<Vec<_>>();
    if parts.len() != LEGACY_FIELD_COUNT {
        return None;
    }
    Some(GoalRecord::new(parts[0], parts[1], parts[2]))
}

fn derive_title(trimmed: &str) -> String {
    let words = trimmed.split_whitespace().collect::<Vec<_>>();
    let title = if words.len() <= TITLE_MAX_WORDS {
        trimmed.to_string()
    } else {
        format!("{}{TITLE_ELLIPSIS}", words[..TITLE_MAX_WORDS].join(" "))
    };
    capitalize_first(&title)
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{capitalize_first, derive_title, parse_goals, render_goals, GoalRecord};
    use super::DEFAULT_GOAL_ICONS;

    #[test]
    fn blank_input_yields_no_goals() {
        assert!(parse_goals("", &DEFAULT_GOAL_ICONS).is_empty());
        assert!(parse_goals("   \n  \n", &DEFAULT_GOAL_ICONS).is_empty());
    }

    #[test]
    fn short_line_keeps_text_and_capitalizes_title() {
        let goals = parse_goals("  plant trees  ", &DEFAULT_GOAL_ICONS);
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].title, "Plant trees");
        assert_eq!(goals[0].description, "plant trees");
        assert_eq!(goals[0].icon, DEFAULT_GOAL_ICONS[0]);
    }

    #[test]
    fn blank_lines_consume_icon_positions() {
        let goals = parse_goals("x\n\ny", &DEFAULT_GOAL_ICONS);
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].icon, DEFAULT_GOAL_ICONS[0]);
        assert_eq!(goals[1].icon, DEFAULT_GOAL_ICONS[2]);
    }

    #[test]
    fn icon_rotation_wraps_after_ten_lines() {
        let text = (1..=11)
            .map(|idx| format!("goal {idx}"))
            .collect::<Vec<_>>()
            .join("\n");
        let goals = parse_goals(&text, &DEFAULT_GOAL_ICONS);
        assert_eq!(goals.len(), 11);
        assert_eq!(goals[9].icon, DEFAULT_GOAL_ICONS[9]);
        assert_eq!(goals[10].icon, DEFAULT_GOAL_ICONS[0]);
    }

    #[test]
    fn long_line_is_truncated_to_five_words() {
        let goals = parse_goals("one two three four five six seven", &DEFAULT_GOAL_ICONS);
        assert_eq!(goals[0].title, "One two three four five...");
        assert_eq!(goals[0].description, "one two three four five six seven");
    }

    #[test]
    fn five_word_line_keeps_original_spacing() {
        assert_eq!(derive_title("a  b c d e"), "A  b c d e");
    }

    #[test]
    fn truncated_title_collapses_inner_whitespace() {
        assert_eq!(derive_title("a  b\tc d e f"), "A b c d e...");
    }

    #[test]
    fn capitalization_touches_only_first_character() {
        assert_eq!(capitalize_first("éCO aware"), "ÉCO aware");
        assert_eq!(capitalize_first("42 bins"), "42 bins");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn legacy_line_is_taken_verbatim() {
        let goals = parse_goals("  🎯 |  reduce waste | cut plastic by half ", &DEFAULT_GOAL_ICONS);
        assert_eq!(
            goals,
            vec![GoalRecord::new("🎯", "reduce waste", "cut plastic by half")]
        );
    }

    #[test]
    fn malformed_pipe_line_falls_back_to_plain_form() {
        let goals = parse_goals("a|b", &DEFAULT_GOAL_ICONS);
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].icon, DEFAULT_GOAL_ICONS[0]);
        assert_eq!(goals[0].title, "A|b");
        assert_eq!(goals[0].description, "a|b");

        let goals = parse_goals("a | b | c | d", &DEFAULT_GOAL_ICONS);
        assert_eq!(goals[0].description, "a | b | c | d");
        assert_ne!(goals[0].icon, "a");
    }

    #[test]
    fn crlf_input_is_trimmed() {
        let goals = parse_goals("first\r\nsecond\r\n", &DEFAULT_GOAL_ICONS);
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[1].description, "second");
        assert_eq!(goals[1].icon, DEFAULT_GOAL_ICONS[1]);
    }

    #[test]
    fn empty_icon_set_produces_empty_icons() {
        let icons: [&str; 0] = [];
        let goals = parse_goals("clean the river", &icons);
        assert_eq!(goals[0].icon, "");
        assert_eq!(goals[0].title, "Clean the river");
    }

    #[test]
    fn render_joins_records_with_pipes() {
        let goals = vec![
            GoalRecord::new("🌱", "Plant", "plant trees"),
            GoalRecord::new("💧", "Save", "save water"),
        ];
        assert_eq!(
            render_goals(&goals),
            "🌱 | Plant | plant trees\n💧 | Save | save water"
        );
        assert_eq!(render_goals(&[]), "");
    }

    #[test]
    fn legacy_records_round_trip() {
        let goals = vec![GoalRecord::new("🎯", "T", "D")];
        assert_eq!(parse_goals(&render_goals(&goals), &DEFAULT_GOAL_ICONS), goals);
    }

    #[test]
    fn plain_records_freeze_after_one_edit_cycle() {
        let first = parse_goals("\nswitch to reusable bags everywhere we shop", &DEFAULT_GOAL_ICONS);
        let second = parse_goals(&render_goals(&first), &DEFAULT_GOAL_ICONS);
        assert_eq!(first, second);
        assert_eq!(second[0].icon, DEFAULT_GOAL_ICONS[1]);
    }
}
