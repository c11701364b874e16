use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// Removes markup-like tags (`<...>`) from user-authored text before it is
/// fed back into a prompt.
pub fn strip_tags(text: &str) -> String {
    TAG_PATTERN.replace_all(text, "").into_owned()
}

/// Converts a raw client transcript into typed turns.
///
/// User content has tags stripped; assistant content passes through verbatim.
/// Roles outside {user, assistant} fall into the assistant branch. A payload
/// that is not an array degrades to an empty history with a warning instead
/// of failing the request, and entries without string content are skipped
/// the same way.
pub fn normalize_history(raw: &serde_json::Value) -> Vec<ChatTurn> {
    let Some(entries) = raw.as_array() else {
        warn!("chat history is not an array, continuing without context");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let Some(content) = entry.get("content").and_then(|c| c.as_str()) else {
                warn!("skipping history entry without string content");
                return None;
            };
            let role = entry.get("role").and_then(|r| r.as_str()).unwrap_or("");

            Some(if role == "user" {
                ChatTurn::user(strip_tags(content))
            } else {
                ChatTurn::assistant(content)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_preserves_length_and_order() {
        let raw = json!([
            {"role": "user", "content": "first"},
            {"role": "assistant", "content": "second"},
            {"role": "user", "content": "third"},
        ]);

        let turns = normalize_history(&raw);

        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0], ChatTurn::user("first"));
        assert_eq!(turns[1], ChatTurn::assistant("second"));
        assert_eq!(turns[2], ChatTurn::user("third"));
    }

    #[test]
    fn test_normalize_strips_tags_from_user_turns_only() {
        let raw = json!([
            {"role": "user", "content": "show me <b>TVs</b>"},
            {"role": "assistant", "content": "<p>Here are some TVs</p>"},
        ]);

        let turns = normalize_history(&raw);

        assert_eq!(turns[0].content, "show me TVs");
        assert_eq!(turns[1].content, "<p>Here are some TVs</p>");
    }

    #[test]
    fn test_normalize_non_array_returns_empty() {
        assert!(normalize_history(&json!("not an array")).is_empty());
        assert!(normalize_history(&json!({"role": "user"})).is_empty());
        assert!(normalize_history(&json!(null)).is_empty());
        assert!(normalize_history(&json!(42)).is_empty());
    }

    #[test]
    fn test_normalize_coerces_unknown_roles_to_assistant() {
        let raw = json!([{"role": "system", "content": "hello"}]);
        let turns = normalize_history(&raw);

        assert_eq!(turns[0].role, TurnRole::Assistant);
    }

    #[test]
    fn test_normalize_skips_entries_without_content() {
        let raw = json!([
            {"role": "user"},
            {"role": "user", "content": "kept"},
            {"role": "user", "content": 7},
        ]);

        let turns = normalize_history(&raw);

        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].content, "kept");
    }

    #[test]
    fn test_strip_tags_is_idempotent() {
        let inputs = ["plain text", "a <b>bold</b> claim", "<p>nested <i>tags</i></p>"];
        for input in inputs {
            let once = strip_tags(input);
            assert_eq!(strip_tags(&once), once);
        }
    }

    #[test]
    fn test_strip_tags_handles_unclosed_angle_bracket() {
        assert_eq!(strip_tags("3 < 5 is true"), "3 < 5 is true");
    }
}
