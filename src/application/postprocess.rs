use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^`{1,6}(?:html?)?\n?").expect("leading fence pattern is valid"));
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`{1,6}\s*$").expect("trailing fence pattern is valid"));

/// Output formatting mode, fixed per orchestrator. The synthesis template and
/// the post-processing below must agree on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    Html,
    Markdown,
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!("unknown response mode: {other}")),
        }
    }
}

/// Best-effort cosmetic cleanup of a raw model response.
///
/// Html mode strips a single leading code-fence marker (optionally tagged
/// `html`), a single trailing fence marker, removes newlines, and trims.
/// Fences in the middle of the text pass through unchanged. Markdown mode is
/// a pass-through: stripping would corrupt legitimate fenced code blocks.
pub fn clean_response(mode: ResponseMode, raw: &str) -> String {
    match mode {
        ResponseMode::Html => {
            let stripped = LEADING_FENCE.replace(raw, "");
            let stripped = TRAILING_FENCE.replace(&stripped, "");
            stripped.replace('\n', "").trim().to_string()
        }
        ResponseMode::Markdown => raw.to_string(),
    }
}
