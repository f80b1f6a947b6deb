//! Line grammar for fenced blocks: opening fences, marker lines and closing fences.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```(python|py|tsx|ts|json|prisma|js|sql)\s*$").unwrap());
static FILE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#\s*File:\s*(.+)$").unwrap());
static CLOSING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```\s*$").unwrap());

/// Language tags accepted on an opening fence. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FenceTag {
    Python,
    Py,
    Ts,
    Tsx,
    Json,
    Prisma,
    Js,
    Sql,
}

impl FenceTag {
    pub const ALL: [FenceTag; 8] = [
        FenceTag::Python,
        FenceTag::Py,
        FenceTag::Ts,
        FenceTag::Tsx,
        FenceTag::Json,
        FenceTag::Prisma,
        FenceTag::Js,
        FenceTag::Sql,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FenceTag::Python => "python",
            FenceTag::Py => "py",
            FenceTag::Ts => "ts",
            FenceTag::Tsx => "tsx",
            FenceTag::Json => "json",
            FenceTag::Prisma => "prisma",
            FenceTag::Js => "js",
            FenceTag::Sql => "sql",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }
}

impl fmt::Display for FenceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the tag if `line` is an opening fence with a recognized tag.
///
/// Anything after the tag other than whitespace (`` ```python3 ``, `` ```py {.x} ``) means the
/// line is ordinary text.
pub fn opening_fence(line: &str) -> Option<FenceTag> {
    let caps = OPENING_FENCE.captures(line)?;
    FenceTag::from_tag(caps.get(1)?.as_str())
}

/// Returns the raw, not yet normalized, path of a `# File: <path>` marker line.
pub fn file_marker(line: &str) -> Option<&str> {
    FILE_MARKER.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
}

pub fn is_closing_fence(line: &str) -> bool {
    CLOSING_FENCE.is_match(line)
}
