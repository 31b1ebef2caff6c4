use std::fmt;

use serde::{Deserialize, Serialize};

/// Board identifier. Generated as a string; older rows may hold integers.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoardId {
    Number(i64),
    Text(String),
}

impl BoardId {
    pub fn generate() -> Self {
        BoardId::Text(uuid::Uuid::new_v4().to_string())
    }

    /// Compares against an id taken from a url segment.
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            BoardId::Number(n) => raw.parse::<i64>().is_ok_and(|r| r == *n),
            BoardId::Text(s) => s == raw,
        }
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardId::Number(n) => write!(f, "{}", n),
            BoardId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardContent {
    pub board_id: BoardId,
    #[serde(default, alias = "isConmpleted")]
    pub is_completed: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    /// Markdown body.
    #[serde(default)]
    pub content: String,
}

impl BoardContent {
    pub fn new() -> Self {
        Self {
            board_id: BoardId::generate(),
            is_completed: false,
            title: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            content: String::new(),
        }
    }

    pub fn apply(&mut self, patch: BoardPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(is_completed) = patch.is_completed {
            self.is_completed = is_completed;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
    }
}

impl Default for BoardContent {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_completed: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
