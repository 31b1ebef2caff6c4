//! Keeps a page's board list in step with the `todos` table.
//!
//! Every mutation copies the in-memory board sequence, writes the whole
//! sequence back in one call and reloads the row on success. Nothing is
//! merged optimistically, so a failed call leaves the loaded state as it was.

use serde::Serialize;

pub mod navigation;
pub mod page;
pub mod route;
pub mod state;

pub use navigation::{NavEntry, NavState, NavigationList};
pub use page::PageController;
pub use state::BoardListState;

/// User-facing message emitted by a controller, shown as a toast.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

impl Notice {
    pub fn success(message: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.to_string(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.to_string(),
        }
    }
}

/// Result of one user action.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Outcome {
    Loaded,
    Saved,
    Created { route: String },
    /// The store reported an error; state is unchanged.
    Failed,
    /// Input was refused before reaching the store.
    Rejected,
    /// Page header change kept locally; it is written with the first board.
    Pending,
    /// Neither an error nor an expected status. No notice is emitted.
    Ignored { status: u16 },
    /// The action needs a loaded page.
    Unloaded,
}

impl Outcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Loaded => "loaded",
            Outcome::Saved => "saved",
            Outcome::Created { .. } => "created",
            Outcome::Failed => "failed",
            Outcome::Rejected => "rejected",
            Outcome::Pending => "pending",
            Outcome::Ignored { .. } => "ignored",
            Outcome::Unloaded => "unloaded",
        }
    }
}
