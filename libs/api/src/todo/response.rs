use serde::Serialize;
use sync_board::NavEntry;
use utoipa::ToSchema;

use crate::{ErrorResp, NoticeResp};

#[derive(Serialize, ToSchema)]
pub struct TodoItem {
    pub id: i64,
    pub title: String,
    /// `empty`, `in_progress` or `complete`
    pub marker: String,
    pub route: String,
}

impl From<NavEntry> for TodoItem {
    fn from(entry: NavEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            marker: entry.marker.to_string(),
            route: entry.route,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct GetTodosResponse {
    pub todos: Vec<TodoItem>,
    pub notices: Vec<NoticeResp>,
    pub error: Option<ErrorResp>,
}

#[derive(Serialize, ToSchema)]
pub struct CreateTodoResponse {
    pub outcome: String,
    /// Where to navigate after creation
    pub route: Option<String>,
    pub notices: Vec<NoticeResp>,
    pub error: Option<ErrorResp>,
}
