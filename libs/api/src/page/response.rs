use entity::prelude::*;
use serde::Serialize;
use sync_board::BoardListState;
use utoipa::ToSchema;

use crate::{ErrorResp, NoticeResp};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub board_id: String,
    pub is_completed: bool,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub content: String,
}

impl From<&BoardEntity> for Board {
    fn from(board: &BoardEntity) -> Self {
        Self {
            board_id: board.board_id.to_string(),
            is_completed: board.is_completed,
            title: board.title.clone(),
            start_date: board.start_date.clone(),
            end_date: board.end_date.clone(),
            content: board.content.clone(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct Page {
    pub id: i64,
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub boards: Vec<Board>,
    /// e.g. `1/3 Complete`
    pub progress: String,
    pub percent: u8,
    /// false until the row exists remotely
    pub saved: bool,
}

impl Page {
    pub fn from_state(state: &BoardListState) -> Option<Self> {
        let todo = state.todo()?;
        let progress = state.progress();

        Some(Self {
            id: todo.id,
            title: todo.title().to_string(),
            start_date: todo.start_date.clone(),
            end_date: todo.end_date.clone(),
            boards: state.boards().iter().map(Board::from).collect(),
            progress: progress.to_string(),
            percent: progress.percent(),
            saved: state.row_exists(),
        })
    }
}

#[derive(Serialize, ToSchema)]
pub struct PageResponse {
    pub outcome: String,
    pub page: Option<Page>,
    pub notices: Vec<NoticeResp>,
    /// Set when the store call failed
    pub error: Option<ErrorResp>,
}

#[derive(Serialize, ToSchema)]
pub struct DemoPageResponse {
    pub boards: Vec<Board>,
}
