use entity::prelude::BoardPatch;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct SaveBoardRequest {
    pub title: Option<String>,
    /// Markdown body
    pub content: Option<String>,
    pub is_completed: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl From<SaveBoardRequest> for BoardPatch {
    fn from(request: SaveBoardRequest) -> Self {
        BoardPatch {
            title: request.title,
            content: request.content,
            is_completed: request.is_completed,
            start_date: request.start_date,
            end_date: request.end_date,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Default)]
pub struct UpdatePageRequest {
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
