use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use entity::prelude::*;
use sync_board::{route, Outcome, PageController};

pub mod request;
pub mod response;

use crate::response::{
    error_of, notices, status_of, ApiResponse, IntoApiResponse,
};
use crate::ApiState;

use self::{
    request::{SaveBoardRequest, UpdatePageRequest},
    response::{Board, DemoPageResponse, Page, PageResponse},
};

type PageReply = (StatusCode, Json<PageResponse>);

fn reply(outcome: Outcome, mut controller: PageController) -> PageReply {
    let body = PageResponse {
        outcome: outcome.kind().to_string(),
        page: Page::from_state(controller.state()),
        notices: notices(controller.drain_notices()),
        error: error_of(&outcome),
    };

    (status_of(&outcome), Json(body))
}

/// A fresh controller per request: load first, then act on what was loaded.
async fn open(
    state: &ApiState,
    raw_id: &str,
) -> ApiResponse<(Outcome, PageController)> {
    let id = route::parse_page_id(raw_id).into_response("400-001")?;

    let mut controller = PageController::new(state.repo.clone(), id);
    let outcome = controller.load_page().await;

    Ok((outcome, controller))
}

/// Demo page with one board
#[utoipa::path(
    get,
    path = "/create",
    responses(
        (status = 200, description = "Board editor without a backing row", body = DemoPageResponse)
    )
)]
pub async fn get_demo_page() -> Json<DemoPageResponse> {
    Json(DemoPageResponse {
        boards: vec![Board::from(&BoardEntity::new())],
    })
}

/// Load a page
///
/// A page without a row is returned as an empty, unsaved page.
#[utoipa::path(
    get,
    path = "/create/{id}",
    responses(
        (status = 200, description = "Page loaded", body = PageResponse),
        (status = 400, description = "id is not an integer"),
        (status = 502, description = "The remote store failed", body = PageResponse)
    ),
    params(
        ("id", description = "page id"),
    )
)]
pub async fn get_page(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResponse<PageReply> {
    let (outcome, controller) = open(&state, &id).await?;

    Ok(reply(outcome, controller))
}

/// Append a board
#[utoipa::path(
    post,
    path = "/create/{id}/boards",
    responses(
        (status = 200, description = "Board appended and saved", body = PageResponse),
        (status = 400, description = "id is not an integer"),
        (status = 502, description = "The remote store failed", body = PageResponse)
    ),
    params(
        ("id", description = "page id"),
    )
)]
pub async fn append_board(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResponse<PageReply> {
    let (outcome, mut controller) = open(&state, &id).await?;
    if outcome != Outcome::Loaded {
        return Ok(reply(outcome, controller));
    }

    let outcome = controller.append_board().await;

    Ok(reply(outcome, controller))
}

/// Save a board
#[utoipa::path(
    put,
    path = "/create/{id}/boards/{board_id}",
    request_body = SaveBoardRequest,
    responses(
        (status = 200, description = "Board saved", body = PageResponse),
        (status = 400, description = "id is not an integer"),
        (status = 422, description = "Board is missing a title or content", body = PageResponse),
        (status = 502, description = "The remote store failed", body = PageResponse)
    ),
    params(
        ("id", description = "page id"),
        ("board_id", description = "board id"),
    )
)]
pub async fn save_board(
    State(state): State<ApiState>,
    Path((id, board_id)): Path<(String, String)>,
    Json(request): Json<SaveBoardRequest>,
) -> ApiResponse<PageReply> {
    let (outcome, mut controller) = open(&state, &id).await?;
    if outcome != Outcome::Loaded {
        return Ok(reply(outcome, controller));
    }

    let outcome = controller.save_board(&board_id, request.into()).await;

    Ok(reply(outcome, controller))
}

/// Rename a page or change its date range
#[utoipa::path(
    patch,
    path = "/create/{id}",
    request_body = UpdatePageRequest,
    responses(
        (status = 200, description = "Page saved", body = PageResponse),
        (status = 400, description = "Bad id or nothing to update"),
        (status = 502, description = "The remote store failed", body = PageResponse)
    ),
    params(
        ("id", description = "page id"),
    )
)]
pub async fn update_page(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePageRequest>,
) -> ApiResponse<PageReply> {
    let range = match (request.start_date, request.end_date) {
        (Some(start), Some(end)) => Some((start, end)),
        (None, None) => None,
        _ => return Err(crate::ApiError::from_code("400-003")),
    };
    if request.title.is_none() && range.is_none() {
        return Err(crate::ApiError::from_code("400-002"));
    }

    let (mut outcome, mut controller) = open(&state, &id).await?;
    if outcome != Outcome::Loaded {
        return Ok(reply(outcome, controller));
    }

    if let Some(title) = request.title {
        outcome = controller.rename(&title).await;
        if !matches!(outcome, Outcome::Saved | Outcome::Pending) {
            return Ok(reply(outcome, controller));
        }
    }

    if let Some((start, end)) = range {
        outcome = controller.set_date_range(&start, &end).await;
    }

    Ok(reply(outcome, controller))
}
