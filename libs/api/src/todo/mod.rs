use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use sync_board::{NavigationList, Outcome};

pub mod request;
pub mod response;

use crate::response::{error_of, notices, status_of};
use crate::ApiState;

use self::{
    request::GetTodosParam,
    response::{CreateTodoResponse, GetTodosResponse, TodoItem},
};

/// List all pages
#[utoipa::path(
    get,
    path = "/todos",
    responses(
        (status = 200, description = "List all pages successfully", body = GetTodosResponse),
        (status = 502, description = "The remote store failed", body = GetTodosResponse)
    ),
    params(
        GetTodosParam
    )
)]
pub async fn get_todos(
    State(state): State<ApiState>,
    Query(params): Query<GetTodosParam>,
) -> (StatusCode, Json<GetTodosResponse>) {
    let mut nav = NavigationList::new(state.repo.clone());
    let outcome = nav.load_all().await;

    let entries = match params.q {
        Some(q) => nav.search(&q),
        None => nav.entries(),
    };

    let body = GetTodosResponse {
        todos: entries.into_iter().map(TodoItem::from).collect(),
        notices: notices(nav.drain_notices()),
        error: error_of(&outcome),
    };

    (status_of(&outcome), Json(body))
}

/// Add a new blank page
#[utoipa::path(
    post,
    path = "/",
    responses(
        (status = 201, description = "Page created", body = CreateTodoResponse),
        (status = 502, description = "The remote store failed", body = CreateTodoResponse)
    )
)]
pub async fn create_todo(
    State(state): State<ApiState>,
) -> (StatusCode, Json<CreateTodoResponse>) {
    let mut nav = NavigationList::new(state.repo.clone());
    let outcome = nav.create_blank().await;

    let route = match &outcome {
        Outcome::Created { route } => Some(route.clone()),
        _ => None,
    };

    let body = CreateTodoResponse {
        outcome: outcome.kind().to_string(),
        route,
        notices: notices(nav.drain_notices()),
        error: error_of(&outcome),
    };

    (status_of(&outcome), Json(body))
}
