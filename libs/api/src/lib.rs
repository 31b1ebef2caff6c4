use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use repository::{Repository, Store};
use toml::{map::Map, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

pub mod healthz;
pub mod landing;
pub mod page;
mod response;
pub mod todo;

pub use response::{ApiResponse, ErrorResp, NoticeResp};

pub enum ApiError {
    ClientError(String),
    ServerError(String),
}

#[derive(Clone, Debug)]
pub struct ApiState {
    repo: Repository,
    config: Config,
}

impl ApiState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            repo: Repository::new(store, &config.table),
            config,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub table: String,
    pub allowed_origins: Vec<HeaderValue>,
}

impl Config {
    pub fn from_toml(config: &Map<String, Value>) -> anyhow::Result<Self> {
        let table = util::get_str(config, "store", "table")?;

        let allowed_origins = config
            .get("api")
            .and_then(|api| api.get("allowed_origins"))
            .and_then(Value::as_array)
            .map(|origins| {
                origins
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|origin| {
                        origin.parse::<HeaderValue>().with_context(|| {
                            format!("failed to parse origin {}", origin)
                        })
                    })
                    .collect::<anyhow::Result<Vec<_>>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            table,
            allowed_origins,
        })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        landing::get_landing,
        todo::create_todo,
        todo::get_todos,
        page::get_demo_page,
        page::get_page,
        page::update_page,
        page::append_board,
        page::save_board,
    ),
    components(schemas(
        landing::LandingResponse,
        todo::request::GetTodosParam,
        todo::response::TodoItem,
        todo::response::GetTodosResponse,
        todo::response::CreateTodoResponse,
        page::request::SaveBoardRequest,
        page::request::UpdatePageRequest,
        page::response::Board,
        page::response::Page,
        page::response::PageResponse,
        page::response::DemoPageResponse,
        NoticeResp,
        ErrorResp,
    )),
    tags(
        (name = "board", description = "Page and board planning API")
    )
)]
struct ApiDoc;

pub async fn serve(
    store: Arc<dyn Store>,
    config_name: &str,
) -> anyhow::Result<Router> {
    info!(task = "start api serving", config = config_name);

    let config = Config::from_toml(&util::load_config(config_name)?)?;

    Ok(router(ApiState::new(store, config)))
}

pub fn router(state: ApiState) -> Router {
    let origins = AllowOrigin::list(state.config.allowed_origins.clone());

    // landing
    let landing_router = Router::new()
        .route("/", get(landing::get_landing).post(todo::create_todo))
        .with_state(state.clone());

    // pages
    let page_router = Router::new()
        .route("/", get(page::get_demo_page))
        .route("/:id", get(page::get_page).patch(page::update_page))
        .route("/:id/boards", post(page::append_board))
        .route("/:id/boards/:board_id", put(page::save_board))
        .fallback(response::get_404)
        .with_state(state.clone());

    // todos
    let todo_router = Router::new()
        .route("/", get(todo::get_todos))
        .fallback(response::get_404)
        .with_state(state.clone());

    Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .route("/healthz", get(healthz::get_health).with_state(state))
        .merge(landing_router)
        .nest("/create", page_router)
        .nest("/todos", todo_router)
        .layer(CorsLayer::new().allow_origin(origins))
        .fallback(response::get_404)
}

#[cfg(test)]
mod test {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use repository::{MemoryStore, StoreError};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    fn app(store: &Arc<MemoryStore>) -> Router {
        let config = Config {
            table: "todos".to_string(),
            allowed_origins: vec![],
        };
        router(ApiState::new(store.clone(), config))
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, value)
    }

    #[test]
    fn test_config_from_toml() {
        // Arrange
        let text = "[store]\ntable = \"todos\"\n[api]\nallowed_origins = [\"http://localhost:3000\"]\n";
        let config = toml::from_str::<Map<String, toml::Value>>(text).unwrap();

        // Act
        let config = Config::from_toml(&config).unwrap();

        // Assert
        assert_eq!(config.table, "todos");
        assert_eq!(config.allowed_origins.len(), 1);
    }

    #[test]
    fn test_config_requires_table() {
        // Arrange
        let config = toml::from_str::<Map<String, toml::Value>>("[api]\n").unwrap();

        // Act
        let config = Config::from_toml(&config);

        // Assert
        assert!(config.is_err());
    }

    #[tokio::test]
    async fn test_healthz() {
        // Arrange
        let store = Arc::new(MemoryStore::new());

        // Act
        let (status, body) = send(app(&store), "GET", "/healthz", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["table"], "todos");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        // Arrange
        let store = Arc::new(MemoryStore::new());

        // Act
        let (status, _) = send(app(&store), "GET", "/nope", None).await;

        // Assert
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_landing() {
        // Arrange
        let store = Arc::new(MemoryStore::new());

        // Act
        let (status, body) = send(app(&store), "GET", "/", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["create_route"], "/create");
        assert_eq!(body["steps"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_demo_page() {
        // Arrange
        let store = Arc::new(MemoryStore::new());

        // Act
        let (status, body) = send(app(&store), "GET", "/create", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["boards"].as_array().unwrap().len(), 1);
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_page() {
        // Arrange
        let store = Arc::new(MemoryStore::new());

        // Act
        let (status, body) =
            send(app(&store), "GET", "/create/42", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "loaded");
        assert_eq!(body["page"]["id"], 42);
        assert_eq!(body["page"]["title"], "");
        assert_eq!(body["page"]["boards"], json!([]));
        assert_eq!(body["page"]["saved"], false);
    }

    #[tokio::test]
    async fn test_get_page_with_invalid_id() {
        // Arrange
        let store = Arc::new(MemoryStore::new());

        // Act
        let (status, _) = send(app(&store), "GET", "/create/abc", None).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_append_board() {
        // Arrange
        let store = Arc::new(MemoryStore::new());

        // Act
        let (status, body) =
            send(app(&store), "POST", "/create/42/boards", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "saved");
        assert_eq!(body["error"], Value::Null);
        assert_eq!(body["page"]["boards"].as_array().unwrap().len(), 1);
        assert_eq!(body["page"]["progress"], "0/1 Complete");
        assert_eq!(body["notices"][0]["level"], "success");
        assert_eq!(store.rows("todos").await.len(), 1);
    }

    #[tokio::test]
    async fn test_append_board_store_failure() {
        // Arrange
        let store = Arc::new(MemoryStore::new());
        store.fail_next(StoreError::new("offline")).await;

        // Act
        let (status, body) =
            send(app(&store), "POST", "/create/42/boards", None).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["outcome"], "failed");
        assert_eq!(body["notices"][0]["level"], "error");
        assert_eq!(body["error"]["code"], "502-001");
        assert!(store.rows("todos").await.is_empty());
    }

    #[tokio::test]
    async fn test_save_board() {
        // Arrange
        let store = Arc::new(MemoryStore::new().with_rows(
            "todos",
            vec![json!({"id": 1, "content": [{"boardId": "a"}]})],
        ));
        let body = json!({"title": "plan", "content": "# Hello", "isCompleted": true});

        // Act
        let (status, body) =
            send(app(&store), "PUT", "/create/1/boards/a", Some(body)).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"]["boards"][0]["content"], "# Hello");
        assert_eq!(body["page"]["percent"], 100);
    }

    #[tokio::test]
    async fn test_save_board_without_content() {
        // Arrange
        let store = Arc::new(MemoryStore::new().with_rows(
            "todos",
            vec![json!({"id": 1, "content": [{"boardId": "a"}]})],
        ));
        let body = json!({"title": "plan"});

        // Act
        let (status, body) =
            send(app(&store), "PUT", "/create/1/boards/a", Some(body)).await;

        // Assert
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["outcome"], "rejected");
    }

    #[tokio::test]
    async fn test_update_page() {
        // Arrange
        let store = Arc::new(
            MemoryStore::new().with_rows("todos", vec![json!({"id": 1})]),
        );
        let body = json!({"title": "Sprint", "start_date": "2024-05-01", "end_date": "2024-05-14"});

        // Act
        let (status, body) =
            send(app(&store), "PATCH", "/create/1", Some(body)).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"]["title"], "Sprint");
        assert_eq!(body["page"]["end_date"], "2024-05-14");
    }

    #[tokio::test]
    async fn test_update_missing_page_is_pending() {
        // Arrange
        let store = Arc::new(MemoryStore::new());
        let body = json!({"title": "Sprint", "start_date": "2024-05-01", "end_date": "2024-05-14"});

        // Act
        let (status, body) =
            send(app(&store), "PATCH", "/create/42", Some(body)).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "pending");
        assert_eq!(body["page"]["title"], "Sprint");
        assert_eq!(body["page"]["start_date"], "2024-05-01");
        assert_eq!(body["page"]["saved"], false);
        assert!(store.rows("todos").await.is_empty());
    }

    #[tokio::test]
    async fn test_update_page_needs_fields() {
        // Arrange
        let store = Arc::new(MemoryStore::new());

        // Act
        let (status, _) =
            send(app(&store), "PATCH", "/create/1", Some(json!({}))).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_todos_store_failure_has_error_code() {
        // Arrange
        let store = Arc::new(MemoryStore::new());
        store.fail_next(StoreError::new("permission denied")).await;

        // Act
        let (status, body) = send(app(&store), "GET", "/todos", None).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["todos"], json!([]));
        assert_eq!(body["notices"][0]["message"], "permission denied");
        assert_eq!(body["error"]["code"], "502-001");
    }

    #[tokio::test]
    async fn test_create_todo_store_failure_has_error_code() {
        // Arrange
        let store = Arc::new(MemoryStore::new());
        store.fail_next(StoreError::new("offline")).await;

        // Act
        let (status, body) = send(app(&store), "POST", "/", None).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["route"], Value::Null);
        assert_eq!(body["error"]["code"], "502-001");
    }

    #[tokio::test]
    async fn test_create_and_list_todos() {
        // Arrange
        let store = Arc::new(MemoryStore::new());

        // Act
        let (created, body) = send(app(&store), "POST", "/", None).await;
        let (listed, list) = send(app(&store), "GET", "/todos", None).await;

        // Assert
        assert_eq!(created, StatusCode::CREATED);
        assert_eq!(body["route"], "/create/1");
        assert_eq!(listed, StatusCode::OK);
        assert_eq!(list["todos"].as_array().unwrap().len(), 1);
        assert_eq!(list["todos"][0]["marker"], "empty");
    }

    #[tokio::test]
    async fn test_search_todos() {
        // Arrange
        let store = Arc::new(MemoryStore::new().with_rows(
            "todos",
            vec![
                json!({"id": 1, "title": "Weekly Review"}),
                json!({"id": 2, "title": "Groceries"}),
            ],
        ));

        // Act
        let (status, body) =
            send(app(&store), "GET", "/todos?q=review", None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["todos"].as_array().unwrap().len(), 1);
        assert_eq!(body["todos"][0]["route"], "/create/1");
    }
}
