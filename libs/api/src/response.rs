use axum::{http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::{Map, Value};
use sync_board::{Notice, Outcome};
use tracing::error;
use utoipa::ToSchema;

use crate::ApiError;

const ERROR_CODES: &str = include_str!("error-code.json");
const STORE_FAILED: &str = "502-001";

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, message) = match self {
            ApiError::ClientError(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::ServerError(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status_code, message).into_response()
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;

impl ApiError {
    /// Builds an error from a code in `error-code.json`. Codes starting
    /// with `4` are client errors.
    pub fn from_code(error_code: &str) -> Self {
        let message = error_message(error_code);

        match error_code.as_bytes().first() {
            Some(&b'4') => ApiError::ClientError(message),
            _ => ApiError::ServerError(message),
        }
    }
}

pub trait IntoApiResponse<T> {
    fn into_response(self, error_code: &str) -> ApiResponse<T>;
}

impl<T> IntoApiResponse<T> for Option<T> {
    fn into_response(self, error_code: &str) -> ApiResponse<T> {
        self.ok_or_else(|| ApiError::from_code(error_code))
    }
}

fn error_message(error_code: &str) -> String {
    let parsed = serde_json::from_str::<Map<String, Value>>(ERROR_CODES);
    let errors = match parsed {
        Ok(errors) => errors,
        Err(e) => {
            error!(task = "read error codes", err = e.to_string());
            return error_code.to_string();
        }
    };

    errors
        .get(error_code)
        .and_then(Value::as_str)
        .unwrap_or(error_code)
        .to_string()
}

/// Toast shown next to the response.
#[derive(Serialize, ToSchema)]
pub struct NoticeResp {
    /// `success` or `error`
    pub level: String,
    pub message: String,
}

impl From<Notice> for NoticeResp {
    fn from(notice: Notice) -> Self {
        Self {
            level: notice.level.to_string(),
            message: notice.message,
        }
    }
}

/// Error code attached to a response whose store call failed.
#[derive(Serialize, ToSchema)]
pub struct ErrorResp {
    pub code: String,
    pub message: String,
}

impl ErrorResp {
    fn from_code(error_code: &str) -> Self {
        Self {
            code: error_code.to_string(),
            message: error_message(error_code),
        }
    }
}

pub(crate) fn error_of(outcome: &Outcome) -> Option<ErrorResp> {
    match outcome {
        Outcome::Failed => Some(ErrorResp::from_code(STORE_FAILED)),
        _ => None,
    }
}

pub(crate) fn notices(notices: Vec<Notice>) -> Vec<NoticeResp> {
    notices.into_iter().map(NoticeResp::from).collect()
}

pub(crate) fn status_of(outcome: &Outcome) -> StatusCode {
    match outcome {
        Outcome::Loaded
        | Outcome::Saved
        | Outcome::Pending
        | Outcome::Ignored { .. } => StatusCode::OK,
        Outcome::Created { .. } => StatusCode::CREATED,
        Outcome::Failed => StatusCode::BAD_GATEWAY,
        Outcome::Rejected => StatusCode::UNPROCESSABLE_ENTITY,
        Outcome::Unloaded => StatusCode::CONFLICT,
    }
}

pub(crate) async fn get_404() -> StatusCode {
    StatusCode::NOT_FOUND
}
