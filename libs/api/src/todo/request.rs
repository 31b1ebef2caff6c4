use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema, IntoParams)]
pub struct GetTodosParam {
    /// Case-insensitive title filter
    pub q: Option<String>,
}
