use axum::{extract::State, Json};
use serde::Serialize;

use crate::ApiState;

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    table: String,
}

pub(super) async fn get_health(State(state): State<ApiState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        table: state.config.table.clone(),
    })
}
