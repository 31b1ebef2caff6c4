use std::sync::Arc;

use entity::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{Filter, Store, StoreError, StoreResponse};

#[derive(Clone, Debug)]
pub struct TodoRepository {
    store: Arc<dyn Store>,
    table: String,
}

impl TodoRepository {
    pub fn new(store: Arc<dyn Store>, table: &str) -> Self {
        Self {
            store,
            table: table.to_string(),
        }
    }
}

impl TodoRepository {
    /// Rows that do not decode are left out of the listing.
    pub async fn find_all(&self) -> StoreResponse<Vec<TodoEntity>> {
        debug!(task = "select todos", table = %self.table);

        self.store
            .select(&self.table, &Filter::all())
            .await
            .decode_lossy()
    }

    pub async fn find_by_id(&self, id: i64) -> StoreResponse<Vec<TodoEntity>> {
        debug!(task = "select todo", table = %self.table, id);

        self.store
            .select(&self.table, &Filter::eq("id", id))
            .await
            .decode()
    }

    pub async fn insert(&self, todo: &NewTodo) -> StoreResponse<Vec<TodoEntity>> {
        debug!(task = "insert todo", table = %self.table, id = ?todo.id);

        let row = match to_row(todo) {
            Ok(row) => row,
            Err(response) => return response,
        };

        self.store.insert(&self.table, vec![row]).await.decode()
    }

    pub async fn update(
        &self,
        id: i64,
        patch: &TodoPatch,
    ) -> StoreResponse<Vec<TodoEntity>> {
        debug!(task = "update todo", table = %self.table, id);

        let patch = match to_row(patch) {
            Ok(patch) => patch,
            Err(response) => return response,
        };

        self.store
            .update(&self.table, patch, &Filter::eq("id", id))
            .await
            .decode()
    }
}

fn to_row<T: Serialize, R>(value: &T) -> Result<Value, StoreResponse<R>> {
    serde_json::to_value(value).map_err(|e| {
        StoreResponse::err(
            0,
            StoreError::new(format!("failed to serialize row: {}", e)),
        )
    })
}
