use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::{Filter, Store, StoreError, StoreResponse};

/// In-process table store with the status codes of the hosted service:
/// 200 on select, 201 on insert, 204 on update (also when nothing matched).
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<String, Vec<Value>>,
    planned: VecDeque<Planned>,
    calls: Vec<Call>,
}

#[derive(Debug)]
enum Planned {
    Error(StoreError),
    Status(u16),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Call {
    Select {
        table: String,
        filter: Filter,
    },
    Insert {
        table: String,
        rows: Vec<Value>,
    },
    Update {
        table: String,
        patch: Value,
        filter: Filter,
    },
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, table: &str, rows: Vec<Value>) -> Self {
        self.inner
            .get_mut()
            .tables
            .entry(table.to_string())
            .or_default()
            .extend(rows);
        self
    }

    /// The next call fails with `error` and leaves the tables untouched.
    pub async fn fail_next(&self, error: StoreError) {
        self.inner
            .lock()
            .await
            .planned
            .push_back(Planned::Error(error));
    }

    /// The next call answers with a bare `status` and does nothing.
    pub async fn respond_next_with_status(&self, status: u16) {
        self.inner
            .lock()
            .await
            .planned
            .push_back(Planned::Status(status));
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.inner.lock().await.calls.clone()
    }

    pub async fn rows(&self, table: &str) -> Vec<Value> {
        self.inner
            .lock()
            .await
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

impl Inner {
    fn planned(&mut self) -> Option<StoreResponse> {
        match self.planned.pop_front()? {
            Planned::Error(error) => Some(StoreResponse::err(500, error)),
            Planned::Status(status) => Some(StoreResponse::ok(status, None)),
        }
    }

    fn insert(&mut self, table: &str, rows: Vec<Value>) -> StoreResponse {
        let existing = self.tables.entry(table.to_string()).or_default();
        let mut next_id = existing
            .iter()
            .filter_map(|row| row.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0)
            + 1;

        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            let Value::Object(mut row) = row else {
                return StoreResponse::err(
                    400,
                    StoreError::new("row is not an object").with_code("PGRST102"),
                );
            };

            let id = match row.get("id") {
                None => None,
                Some(id) => match id.as_i64() {
                    Some(id) => Some(id),
                    None => {
                        return StoreResponse::err(
                            400,
                            StoreError::new(format!("invalid id {}", id))
                                .with_code("PGRST102"),
                        );
                    }
                },
            };

            match id {
                Some(id) => {
                    let taken = existing
                        .iter()
                        .chain(inserted.iter())
                        .any(|r: &Value| {
                            r.get("id").and_then(Value::as_i64) == Some(id)
                        });
                    if taken {
                        return StoreResponse::err(
                            409,
                            StoreError::new(format!(
                                "duplicate key value violates unique constraint \"{}_pkey\"",
                                table
                            ))
                            .with_code("23505"),
                        );
                    }
                    next_id = next_id.max(id + 1);
                }
                None => {
                    row.insert("id".to_string(), Value::from(next_id));
                    next_id += 1;
                }
            }

            row.entry("created_at")
                .or_insert_with(|| Value::from(Utc::now().to_rfc3339()));

            inserted.push(Value::Object(row));
        }

        existing.extend(inserted.iter().cloned());

        StoreResponse::ok(201, Some(inserted))
    }

    fn update(
        &mut self,
        table: &str,
        patch: Value,
        filter: &Filter,
    ) -> StoreResponse {
        let Value::Object(patch) = patch else {
            return StoreResponse::err(
                400,
                StoreError::new("patch is not an object").with_code("PGRST102"),
            );
        };

        if let Some(rows) = self.tables.get_mut(table) {
            rows.iter_mut()
                .filter(|row| filter.matches(row))
                .filter_map(Value::as_object_mut)
                .for_each(|row| merge(row, &patch));
        }

        StoreResponse::ok(204, None)
    }
}

fn merge(row: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        row.insert(key.clone(), value.clone());
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn select(&self, table: &str, filter: &Filter) -> StoreResponse {
        let mut inner = self.inner.lock().await;
        inner.calls.push(Call::Select {
            table: table.to_string(),
            filter: filter.clone(),
        });

        if let Some(response) = inner.planned() {
            return response;
        }

        let rows: Vec<Value> = inner
            .tables
            .get(table)
            .map(|rows| {
                rows.iter().filter(|row| filter.matches(row)).cloned().collect()
            })
            .unwrap_or_default();

        StoreResponse::ok(200, Some(rows))
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> StoreResponse {
        let mut inner = self.inner.lock().await;
        inner.calls.push(Call::Insert {
            table: table.to_string(),
            rows: rows.clone(),
        });

        if let Some(response) = inner.planned() {
            return response;
        }

        inner.insert(table, rows)
    }

    async fn update(
        &self,
        table: &str,
        patch: Value,
        filter: &Filter,
    ) -> StoreResponse {
        let mut inner = self.inner.lock().await;
        inner.calls.push(Call::Update {
            table: table.to_string(),
            patch: patch.clone(),
            filter: filter.clone(),
        });

        if let Some(response) = inner.planned() {
            return response;
        }

        inner.update(table, patch, filter)
    }
}
