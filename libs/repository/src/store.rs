use std::fmt;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Row-level access to a hosted table. Every call is a single round trip;
/// there is no retry and no timeout beyond what the transport imposes.
#[async_trait]
pub trait Store: Send + Sync + fmt::Debug {
    async fn select(&self, table: &str, filter: &Filter) -> StoreResponse;

    async fn insert(&self, table: &str, rows: Vec<Value>) -> StoreResponse;

    async fn update(
        &self,
        table: &str,
        patch: Value,
        filter: &Filter,
    ) -> StoreResponse;
}

/// Error body as returned by PostgREST.
#[derive(
    Debug, Default, PartialEq, Clone, Serialize, Deserialize, thiserror::Error,
)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct StoreResponse<T = Vec<Value>> {
    pub data: Option<T>,
    pub error: Option<StoreError>,
    pub status: u16,
}

impl<T> StoreResponse<T> {
    pub fn ok(status: u16, data: Option<T>) -> Self {
        Self {
            data,
            error: None,
            status,
        }
    }

    pub fn err(status: u16, error: StoreError) -> Self {
        Self {
            data: None,
            error: Some(error),
            status,
        }
    }
}

impl StoreResponse {
    /// Turns raw rows into typed rows. A row that does not decode turns the
    /// whole response into an error, keeping the status.
    pub fn decode<T: DeserializeOwned>(self) -> StoreResponse<Vec<T>> {
        let StoreResponse {
            data,
            error,
            status,
        } = self;

        if let Some(error) = error {
            return StoreResponse::err(status, error);
        }

        let Some(rows) = data else {
            return StoreResponse::ok(status, None);
        };

        match rows
            .into_iter()
            .map(serde_json::from_value::<T>)
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(rows) => StoreResponse::ok(status, Some(rows)),
            Err(e) => StoreResponse::err(
                status,
                StoreError::new(format!("failed to decode row: {}", e)),
            ),
        }
    }

    /// Like `decode`, but drops rows that do not decode.
    pub fn decode_lossy<T: DeserializeOwned>(self) -> StoreResponse<Vec<T>> {
        let StoreResponse {
            data,
            error,
            status,
        } = self;

        if let Some(error) = error {
            return StoreResponse::err(status, error);
        }

        let rows = data.map(|rows| {
            rows.into_iter()
                .filter_map(|row| {
                    let id = row.get("id").cloned();
                    serde_json::from_value::<T>(row)
                        .map_err(|e| {
                            warn!(
                                task = "decode row",
                                id = ?id,
                                err = e.to_string()
                            );
                        })
                        .ok()
                })
                .collect()
        });

        StoreResponse::ok(status, rows)
    }
}

/// Conjunction of equality conditions.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Filter {
    conditions: Vec<(String, String)>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(column: &str, value: impl ToString) -> Self {
        Self::all().and_eq(column, value)
    }

    pub fn and_eq(mut self, column: &str, value: impl ToString) -> Self {
        self.conditions.push((column.to_string(), value.to_string()));
        self
    }

    /// Query pairs in PostgREST syntax, e.g. `("id", "eq.42")`.
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.conditions
            .iter()
            .map(|(column, value)| (column.clone(), format!("eq.{}", value)))
            .collect()
    }

    pub fn matches(&self, row: &Value) -> bool {
        self.conditions.iter().all(|(column, expected)| {
            match row.get(column) {
                Some(Value::String(s)) => s == expected,
                Some(Value::Null) | None => expected == "null",
                Some(other) => other.to_string() == *expected,
            }
        })
    }
}
