use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    RequestBuilder,
};
use serde_json::Value;
use tracing::{debug, error};

use crate::{
    response::{IntoResponse, Response},
    Filter, Store, StoreError, StoreResponse,
};

/// PostgREST client for a hosted project (`{base_url}/rest/v1/{table}`).
#[derive(Clone, Debug)]
pub struct PostgrestClient {
    base_url: String,
    client: reqwest::Client,
}

impl PostgrestClient {
    pub fn new(base_url: &str, api_key: &str) -> Response<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert(
            "apikey",
            HeaderValue::from_str(api_key)
                .into_response("failed to build apikey header")?,
        );
        headers.insert(
            "Authorization",
            HeaderValue::from_str(format!("Bearer {}", api_key).as_str())
                .into_response("failed to build authorization header")?,
        );

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()
            .into_response("failed to build http client")?;

        Ok(Self {
            base_url: format!("{}/rest/v1", base_url.trim_end_matches('/')),
            client,
        })
    }

    fn url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    async fn send(&self, request: RequestBuilder) -> Response<StoreResponse> {
        let response = request.send().await.into_response("failed to send")?;

        let status = response.status();
        let text = response.text().await.into_response("failed to get text")?;

        if !status.is_success() {
            let error = serde_json::from_str::<StoreError>(&text)
                .unwrap_or_else(|_| StoreError::new(text));
            return Ok(StoreResponse::err(status.as_u16(), error));
        }

        if text.trim().is_empty() {
            return Ok(StoreResponse::ok(status.as_u16(), None));
        }

        let rows = serde_json::from_str::<Vec<Value>>(&text)
            .into_response("failed to parse rows")?;

        Ok(StoreResponse::ok(status.as_u16(), Some(rows)))
    }

    // Transport failures carry no http status.
    fn settle(task: &str, result: Response<StoreResponse>) -> StoreResponse {
        match result {
            Ok(response) => {
                debug!(task, status = response.status);
                response
            }
            Err(e) => {
                error!(task, err = e.to_string());
                StoreResponse::err(0, StoreError::new(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl Store for PostgrestClient {
    async fn select(&self, table: &str, filter: &Filter) -> StoreResponse {
        let request = self
            .client
            .get(self.url(table))
            .query(&[("select", "*")])
            .query(&filter.to_query());

        Self::settle("select", self.send(request).await)
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> StoreResponse {
        let request = self
            .client
            .post(self.url(table))
            .header("Prefer", "return=representation")
            .json(&rows);

        Self::settle("insert", self.send(request).await)
    }

    async fn update(
        &self,
        table: &str,
        patch: Value,
        filter: &Filter,
    ) -> StoreResponse {
        let request = self
            .client
            .patch(self.url(table))
            .query(&filter.to_query())
            .header("Prefer", "return=minimal")
            .json(&patch);

        Self::settle("update", self.send(request).await)
    }
}
