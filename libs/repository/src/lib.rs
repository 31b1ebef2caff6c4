use std::sync::Arc;

pub mod client;
pub mod memory;
mod response;
pub mod store;
pub mod todo;

pub use client::PostgrestClient;
pub use memory::MemoryStore;
pub use store::{Filter, Store, StoreError, StoreResponse};
use todo::TodoRepository;

#[derive(Clone, Debug)]
pub struct Repository {
    pub todo: TodoRepository,
}

impl Repository {
    pub fn new(store: Arc<dyn Store>, table: &str) -> Self {
        Self {
            todo: TodoRepository::new(store, table),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("in reqwest crate: {}: {}", message, source)]
    InReqwest {
        message: String,
        source: reqwest::Error,
    },

    #[error("in serde_json crate: {}: {}", message, source)]
    InSerdeJson {
        message: String,
        source: serde_json::Error,
    },

    #[error("invalid header value: {}: {}", message, source)]
    InvalidHeader {
        message: String,
        source: reqwest::header::InvalidHeaderValue,
    },
}
