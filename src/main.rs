use std::sync::Arc;

use repository::{MemoryStore, PostgrestClient, Store};
use shuttle_runtime::{Error, SecretStore, Secrets};

#[shuttle_runtime::main]
async fn main(
    #[Secrets] secret_store: SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let Some(supabase_url) = secret_store.get("SUPABASE_URL") else {
        return Err(Error::BuildPanic(
            "SUPABASE_URL was not found".to_string(),
        ));
    };

    let store: Arc<dyn Store> = if supabase_url == "memory" {
        tracing::warn!(task = "select store", store = "memory");
        Arc::new(MemoryStore::new())
    } else {
        let Some(supabase_key) = secret_store.get("SUPABASE_KEY") else {
            return Err(Error::BuildPanic(
                "SUPABASE_KEY was not found".to_string(),
            ));
        };
        let client = PostgrestClient::new(&supabase_url, &supabase_key)
            .map_err(|e| Error::BuildPanic(e.to_string()))?;
        Arc::new(client)
    };

    let config = secret_store.get("CONFIG").unwrap_or_default();
    let config_name = format!("Config{}.toml", config);

    let router = api::serve(store, &config_name)
        .await
        .map_err(|e| Error::BuildPanic(e.to_string()))?;

    Ok(router.into())
}
