use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};

use api::serve;
use repository::{MemoryStore, PostgrestClient, Store};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Local entrypoint reading `Secrets.toml`. Set `SUPABASE_URL = "memory"`
/// to run against an in-process table.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let secrets = util::load_env()?;
    let supabase_url = util::get_secret(&secrets, "SUPABASE_URL")?;

    let store: Arc<dyn Store> = if supabase_url == "memory" {
        info!(task = "select store", store = "memory");
        Arc::new(MemoryStore::new())
    } else {
        let supabase_key = util::get_secret(&secrets, "SUPABASE_KEY")?;
        Arc::new(PostgrestClient::new(&supabase_url, &supabase_key)?)
    };

    let config = util::get_secret(&secrets, "CONFIG").unwrap_or_default();
    let config_name = &format!("Config{}.toml", config);

    let router = serve(store, config_name).await?;

    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8000));
    let listener = TcpListener::bind(&address).await?;
    info!(task = "listen", address = %address);

    Ok(axum::serve(listener, router).await?)
}
