use std::sync::Arc;

use anyhow::Context;

use neuromatrix_server::agent::AgentKitClient;
use neuromatrix_server::chain::RpcChainReader;
use neuromatrix_server::config::Config;
use neuromatrix_server::routes::{router, AppState};
use neuromatrix_server::store::SupabaseStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neuromatrix_server=info,info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let store = SupabaseStore::new(&config.supabase_url, &config.supabase_anon_key)?;
    let agent = AgentKitClient::new(&config.agent_url, &config.signer_key, &config.openai_api_key)?;
    let chain = RpcChainReader::new(&config.rpc_url);

    let listen_addr = config.listen_addr;
    let state = AppState {
        config: Arc::new(config),
        store: Arc::new(store),
        agent: Arc::new(agent),
        chain: Arc::new(chain),
    };

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("binding {listen_addr}"))?;
    tracing::info!(%listen_addr, "neuromatrix gateway listening");
    axum::serve(listener, router(state)).await?;

    Ok(())
}
