use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use neuromatrix_api::prelude::Creator;
use serde::{Deserialize, Serialize};

/// One mint order handed to the external agent.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintOrder {
    /// The collection the new token is minted into.
    pub collection: String,
    pub name: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub creators: Vec<Creator>,
    /// Wallet receiving the token.
    pub recipient: String,
    /// RPC endpoint the agent should submit through.
    pub rpc_url: String,
}

/// The external minting agent, treated as an opaque service. The single
/// operation mints one NFT and returns its mint address.
#[async_trait]
pub trait MintingAgent: Send + Sync {
    async fn mint_nft(&self, order: MintOrder) -> anyhow::Result<String>;
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the agent-kit sidecar service.
pub struct AgentKitClient {
    client: reqwest::Client,
    agent_url: String,
    signer_key: String,
    openai_api_key: String,
}

#[derive(Deserialize)]
struct MintReply {
    mint: String,
}

impl AgentKitClient {
    pub fn new(agent_url: &str, signer_key: &str, openai_api_key: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building minting agent http client")?;
        Ok(Self {
            client,
            agent_url: agent_url.trim_end_matches('/').to_string(),
            signer_key: signer_key.to_string(),
            openai_api_key: openai_api_key.to_string(),
        })
    }
}

#[async_trait]
impl MintingAgent for AgentKitClient {
    async fn mint_nft(&self, order: MintOrder) -> anyhow::Result<String> {
        let response = self
            .client
            .post(format!("{}/v1/mint", self.agent_url))
            .bearer_auth(&self.signer_key)
            .header("x-openai-api-key", &self.openai_api_key)
            .json(&order)
            .send()
            .await
            .context("minting agent unreachable")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("minting agent returned {status}: {body}");
        }

        let reply: MintReply = response
            .json()
            .await
            .context("malformed minting agent reply")?;
        Ok(reply.mint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_order_serializes_camel_case() {
        let order = MintOrder {
            collection: "col".to_string(),
            name: "NeuroMatrix Pass".to_string(),
            uri: "https://neuromatrix.dev/nft/metadata/nft-1.json".to_string(),
            seller_fee_basis_points: 500,
            creators: vec![Creator {
                address: "creator".to_string(),
                share: 100,
            }],
            recipient: "wallet".to_string(),
            rpc_url: "https://api.devnet.solana.com".to_string(),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["sellerFeeBasisPoints"], 500);
        assert_eq!(json["rpcUrl"], "https://api.devnet.solana.com");
        assert_eq!(json["creators"][0]["share"], 100);
    }
}
