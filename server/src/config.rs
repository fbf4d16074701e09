use std::net::SocketAddr;
use std::str::FromStr;

use neuromatrix_api::prelude::{GatewayError, GatewayResult};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};

/// Gateway configuration, read from the environment once at startup.
/// A missing required variable fails fast with `GatewayError::Configuration`
/// naming the variable.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base58 signing credential handed to the minting agent.
    pub signer_key: String,

    /// Solana RPC endpoint, used for on-chain lookups and forwarded to
    /// the minting agent.
    pub rpc_url: String,

    /// Forwarded to the minting agent, which uses it internally. Not
    /// consumed by this service.
    pub openai_api_key: String,

    /// The collection every pass is minted into.
    pub collection_address: Pubkey,

    /// Public base URL the metadata image/uri fields point at.
    pub base_url: String,

    /// Base URL of the external minting agent service.
    pub agent_url: String,

    /// Supabase project URL hosting the counter and task tables.
    pub supabase_url: String,

    /// Supabase anon key for the counter and task tables.
    pub supabase_anon_key: String,

    /// Royalty recipient and default update authority. Defaults to the
    /// pubkey of the signing credential.
    pub creator_address: String,

    pub listen_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> GatewayResult<Self> {
        let signer_key = required("SOLANA_PRIVATE_KEY")?;
        let rpc_url = required("RPC_URL")?;
        let openai_api_key = required("OPENAI_API_KEY")?;

        let collection_address = Pubkey::from_str(&required("NFT_COLLECTION_ADDRESS")?)
            .map_err(|_| GatewayError::Configuration("NFT_COLLECTION_ADDRESS"))?;

        let domain = required("PUBLIC_DOMAIN")?;
        let base_url = format!("https://{domain}");

        let agent_url = required("AGENT_URL")?;
        let supabase_url = required("SUPABASE_URL")?;
        let supabase_anon_key = required("SUPABASE_ANON_KEY")?;

        let creator_address = match std::env::var("CREATOR_ADDRESS") {
            Ok(address) => {
                Pubkey::from_str(&address)
                    .map_err(|_| GatewayError::Configuration("CREATOR_ADDRESS"))?;
                address
            }
            Err(_) => signer_pubkey(&signer_key)?.to_string(),
        };

        let listen_addr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|_| GatewayError::Configuration("LISTEN_ADDR"))?;

        Ok(Self {
            signer_key,
            rpc_url,
            openai_api_key,
            collection_address,
            base_url,
            agent_url,
            supabase_url,
            supabase_anon_key,
            creator_address,
            listen_addr,
        })
    }
}

fn required(name: &'static str) -> GatewayResult<String> {
    std::env::var(name).map_err(|_| GatewayError::Configuration(name))
}

/// Fixture for unit tests; no real endpoints or credentials.
#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        signer_key: "test-signer-key".to_string(),
        rpc_url: "https://api.devnet.solana.com".to_string(),
        openai_api_key: "test-openai-key".to_string(),
        collection_address: Pubkey::new_unique(),
        base_url: "https://neuromatrix.dev".to_string(),
        agent_url: "http://127.0.0.1:9999".to_string(),
        supabase_url: "http://127.0.0.1:9998".to_string(),
        supabase_anon_key: "anon".to_string(),
        creator_address: "pqspJ298ryBjazPAr95J9sULCVpZe3HbZTWkbC1zrkS".to_string(),
        listen_addr: "127.0.0.1:0".parse().unwrap(),
    }
}

/// Derive the public key of a base58-encoded 64-byte keypair.
fn signer_pubkey(signer_key: &str) -> GatewayResult<Pubkey> {
    let bytes = bs58::decode(signer_key)
        .into_vec()
        .map_err(|_| GatewayError::Configuration("SOLANA_PRIVATE_KEY"))?;
    let keypair =
        Keypair::from_bytes(&bytes).map_err(|_| GatewayError::Configuration("SOLANA_PRIVATE_KEY"))?;
    Ok(keypair.pubkey())
}
