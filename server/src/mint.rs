use std::str::FromStr;

use neuromatrix_api::metadata;
use neuromatrix_api::prelude::*;
use solana_sdk::pubkey::Pubkey;

use crate::agent::{MintOrder, MintingAgent};
use crate::config::Config;

/// Mint one pass into the configured collection for `recipient`.
///
/// The recipient must be a valid base58 pubkey; that is checked before
/// anything leaves the process. Every downstream failure surfaces as
/// `MintFailed` with the cause attached, and nothing is retried: the
/// agent call is not idempotent and a blind retry could double-mint.
/// Returns the receipt together with the metadata record the order was
/// built from.
pub async fn mint_pass(
    agent: &dyn MintingAgent,
    config: &Config,
    recipient: &str,
) -> GatewayResult<(MintReceipt, NftMetadata)> {
    let recipient = Pubkey::from_str(recipient)
        .map_err(|_| GatewayError::InvalidAddress(recipient.to_string()))?;

    let metadata = metadata::generate(&config.creator_address, &config.base_url);

    let order = MintOrder {
        collection: config.collection_address.to_string(),
        name: metadata.name.clone(),
        uri: metadata.uri.clone(),
        seller_fee_basis_points: metadata.seller_fee_basis_points,
        creators: metadata.properties.creators.clone(),
        recipient: recipient.to_string(),
        rpc_url: config.rpc_url.clone(),
    };

    let mint_address = agent
        .mint_nft(order)
        .await
        .map_err(GatewayError::MintFailed)?;

    Ok((
        MintReceipt {
            mint_address,
            recipient: recipient.to_string(),
        },
        metadata,
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::config::test_config;

    const RECIPIENT: &str = "pqspJ298ryBjazPAr95J9sULCVpZe3HbZTWkbC1zrkS";

    #[derive(Default)]
    struct RecordingAgent {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl MintingAgent for RecordingAgent {
        async fn mint_nft(&self, order: MintOrder) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("agent exploded");
            }
            assert_eq!(order.name, "NeuroMatrix Pass");
            assert_eq!(order.seller_fee_basis_points, 500);
            Ok("HNWhK5f8RMWBqcA7mXJPaxdTPGrha3rrqUrri7HSKb3T".to_string())
        }
    }

    #[tokio::test]
    async fn invalid_recipient_fails_before_any_agent_call() {
        let agent = RecordingAgent::default();
        let err = mint_pass(&agent, &test_config(), "not-a-pubkey")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidAddress(_)));
        assert_eq!(agent.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_mint_returns_receipt_and_record() {
        let agent = RecordingAgent::default();
        let (receipt, metadata) = mint_pass(&agent, &test_config(), RECIPIENT).await.unwrap();
        assert_eq!(receipt.recipient, RECIPIENT);
        assert_eq!(
            receipt.mint_address,
            "HNWhK5f8RMWBqcA7mXJPaxdTPGrha3rrqUrri7HSKb3T"
        );
        assert_eq!(metadata.creator_share_total(), 100);
        assert_eq!(agent.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn agent_failure_surfaces_as_mint_failed() {
        let agent = RecordingAgent {
            fail: true,
            ..Default::default()
        };
        let err = mint_pass(&agent, &test_config(), RECIPIENT).await.unwrap_err();
        assert!(matches!(err, GatewayError::MintFailed(_)));
        assert_eq!(agent.calls.load(Ordering::SeqCst), 1);
    }
}
