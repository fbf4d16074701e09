use std::str::FromStr;

use neuromatrix_api::metadata;
use neuromatrix_api::prelude::*;
use solana_sdk::pubkey::Pubkey;

use crate::chain::ChainReader;
use crate::config::Config;

/// Resolve the metadata view for a minted pass.
///
/// Two-phase: the local phase always succeeds and seeds the view from a
/// freshly generated record, the configured update authority, and any
/// caller overrides. The remote phase overlays the on-chain update
/// authority and collection when the metadata account can be read; its
/// failure is logged and swallowed. The only error this returns is a
/// malformed mint address.
pub async fn lookup_pass(
    chain: &dyn ChainReader,
    config: &Config,
    mint_address: &str,
    overrides: MetadataOverrides,
) -> GatewayResult<MetadataView> {
    let mint = Pubkey::from_str(mint_address)
        .map_err(|_| GatewayError::InvalidAddress(mint_address.to_string()))?;

    let metadata = metadata::generate(&config.creator_address, &config.base_url);
    let mut view = MetadataView::from_local(&metadata, &mint.to_string(), &config.creator_address);
    view.apply(overrides);

    // On-chain truth wins over both local defaults and overrides.
    match chain.nft_metadata(&mint).await {
        Ok(onchain) => {
            view.update_authority = onchain.update_authority;
            if let Some(collection) = onchain.collection {
                view.collection = collection;
            }
        }
        Err(err) => {
            tracing::warn!(mint = %mint, error = %err, "on-chain metadata unavailable, serving local view");
        }
    }

    Ok(view)
}
