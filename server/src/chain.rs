use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;

/// Metaplex token metadata program.
const TOKEN_METADATA_PROGRAM: Pubkey = pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Account discriminant of a `MetadataV1` account.
const METADATA_V1_KEY: u8 = 4;

const RPC_TIMEOUT: Duration = Duration::from_secs(15);

/// The two on-chain fields the lookup overlays onto the local record.
#[derive(Clone, Debug, PartialEq)]
pub struct OnchainMetadata {
    pub update_authority: String,
    /// Verified or unverified collection the token belongs to, if any.
    pub collection: Option<String>,
}

/// Best-effort read access to on-chain token metadata.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn nft_metadata(&self, mint: &Pubkey) -> anyhow::Result<OnchainMetadata>;
}

pub struct RpcChainReader {
    rpc: RpcClient,
}

impl RpcChainReader {
    pub fn new(rpc_url: &str) -> Self {
        Self {
            rpc: RpcClient::new_with_timeout(rpc_url.to_string(), RPC_TIMEOUT),
        }
    }
}

#[async_trait]
impl ChainReader for RpcChainReader {
    async fn nft_metadata(&self, mint: &Pubkey) -> anyhow::Result<OnchainMetadata> {
        let address = metadata_pda(mint);
        let data = self
            .rpc
            .get_account_data(&address)
            .await
            .with_context(|| format!("fetching metadata account {address}"))?;
        parse_metadata_account(&data)
    }
}

/// PDA of the Metaplex metadata account for a mint.
pub fn metadata_pda(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[
            b"metadata",
            TOKEN_METADATA_PROGRAM.as_ref(),
            mint.as_ref(),
        ],
        &TOKEN_METADATA_PROGRAM,
    )
    .0
}

/// Walk the borsh-encoded `Metadata` account far enough to pull out the
/// update authority and the optional collection key. Field order:
/// key, update_authority, mint, name, symbol, uri, seller_fee_basis_points,
/// creators, primary_sale_happened, is_mutable, edition_nonce,
/// token_standard, collection.
pub fn parse_metadata_account(data: &[u8]) -> anyhow::Result<OnchainMetadata> {
    let mut cursor = Cursor { data, pos: 0 };

    let key = cursor.u8()?;
    if key != METADATA_V1_KEY {
        bail!("not a metadata account (key = {key})");
    }

    let update_authority = cursor.pubkey()?;
    cursor.pubkey()?; // mint
    cursor.string()?; // name
    cursor.string()?; // symbol
    cursor.string()?; // uri
    cursor.skip(2)?; // seller_fee_basis_points

    // creators: Option<Vec<{ address, verified, share }>>
    if cursor.u8()? == 1 {
        let count = cursor.u32()? as usize;
        cursor.skip(count * 34)?;
    }

    cursor.skip(2)?; // primary_sale_happened, is_mutable
    if cursor.u8()? == 1 {
        cursor.skip(1)?; // edition_nonce
    }
    if cursor.u8()? == 1 {
        cursor.skip(1)?; // token_standard
    }

    let collection = if cursor.u8()? == 1 {
        cursor.skip(1)?; // verified
        Some(cursor.pubkey()?.to_string())
    } else {
        None
    };

    Ok(OnchainMetadata {
        update_authority: update_authority.to_string(),
        collection,
    })
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn take(&mut self, len: usize) -> anyhow::Result<&[u8]> {
        let end = self.pos.checked_add(len).context("metadata account truncated")?;
        let slice = self
            .data
            .get(self.pos..end)
            .context("metadata account truncated")?;
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> anyhow::Result<()> {
        self.take(len).map(|_| ())
    }

    fn u8(&mut self) -> anyhow::Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> anyhow::Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    fn pubkey(&mut self) -> anyhow::Result<Pubkey> {
        let bytes: [u8; 32] = self.take(32)?.try_into().unwrap();
        Ok(Pubkey::new_from_array(bytes))
    }

    /// Borsh string: u32 little-endian length followed by the bytes.
    fn string(&mut self) -> anyhow::Result<()> {
        let len = self.u32()? as usize;
        self.skip(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_string(buffer: &mut Vec<u8>, value: &str) {
        buffer.extend_from_slice(&(value.len() as u32).to_le_bytes());
        buffer.extend_from_slice(value.as_bytes());
    }

    fn sample_account(collection: Option<Pubkey>) -> (Vec<u8>, Pubkey) {
        let authority = Pubkey::new_unique();
        let mut data = vec![METADATA_V1_KEY];
        data.extend_from_slice(authority.as_ref());
        data.extend_from_slice(Pubkey::new_unique().as_ref()); // mint
        push_string(&mut data, "NeuroMatrix Pass");
        push_string(&mut data, "NMP");
        push_string(&mut data, "https://neuromatrix.dev/nft/metadata/nft-1.json");
        data.extend_from_slice(&500u16.to_le_bytes());
        // one creator
        data.push(1);
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(Pubkey::new_unique().as_ref());
        data.push(0); // verified
        data.push(100); // share
        data.push(0); // primary_sale_happened
        data.push(1); // is_mutable
        data.push(1); // edition_nonce tag
        data.push(252);
        data.push(1); // token_standard tag
        data.push(0);
        match collection {
            Some(key) => {
                data.push(1);
                data.push(1); // verified
                data.extend_from_slice(key.as_ref());
            }
            None => data.push(0),
        }
        (data, authority)
    }

    #[test]
    fn parses_authority_and_collection() {
        let collection = Pubkey::new_unique();
        let (data, authority) = sample_account(Some(collection));
        let parsed = parse_metadata_account(&data).unwrap();
        assert_eq!(parsed.update_authority, authority.to_string());
        assert_eq!(parsed.collection, Some(collection.to_string()));
    }

    #[test]
    fn parses_account_without_collection() {
        let (data, authority) = sample_account(None);
        let parsed = parse_metadata_account(&data).unwrap();
        assert_eq!(parsed.update_authority, authority.to_string());
        assert_eq!(parsed.collection, None);
    }

    #[test]
    fn rejects_foreign_accounts() {
        assert!(parse_metadata_account(&[9, 1, 2, 3]).is_err());
        assert!(parse_metadata_account(&[]).is_err());
    }

    #[test]
    fn pda_is_stable_for_a_mint() {
        let mint = Pubkey::new_unique();
        assert_eq!(metadata_pda(&mint), metadata_pda(&mint));
    }
}
