use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Off-chain NFT metadata record, shaped after the Metaplex token
/// metadata JSON convention.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,

    /// Secondary-sale royalty, 0..=10000.
    pub seller_fee_basis_points: u16,

    /// URI of the pass artwork.
    pub image: String,

    /// Public site of the campaign.
    pub external_url: String,

    /// Logical URI of this record's own JSON document, unique per
    /// generation call (timestamp-derived filename). Advisory only: no
    /// document is ever written at this path.
    pub uri: String,

    pub attributes: Vec<Attribute>,
    pub properties: Properties,
    pub collection: CollectionInfo,
}

/// A single display trait of the pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub files: Vec<FileSpec>,
    pub category: String,
    pub creators: Vec<Creator>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileSpec {
    pub uri: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// A royalty recipient. Shares across all creators must sum to 100.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub address: String,
    pub share: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub family: String,
}

impl NftMetadata {
    /// Sum of creator royalty shares. Valid records total exactly 100.
    pub fn creator_share_total(&self) -> u32 {
        self.properties
            .creators
            .iter()
            .map(|c| c.share as u32)
            .sum()
    }
}

/// Build the metadata record for a freshly minted pass.
///
/// Pure except for reading the clock: all fields are constant apart from
/// `uri`, whose filename carries the current unix-millisecond timestamp.
/// Two calls in the same millisecond may therefore collide on `uri`;
/// nothing depends on them not doing so.
pub fn generate(creator_address: &str, base_url: &str) -> NftMetadata {
    generate_at(creator_address, base_url, unix_millis())
}

/// Timestamp-pinned variant of [`generate`].
pub fn generate_at(creator_address: &str, base_url: &str, timestamp_millis: u128) -> NftMetadata {
    let image = format!("{base_url}/{PASS_IMAGE_FILENAME}");
    let uri = format!("{base_url}/{METADATA_PATH}/nft-{timestamp_millis}.json");

    NftMetadata {
        name: PASS_NAME.to_string(),
        symbol: PASS_SYMBOL.to_string(),
        description: PASS_DESCRIPTION.to_string(),
        seller_fee_basis_points: SELLER_FEE_BASIS_POINTS,
        image: image.clone(),
        external_url: base_url.to_string(),
        uri,
        attributes: vec![
            attribute("Series", "NeuroMatrix Pass"),
            attribute("Matrix Code Style", "Green Rain"),
            attribute("AI Artwork Level", "Ultra"),
            attribute("Background", "Holographic Tech"),
            attribute("Rarity", "Rare"),
        ],
        properties: Properties {
            files: vec![FileSpec {
                uri: image,
                mime_type: "image/jpeg".to_string(),
            }],
            category: "image".to_string(),
            creators: vec![Creator {
                address: creator_address.to_string(),
                share: 100,
            }],
        },
        collection: CollectionInfo {
            name: COLLECTION_NAME.to_string(),
            family: COLLECTION_FAMILY.to_string(),
        },
    }
}

fn attribute(trait_type: &str, value: &str) -> Attribute {
    Attribute {
        trait_type: trait_type.to_string(),
        value: value.to_string(),
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATOR: &str = "pqspJ298ryBjazPAr95J9sULCVpZe3HbZTWkbC1zrkS";
    const BASE_URL: &str = "https://neuromatrix.dev";

    #[test]
    fn record_has_five_attributes_and_full_creator_share() {
        let metadata = generate(CREATOR, BASE_URL);
        assert_eq!(metadata.attributes.len(), 5);
        assert_eq!(metadata.creator_share_total(), 100);
        assert_eq!(metadata.properties.creators[0].address, CREATOR);
        assert_eq!(metadata.seller_fee_basis_points, 500);
    }

    #[test]
    fn uri_is_derived_from_timestamp() {
        let metadata = generate_at(CREATOR, BASE_URL, 1_700_000_000_000);
        assert_eq!(
            metadata.uri,
            "https://neuromatrix.dev/nft/metadata/nft-1700000000000.json"
        );
    }

    #[test]
    fn same_millisecond_calls_agree_on_everything() {
        // Calls within the same millisecond may share a uri. The record
        // is otherwise constant, so pinned-timestamp calls are equal.
        let a = generate_at(CREATOR, BASE_URL, 42);
        let b = generate_at(CREATOR, BASE_URL, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn consecutive_calls_are_constant_apart_from_uri() {
        let mut a = generate_at(CREATOR, BASE_URL, 1);
        let b = generate_at(CREATOR, BASE_URL, 2);
        assert_ne!(a.uri, b.uri);
        a.uri = b.uri.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn serializes_with_metaplex_field_names() {
        let metadata = generate_at(CREATOR, BASE_URL, 7);
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["seller_fee_basis_points"], 500);
        assert_eq!(json["properties"]["files"][0]["type"], "image/jpeg");
        assert_eq!(json["collection"]["family"], "NeuroMatrix");
    }
}
