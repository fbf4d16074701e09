use serde::{Deserialize, Serialize};

use crate::metadata::{Attribute, NftMetadata};

/// The singleton global attempt counter.
///
/// Lives in the external store under the fixed id [`COUNTER_ID`]. The
/// count is best-effort: increments are read-then-write with no locking,
/// so concurrent callers can lose updates. Good enough for a marketing
/// tally, not for accounting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlobalCounter {
    pub id: String,
    pub attempts: u64,
    pub updated_at: String,
}

/// Well-known id of the single `global_counter` row.
pub const COUNTER_ID: &str = "global";

/// A riddle task published to players. Only the newest row is ever read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub content: String,
    pub created_at: String,
}

/// Outcome of a successful mint. Ephemeral: the ledger is the chain's.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MintReceipt {
    pub mint_address: String,
    pub recipient: String,
}

/// The merged local/on-chain view of a minted pass returned by lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataView {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<Attribute>,
    pub symbol: String,
    pub collection: String,
    pub update_authority: String,
    pub mint_address: String,
}

impl MetadataView {
    /// Seed a view from a locally generated record. On-chain enrichment
    /// and caller overrides are layered on top by the lookup.
    pub fn from_local(metadata: &NftMetadata, mint_address: &str, update_authority: &str) -> Self {
        Self {
            name: metadata.name.clone(),
            description: metadata.description.clone(),
            image: metadata.image.clone(),
            attributes: metadata.attributes.clone(),
            symbol: metadata.symbol.clone(),
            collection: metadata.collection.name.clone(),
            update_authority: update_authority.to_string(),
            mint_address: mint_address.to_string(),
        }
    }

    /// Merge caller-supplied overrides field-by-field. Overrides win.
    pub fn apply(&mut self, overrides: MetadataOverrides) {
        if let Some(name) = overrides.name {
            self.name = name;
        }
        if let Some(description) = overrides.description {
            self.description = description;
        }
        if let Some(image) = overrides.image {
            self.image = image;
        }
        if let Some(attributes) = overrides.attributes {
            self.attributes = attributes;
        }
        if let Some(symbol) = overrides.symbol {
            self.symbol = symbol;
        }
        if let Some(collection) = overrides.collection {
            self.collection = collection;
        }
        if let Some(update_authority) = overrides.update_authority {
            self.update_authority = update_authority;
        }
    }
}

/// Caller-supplied partial view accepted in a lookup request body.
/// `mintAddress` is deliberately absent: it always comes from the path.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataOverrides {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub attributes: Option<Vec<Attribute>>,
    pub symbol: Option<String>,
    pub collection: Option<String>,
    pub update_authority: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::generate_at;

    #[test]
    fn overrides_win_over_local_fields() {
        let metadata = generate_at("creator", "https://neuromatrix.dev", 1);
        let mut view = MetadataView::from_local(&metadata, "mint", "authority");
        view.apply(MetadataOverrides {
            name: Some("Renamed".to_string()),
            collection: Some("SomeCollectionAddress".to_string()),
            ..Default::default()
        });
        assert_eq!(view.name, "Renamed");
        assert_eq!(view.collection, "SomeCollectionAddress");
        // Untouched fields keep their local values.
        assert_eq!(view.symbol, "NMP");
        assert_eq!(view.mint_address, "mint");
    }

    #[test]
    fn view_serializes_camel_case() {
        let metadata = generate_at("creator", "https://neuromatrix.dev", 1);
        let view = MetadataView::from_local(&metadata, "mint", "authority");
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["updateAuthority"], "authority");
        assert_eq!(json["mintAddress"], "mint");
    }
}
