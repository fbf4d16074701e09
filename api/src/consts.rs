/// Display name of the commemorative pass.
pub const PASS_NAME: &str = "NeuroMatrix Pass";

/// On-chain symbol of the pass.
pub const PASS_SYMBOL: &str = "NMP";

/// Marketing description embedded in every metadata record.
pub const PASS_DESCRIPTION: &str = "Enter the code. Unlock hidden realms of \
    AI-driven cyberpunk. Rewrite your reality - join the NeuroMatrix";

/// Royalty charged on secondary sales, in basis points (5%).
pub const SELLER_FEE_BASIS_POINTS: u16 = 500;

/// Artwork filename served from the public domain root.
pub const PASS_IMAGE_FILENAME: &str = "neuromatrixpass.jpeg";

/// Path under the public domain where metadata URIs point.
pub const METADATA_PATH: &str = "nft/metadata";

/// Collection name reported in the off-chain record.
pub const COLLECTION_NAME: &str = "NeuroMatrix NFT Collection";

/// Collection family reported in the off-chain record.
pub const COLLECTION_FAMILY: &str = "NeuroMatrix";
