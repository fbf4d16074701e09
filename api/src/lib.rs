//! Core types for the NeuroMatrix gateway: the off-chain metadata
//! generator, the store row shapes, and the gateway error taxonomy.

pub mod consts;
pub mod error;
pub mod metadata;
pub mod types;

pub mod prelude {
    pub use crate::consts::*;
    pub use crate::error::*;
    pub use crate::metadata::*;
    pub use crate::types::*;
}
