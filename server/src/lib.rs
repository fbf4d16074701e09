//! The NeuroMatrix gateway service: HTTP surface over the metadata
//! generator, the Supabase counter store, the external minting agent,
//! and best-effort on-chain lookups.

pub mod agent;
pub mod chain;
pub mod config;
pub mod lookup;
pub mod mint;
pub mod routes;
pub mod store;
