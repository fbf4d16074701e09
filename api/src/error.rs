use thiserror::Error;

/// Errors surfaced by the gateway.
///
/// Every boundary operation maps one of these onto a fixed HTTP status and
/// a generic `{error}` body; the detailed message only ever reaches the
/// server logs.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required configuration value is absent. Fatal at first use.
    #[error("missing required configuration: {0}")]
    Configuration(&'static str),

    /// Input that must be a base58 Solana address failed to parse.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// An expected row (singleton counter, latest task) is absent.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Transport or query failure against the counter/task store.
    #[error("store error: {0}")]
    Store(String),

    /// The external minting agent call failed. Never retried: minting is
    /// not idempotent and a blind retry could double-mint.
    #[error("mint failed")]
    MintFailed(#[source] anyhow::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;
