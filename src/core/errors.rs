/// Error types for the inspection workflow
///
/// Every failure the workflow can hit falls into one of three families:
/// malformed input (`ValidationError`), a wallet that would not hand over an
/// account (`ConnectionError`), or a chain read that did not complete
/// (`ReadError`). `InspectError` is the union the orchestrator returns.

use ethers::providers::{ProviderError, RpcError};
use ethers::types::U256;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Invalid address checksum: {0}")]
    Checksum(String),

    #[error("Invalid function selector: {0}")]
    Selector(String),
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The wallet answered with a JSON-RPC error (user declined, locked, ...)
    #[error("Wallet rejected the request")]
    Rejected(#[source] ProviderError),

    #[error("Wallet endpoint unreachable")]
    Unreachable(#[source] ProviderError),

    #[error("Wallet is on chain {actual}, expected chain {expected}")]
    WrongChain { expected: u64, actual: U256 },

    #[error("Wallet returned no accounts")]
    NoAccounts,

    #[error("Wallet returned a malformed account")]
    InvalidAccount(#[from] ValidationError),
}

impl ConnectionError {
    /// Sort a failed wallet request: an error response from the wallet is a
    /// rejection, anything else never got an answer.
    pub fn from_provider(err: ProviderError) -> Self {
        if err.as_error_response().is_some() {
            Self::Rejected(err)
        } else {
            Self::Unreachable(err)
        }
    }
}

/// A chain read that failed in transport or returned an unusable response.
///
/// `op` names the read (`balance`, `nonce`, ...) and `target` is the address,
/// selector or block tag it was issued for.
#[derive(Debug, Error)]
#[error("Failed to read {op} for {target}")]
pub struct ReadError {
    pub op: &'static str,
    pub target: String,
    #[source]
    pub source: ProviderError,
}

impl ReadError {
    pub fn new(op: &'static str, target: impl Into<String>, source: ProviderError) -> Self {
        Self {
            op,
            target: target.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum InspectError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("Failed to write report")]
    Output(#[from] std::io::Error),
}
