/// Chain reads over JSON-RPC
///
/// `ChainReader` is the seam the workflow talks to; `RpcReader` implements it
/// on top of an `ethers` provider. Every read is independent and stateless,
/// so callers may issue any subset of them concurrently.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ethers::providers::{Http, JsonRpcClient, Middleware, Provider, ProviderError, RpcError};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{BlockNumber, TransactionRequest, U256};
use tracing::{debug, warn};

use crate::core::address::{ChecksumAddress, Selector};
use crate::core::errors::ReadError;

/// The fields of the latest block the snapshot needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub number: u64,
    pub timestamp: U256,
    pub gas_used: U256,
    pub gas_limit: U256,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn latest_block(&self) -> Result<BlockHeader, ReadError>;

    async fn gas_price(&self) -> Result<U256, ReadError>;

    async fn balance_of(&self, address: ChecksumAddress) -> Result<U256, ReadError>;

    async fn nonce_of(&self, address: ChecksumAddress) -> Result<U256, ReadError>;

    /// Whether any bytecode is deployed at `address`
    async fn code_of(&self, address: ChecksumAddress) -> Result<bool, ReadError>;

    /// Zero-argument `eth_call`, read back as an unsigned integer.
    ///
    /// `Ok(None)` means the call produced nothing usable: empty return data,
    /// an execution revert, or data that does not fit a `uint256`. Only
    /// transport failures are errors.
    async fn raw_call(
        &self,
        to: ChecksumAddress,
        selector: Selector,
    ) -> Result<Option<U256>, ReadError>;
}

/// Build an HTTP provider, optionally with a per-request timeout.
///
/// Without a timeout a hung node hangs the run.
pub fn http_provider(url: &str, timeout: Option<Duration>) -> Result<Provider<Http>> {
    let url = url.trim();
    let parsed = reqwest::Url::parse(url).map_err(|e| anyhow!("Invalid RPC URL '{}': {}", url, e))?;

    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().context("Failed to create HTTP client")?;

    Ok(Provider::new(Http::new_with_client(parsed, client)))
}

#[derive(Clone)]
pub struct RpcReader<P: JsonRpcClient = Http> {
    provider: Provider<P>,
}

impl RpcReader<Http> {
    pub fn connect(rpc_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let provider = http_provider(rpc_url, timeout)
            .context("Failed to create Ethereum RPC provider")?;
        Ok(Self { provider })
    }
}

impl<P: JsonRpcClient> RpcReader<P> {
    pub fn new_with_provider(provider: Provider<P>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> ChainReader for RpcReader<P>
where
    P: JsonRpcClient + 'static,
{
    async fn latest_block(&self) -> Result<BlockHeader, ReadError> {
        debug!("latest_block called");

        let block = self
            .provider
            .get_block(BlockNumber::Latest)
            .await
            .map_err(|e| ReadError::new("latest_block", "latest", e))?
            .ok_or_else(|| {
                ReadError::new(
                    "latest_block",
                    "latest",
                    ProviderError::CustomError("node returned no latest block".to_string()),
                )
            })?;

        let number = block.number.ok_or_else(|| {
            ReadError::new(
                "latest_block",
                "latest",
                ProviderError::CustomError("latest block has no number".to_string()),
            )
        })?;

        Ok(BlockHeader {
            number: number.as_u64(),
            timestamp: block.timestamp,
            gas_used: block.gas_used,
            gas_limit: block.gas_limit,
        })
    }

    async fn gas_price(&self) -> Result<U256, ReadError> {
        debug!("gas_price called");
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| ReadError::new("gas_price", "network", e))
    }

    async fn balance_of(&self, address: ChecksumAddress) -> Result<U256, ReadError> {
        debug!(%address, "balance_of called");
        self.provider
            .get_balance(address.as_address(), None)
            .await
            .map_err(|e| ReadError::new("balance", address.to_string(), e))
    }

    async fn nonce_of(&self, address: ChecksumAddress) -> Result<U256, ReadError> {
        debug!(%address, "nonce_of called");
        self.provider
            .get_transaction_count(address.as_address(), None)
            .await
            .map_err(|e| ReadError::new("nonce", address.to_string(), e))
    }

    async fn code_of(&self, address: ChecksumAddress) -> Result<bool, ReadError> {
        debug!(%address, "code_of called");
        let code = self
            .provider
            .get_code(address.as_address(), None)
            .await
            .map_err(|e| ReadError::new("code", address.to_string(), e))?;
        Ok(!code.is_empty())
    }

    async fn raw_call(
        &self,
        to: ChecksumAddress,
        selector: Selector,
    ) -> Result<Option<U256>, ReadError> {
        debug!(%to, %selector, "raw_call called");

        let tx: TypedTransaction = TransactionRequest::new()
            .to(to.as_address())
            .data(selector.calldata())
            .into();

        match self.provider.call(&tx, None).await {
            Ok(data) => Ok(decode_uint(&data)),
            Err(e) if is_revert(&e) => {
                warn!(%to, %selector, "call reverted, treating as no data");
                Ok(None)
            }
            Err(e) => Err(ReadError::new("call", format!("{} {}", to, selector), e)),
        }
    }
}

/// Read call return data as a big-endian `uint256`.
///
/// Empty data and anything wider than 32 bytes yield `None`.
pub fn decode_uint(data: &[u8]) -> Option<U256> {
    match data.len() {
        0 => None,
        1..=32 => Some(U256::from_big_endian(data)),
        len => {
            warn!(len, "call returned more than 32 bytes, treating as no data");
            None
        }
    }
}

/// Execution reverts come back as JSON-RPC errors (code 3, or a message
/// mentioning the revert); they are an answer from the node, not a
/// transport failure.
fn is_revert(err: &ProviderError) -> bool {
    err.as_error_response()
        .map(|resp| resp.code == 3 || resp.message.to_lowercase().contains("revert"))
        .unwrap_or(false)
}
