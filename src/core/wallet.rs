/// Wallet connection
///
/// A wallet is anything that can hand over a list of accounts. The first
/// account is the one inspected; it must be a well-formed address.

use std::time::Duration;

use async_trait::async_trait;
use ethers::providers::{Http, JsonRpcClient, Middleware, Provider};
use ethers::types::U256;
use tracing::{debug, info};

use crate::core::address::ChecksumAddress;
use crate::core::errors::ConnectionError;
use crate::core::rpc::http_provider;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for account access. May block on a user consent
    /// prompt outside this process.
    async fn request_accounts(&self) -> Result<Vec<String>, ConnectionError>;
}

/// Wallet reached over JSON-RPC (`eth_requestAccounts`), pinned to one
/// chain: accounts are only requested once `eth_chainId` matches.
pub struct RpcWallet<P: JsonRpcClient = Http> {
    provider: Provider<P>,
    chain_id: u64,
}

impl RpcWallet<Http> {
    pub fn connect(wallet_url: &str, chain_id: u64, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let provider = http_provider(wallet_url, timeout)?;
        Ok(Self { provider, chain_id })
    }
}

impl<P: JsonRpcClient> RpcWallet<P> {
    pub fn new_with_provider(provider: Provider<P>, chain_id: u64) -> Self {
        Self { provider, chain_id }
    }
}

#[async_trait]
impl<P> WalletProvider for RpcWallet<P>
where
    P: JsonRpcClient + 'static,
{
    async fn request_accounts(&self) -> Result<Vec<String>, ConnectionError> {
        let actual = self
            .provider
            .get_chainid()
            .await
            .map_err(ConnectionError::from_provider)?;
        if actual != U256::from(self.chain_id) {
            return Err(ConnectionError::WrongChain {
                expected: self.chain_id,
                actual,
            });
        }

        debug!(chain_id = self.chain_id, "requesting wallet accounts");
        self.provider
            .request::<_, Vec<String>>("eth_requestAccounts", ())
            .await
            .map_err(ConnectionError::from_provider)
    }
}

/// Fixed account list, for runs without an interactive wallet
#[derive(Debug, Clone, Default)]
pub struct StaticWallet {
    accounts: Vec<String>,
}

impl StaticWallet {
    pub fn new(accounts: Vec<String>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl WalletProvider for StaticWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, ConnectionError> {
        Ok(self.accounts.clone())
    }
}

/// Pick the account to inspect: the first one. Fails if the list is empty
/// or the first entry is not a valid address.
pub fn select_primary(accounts: &[String]) -> Result<ChecksumAddress, ConnectionError> {
    let first = accounts.first().ok_or(ConnectionError::NoAccounts)?;
    Ok(ChecksumAddress::parse(first)?)
}

pub async fn connect<W: WalletProvider + ?Sized>(
    wallet: &W,
) -> Result<ChecksumAddress, ConnectionError> {
    let accounts = wallet.request_accounts().await?;
    let address = select_primary(&accounts)?;
    info!(%address, "wallet connected");
    Ok(address)
}
