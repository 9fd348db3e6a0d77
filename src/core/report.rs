/// Report aggregation
///
/// `build_*` functions are pure: same inputs, same report. The async helpers
/// fan the underlying reads out concurrently and fail as a whole if any one
/// read fails, so a report is either complete or never built.

use ethers::types::U256;
use tracing::debug;

use crate::core::address::ChecksumAddress;
use crate::core::errors::ReadError;
use crate::core::rpc::{BlockHeader, ChainReader};
use crate::utils::{format_native, NetworkDescriptor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSnapshot {
    pub chain_id: u64,
    pub network: String,
    pub block_number: u64,
    pub timestamp: U256,
    pub gas_used: U256,
    pub gas_limit: U256,
    pub gas_price: U256,
    pub block_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressReport {
    pub address: ChecksumAddress,
    pub balance_wei: U256,
    /// Exact decimal rendering of `balance_wei` in the native asset
    pub balance: String,
    pub nonce: U256,
    pub is_contract: bool,
    pub explorer_url: String,
}

pub fn build_snapshot(
    block: &BlockHeader,
    gas_price: U256,
    network: &NetworkDescriptor,
) -> NetworkSnapshot {
    NetworkSnapshot {
        chain_id: network.chain_id,
        network: network.label.clone(),
        block_number: block.number,
        timestamp: block.timestamp,
        gas_used: block.gas_used,
        gas_limit: block.gas_limit,
        gas_price,
        block_url: network.block_url(block.number),
    }
}

pub fn build_address_report(
    address: ChecksumAddress,
    balance: U256,
    nonce: U256,
    has_code: bool,
    network: &NetworkDescriptor,
) -> AddressReport {
    AddressReport {
        address,
        balance_wei: balance,
        balance: format_native(balance),
        nonce,
        is_contract: has_code,
        explorer_url: network.address_url(&address),
    }
}

/// Link to the verified-source tab for `address`
pub fn code_tab_url(address: &ChecksumAddress, network: &NetworkDescriptor) -> String {
    network.code_url(address)
}

/// Latest block and gas price, read concurrently
pub async fn network_snapshot<R: ChainReader + ?Sized>(
    reader: &R,
    network: &NetworkDescriptor,
) -> Result<NetworkSnapshot, ReadError> {
    let (block, gas_price) = tokio::try_join!(reader.latest_block(), reader.gas_price())?;
    debug!(block = block.number, "network snapshot gathered");
    Ok(build_snapshot(&block, gas_price, network))
}

/// Balance, nonce and code presence of `address`, read concurrently
pub async fn inspect_address<R: ChainReader + ?Sized>(
    reader: &R,
    address: ChecksumAddress,
    network: &NetworkDescriptor,
) -> Result<AddressReport, ReadError> {
    let (balance, nonce, has_code) = tokio::try_join!(
        reader.balance_of(address),
        reader.nonce_of(address),
        reader.code_of(address),
    )?;
    Ok(build_address_report(address, balance, nonce, has_code, network))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rpc::MockChainReader;
    use ethers::providers::ProviderError;

    const ADDRESS: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

    fn address() -> ChecksumAddress {
        ChecksumAddress::parse(ADDRESS).unwrap()
    }

    fn block() -> BlockHeader {
        BlockHeader {
            number: 18_000_000,
            timestamp: U256::from(1_700_000_000u64),
            gas_used: U256::from(21_000u64),
            gas_limit: U256::from(30_000_000u64),
        }
    }

    fn node_down(op: &'static str, target: &str) -> ReadError {
        ReadError::new(op, target, ProviderError::CustomError("node unreachable".to_string()))
    }

    #[test]
    fn test_build_snapshot() {
        let network = NetworkDescriptor::default();
        let snapshot = build_snapshot(&block(), U256::from(1_000_000u64), &network);

        assert_eq!(snapshot.chain_id, 84532);
        assert_eq!(snapshot.network, "Base Sepolia");
        assert_eq!(snapshot.block_number, 18_000_000);
        assert_eq!(snapshot.gas_price, U256::from(1_000_000u64));
        assert_eq!(snapshot.block_url, "https://sepolia.basescan.org/block/18000000");
    }

    #[test]
    fn test_build_address_report() {
        let network = NetworkDescriptor::default();
        let report = build_address_report(
            address(),
            U256::exp10(18),
            U256::from(3u64),
            true,
            &network,
        );

        assert_eq!(report.balance, "1");
        assert_eq!(report.balance_wei, U256::exp10(18));
        assert!(report.is_contract);
        assert_eq!(
            report.explorer_url,
            format!("https://sepolia.basescan.org/address/{}", ADDRESS)
        );
    }

    #[test]
    fn test_code_tab_url() {
        let network = NetworkDescriptor {
            explorer_url: "https://explorer.example/".to_string(),
            ..NetworkDescriptor::default()
        };
        assert_eq!(
            code_tab_url(&address(), &network),
            format!("https://explorer.example/address/{}#code", ADDRESS)
        );
    }

    #[test]
    fn test_builders_are_deterministic() {
        let network = NetworkDescriptor::default();
        let a = build_address_report(address(), U256::from(5u64), U256::zero(), false, &network);
        let b = build_address_report(address(), U256::from(5u64), U256::zero(), false, &network);
        assert_eq!(a, b);

        let price = U256::from(7u64);
        assert_eq!(
            build_snapshot(&block(), price, &network),
            build_snapshot(&block(), price, &network)
        );
    }

    #[tokio::test]
    async fn test_inspect_address_all_reads_succeed() {
        let mut reader = MockChainReader::new();
        reader.expect_balance_of().times(1).returning(|_| Ok(U256::exp10(17)));
        reader.expect_nonce_of().times(1).returning(|_| Ok(U256::from(12u64)));
        reader.expect_code_of().times(1).returning(|_| Ok(false));

        let report = inspect_address(&reader, address(), &NetworkDescriptor::default())
            .await
            .unwrap();

        assert_eq!(report.balance, "0.1");
        assert_eq!(report.nonce, U256::from(12u64));
        assert!(!report.is_contract);
    }

    #[tokio::test]
    async fn test_inspect_address_fails_if_any_read_fails() {
        let mut reader = MockChainReader::new();
        reader.expect_balance_of().returning(|_| Ok(U256::exp10(17)));
        reader
            .expect_nonce_of()
            .returning(|a| Err(node_down("nonce", &a.to_string())));
        reader.expect_code_of().returning(|_| Ok(true));

        let err = inspect_address(&reader, address(), &NetworkDescriptor::default())
            .await
            .unwrap_err();

        assert_eq!(err.op, "nonce");
        assert_eq!(err.target, ADDRESS);
    }

    #[tokio::test]
    async fn test_network_snapshot_fails_if_gas_price_fails() {
        let mut reader = MockChainReader::new();
        reader.expect_latest_block().returning(|| Ok(block()));
        reader
            .expect_gas_price()
            .returning(|| Err(node_down("gas_price", "network")));

        let err = network_snapshot(&reader, &NetworkDescriptor::default())
            .await
            .unwrap_err();
        assert_eq!(err.op, "gas_price");
    }

    #[tokio::test]
    async fn test_network_snapshot() {
        let mut reader = MockChainReader::new();
        reader.expect_latest_block().times(1).returning(|| Ok(block()));
        reader
            .expect_gas_price()
            .times(1)
            .returning(|| Ok(U256::from(1_000_252u64)));

        let snapshot = network_snapshot(&reader, &NetworkDescriptor::default())
            .await
            .unwrap();

        assert_eq!(snapshot.gas_used, U256::from(21_000u64));
        assert_eq!(snapshot.gas_limit, U256::from(30_000_000u64));
        assert_eq!(snapshot.gas_price, U256::from(1_000_252u64));
    }
}
