pub mod address;
pub mod errors;
pub mod inspector;
pub mod report;
pub mod rpc;
pub mod wallet;

pub use address::{ChecksumAddress, Selector};
pub use errors::{ConnectionError, InspectError, ReadError, ValidationError};
pub use inspector::{Inspector, RunSummary};
pub use rpc::{ChainReader, RpcReader};
pub use wallet::{RpcWallet, StaticWallet, WalletProvider};
