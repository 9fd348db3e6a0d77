/// Read-only inspection workflow
///
/// One pass, in fixed order: banner, wallet connection, wallet report and
/// network snapshot (concurrently), the probe targets one at a time, one raw
/// selector call, closing summary. The first unrecovered error ends the run;
/// whatever was already written stays written.

use std::io::Write;

use ethers::types::U256;
use tracing::info;

use crate::core::address::ChecksumAddress;
use crate::core::errors::InspectError;
use crate::core::report::{
    code_tab_url, inspect_address, network_snapshot, AddressReport, NetworkSnapshot,
};
use crate::core::rpc::ChainReader;
use crate::core::wallet::{connect, WalletProvider};
use crate::screens::Presenter;
use crate::utils::{now_iso, yes_no, NetworkDescriptor, ProbePlan, APP_NAME};

/// What a completed run saw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub wallet: ChecksumAddress,
    pub probes_inspected: usize,
    pub selector_result: Option<U256>,
}

pub struct Inspector<W, R> {
    wallet: W,
    reader: R,
    network: NetworkDescriptor,
    plan: ProbePlan,
}

impl<W, R> Inspector<W, R>
where
    W: WalletProvider,
    R: ChainReader,
{
    pub fn new(wallet: W, reader: R, network: NetworkDescriptor, plan: ProbePlan) -> Self {
        Self {
            wallet,
            reader,
            network,
            plan,
        }
    }

    pub async fn run<O: Write>(
        &self,
        presenter: &mut Presenter<O>,
    ) -> Result<RunSummary, InspectError> {
        self.boot(presenter)?;

        let wallet = connect(&self.wallet).await?;

        info!("gathering wallet report and network snapshot");
        let (snapshot, wallet_report) = tokio::try_join!(
            network_snapshot(&self.reader, &self.network),
            inspect_address(&self.reader, wallet, &self.network),
        )?;

        self.render_wallet(presenter, &wallet_report)?;
        self.render_snapshot(presenter, &snapshot)?;

        // One target at a time, in listed order
        let mut probes_inspected = 0;
        for target in &self.plan.targets {
            info!(%target, "probing");
            let report = inspect_address(&self.reader, *target, &self.network).await?;
            self.render_probe(presenter, &report)?;
            probes_inspected += 1;
        }

        let selector_result = match self.plan.targets.first() {
            Some(target) => {
                let result = self.reader.raw_call(*target, self.plan.selector).await?;
                self.render_selector(presenter, target, result)?;
                result
            }
            None => None,
        };

        presenter.render(
            "Done",
            &[
                "Read-only session completed.",
                "No transactions were signed or broadcast.",
            ],
        )?;

        Ok(RunSummary {
            wallet,
            probes_inspected,
            selector_result,
        })
    }

    fn boot<O: Write>(&self, presenter: &mut Presenter<O>) -> Result<(), InspectError> {
        presenter.write_lines(&[
            format!("[{}] {} boot (read-only)", now_iso(), APP_NAME),
            format!(
                "Network: {} | chainId: {}",
                self.network.label, self.network.chain_id
            ),
            format!("RPC: {}", self.network.rpc_url),
            format!("Explorer: {}", self.network.explorer_url),
        ])?;
        Ok(())
    }

    fn render_wallet<O: Write>(
        &self,
        presenter: &mut Presenter<O>,
        report: &AddressReport,
    ) -> Result<(), InspectError> {
        presenter.render(
            "Wallet context",
            &[
                format!("Address: {}", report.address),
                format!("Balance: {} {}", report.balance, self.network.currency),
                format!("Tx count: {}", report.nonce),
                format!("Contract: {}", yes_no(report.is_contract)),
                format!("Explorer: {}", report.explorer_url),
            ],
        )?;
        Ok(())
    }

    fn render_snapshot<O: Write>(
        &self,
        presenter: &mut Presenter<O>,
        snapshot: &NetworkSnapshot,
    ) -> Result<(), InspectError> {
        presenter.render(
            "Network snapshot",
            &[
                format!("Latest block: {}", snapshot.block_number),
                format!("Timestamp: {}", snapshot.timestamp),
                format!(
                    "Gas used / limit: {} / {}",
                    snapshot.gas_used, snapshot.gas_limit
                ),
                format!("Gas price: {}", snapshot.gas_price),
                format!("Block link: {}", snapshot.block_url),
            ],
        )?;
        Ok(())
    }

    fn render_probe<O: Write>(
        &self,
        presenter: &mut Presenter<O>,
        report: &AddressReport,
    ) -> Result<(), InspectError> {
        presenter.render(
            "Testnet contract probe",
            &[
                format!("Address: {}", report.address),
                format!("Has code: {}", yes_no(report.is_contract)),
                format!("Balance: {} {}", report.balance, self.network.currency),
                format!("Explorer: {}", report.explorer_url),
                format!("Code tab: {}", code_tab_url(&report.address, &self.network)),
            ],
        )?;
        Ok(())
    }

    fn render_selector<O: Write>(
        &self,
        presenter: &mut Presenter<O>,
        target: &ChecksumAddress,
        result: Option<U256>,
    ) -> Result<(), InspectError> {
        let selector = if self.plan.selector_label.is_empty() {
            format!("Selector: {}", self.plan.selector)
        } else {
            format!("Selector: {} ({})", self.plan.selector, self.plan.selector_label)
        };
        let result = match result {
            Some(value) => value.to_string(),
            None => "no data / not supported".to_string(),
        };

        presenter.render(
            "Optional read-only selector check",
            &[
                format!("Target: {}", target),
                selector,
                format!("Result: {}", result),
                "Note: this is a raw eth_call; no ABI required.".to_string(),
            ],
        )?;
        Ok(())
    }
}
