mod cli;

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aether_cli::core::{
    ChainReader, Inspector, RpcReader, RpcWallet, RunSummary, StaticWallet, WalletProvider,
};
use aether_cli::screens::Presenter;
use aether_cli::utils::{ProbePlan, Settings};
use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.log_filter());

    match run(cli).await {
        Ok(summary) => {
            info!(
                wallet = %summary.wallet,
                probes = summary.probes_inspected,
                "run completed"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            let label = if std::io::stderr().is_terminal() {
                "Fatal error:".red().bold().to_string()
            } else {
                "Fatal error:".to_string()
            };
            eprintln!("{} {:#}", label, e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so the report on stdout stays clean. `RUST_LOG` wins
/// over the `-v` level when set.
fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<RunSummary> {
    let settings = cli.settings()?;
    let plan = settings
        .probe_plan()
        .context("Invalid probe configuration")?;

    let reader = RpcReader::connect(&settings.network.rpc_url, settings.timeout())?;

    match &cli.address {
        Some(address) => {
            info!(%address, "using static wallet");
            let wallet = StaticWallet::new(vec![address.clone()]);
            inspect(wallet, reader, &settings, plan).await
        }
        None => {
            let wallet = RpcWallet::connect(
                &settings.wallet_url,
                settings.network.chain_id,
                settings.timeout(),
            )
            .context("Failed to create wallet provider")?;
            inspect(wallet, reader, &settings, plan).await
        }
    }
}

async fn inspect<W, R>(wallet: W, reader: R, settings: &Settings, plan: ProbePlan) -> Result<RunSummary>
where
    W: WalletProvider,
    R: ChainReader,
{
    let inspector = Inspector::new(wallet, reader, settings.network.clone(), plan);
    let mut presenter = Presenter::stdout();
    Ok(inspector.run(&mut presenter).await?)
}
