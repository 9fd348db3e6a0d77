/// CLI argument parsing

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};

use aether_cli::utils::Settings;

// Build timestamp injected at compile time
pub const VERSION_WITH_BUILD: &str = concat!(env!("CARGO_PKG_VERSION"), " (built: ", env!("BUILD_TIMESTAMP"), ")");

/// Read-only diagnostic run against an EVM testnet. Never signs or sends
/// transactions.
#[derive(Debug, Parser)]
#[command(name = "aether")]
#[command(author, version = VERSION_WITH_BUILD, about, long_about = None)]
pub struct Cli {
    /// TOML settings file (network, probes, selector, wallet URL)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the chain RPC endpoint
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Override the wallet JSON-RPC endpoint
    #[arg(long)]
    pub wallet_url: Option<String>,

    /// Inspect this address instead of asking a wallet
    #[arg(short, long)]
    pub address: Option<String>,

    /// Per-request timeout in seconds (default: wait indefinitely)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Settings file (or built-in defaults) with command-line overrides applied
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(url) = &self.rpc_url {
            settings.network.rpc_url = url.clone();
        }
        if let Some(url) = &self.wallet_url {
            settings.wallet_url = url.clone();
        }
        if self.timeout_secs.is_some() {
            settings.timeout_secs = self.timeout_secs;
        }

        Ok(settings)
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
