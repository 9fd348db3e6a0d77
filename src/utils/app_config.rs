/// Run settings
///
/// Defaults come from `constants`. A TOML file can override any subset of
/// fields, for example:
///
/// ```toml
/// wallet_url = "http://127.0.0.1:1248"
/// probes = ["0x742d35Cc6634C0532925a3b844Bc454e4438f44e"]
///
/// [network]
/// rpc_url = "http://localhost:8545"
/// ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::address::{ChecksumAddress, Selector};
use crate::core::errors::ValidationError;
use crate::utils::constants::*;

/// Network the run is pinned to. Built once at startup and passed to every
/// component by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkDescriptor {
    pub label: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub explorer_url: String,
    pub currency: String,
}

impl Default for NetworkDescriptor {
    fn default() -> Self {
        Self {
            label: DEFAULT_NETWORK_LABEL.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            rpc_url: DEFAULT_RPC_URL.to_string(),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl NetworkDescriptor {
    fn explorer_base(&self) -> &str {
        self.explorer_url.trim_end_matches('/')
    }

    pub fn address_url(&self, address: &ChecksumAddress) -> String {
        format!("{}/address/{}", self.explorer_base(), address)
    }

    pub fn block_url(&self, number: u64) -> String {
        format!("{}/block/{}", self.explorer_base(), number)
    }

    pub fn code_url(&self, address: &ChecksumAddress) -> String {
        format!("{}#code", self.address_url(address))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub network: NetworkDescriptor,
    pub wallet_url: String,
    pub probes: Vec<String>,
    pub selector: String,
    pub selector_label: String,
    /// Per-request HTTP timeout. Unset means requests may wait forever.
    pub timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            network: NetworkDescriptor::default(),
            wallet_url: DEFAULT_WALLET_URL.to_string(),
            probes: PROBE_ADDRESSES.iter().map(|p| p.to_string()).collect(),
            selector: PROBE_SELECTOR.to_string(),
            selector_label: PROBE_SELECTOR_LABEL.to_string(),
            timeout_secs: None,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file. Fields missing from the file keep
    /// their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;

        let settings: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;

        Ok(settings)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate the probe list and selector before any network activity.
    pub fn probe_plan(&self) -> Result<ProbePlan, ValidationError> {
        let targets = self
            .probes
            .iter()
            .map(|p| ChecksumAddress::parse(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProbePlan {
            targets,
            selector: Selector::parse(&self.selector)?,
            selector_label: self.selector_label.clone(),
        })
    }
}

/// Validated probe targets and the selector tried against the first one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePlan {
    pub targets: Vec<ChecksumAddress>,
    pub selector: Selector,
    pub selector_label: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_base_sepolia() {
        let settings = Settings::default();
        assert_eq!(settings.network.label, "Base Sepolia");
        assert_eq!(settings.network.chain_id, 84532);
        assert_eq!(settings.network.rpc_url, "https://sepolia.base.org");
        assert_eq!(settings.probes.len(), 3);
        assert_eq!(settings.timeout(), None);

        let plan = settings.probe_plan().unwrap();
        assert_eq!(plan.targets.len(), 3);
        assert_eq!(plan.selector.to_string(), "0x18160ddd");
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = 15").unwrap();
        writeln!(file, "probes = [\"0x742d35cc6634c0532925a3b844bc454e4438f44e\"]").unwrap();
        writeln!(file, "[network]").unwrap();
        writeln!(file, "rpc_url = \"http://localhost:8545\"").unwrap();

        let settings = Settings::load(file.path()).unwrap();

        assert_eq!(settings.network.rpc_url, "http://localhost:8545");
        assert_eq!(settings.network.chain_id, 84532);
        assert_eq!(settings.wallet_url, DEFAULT_WALLET_URL);
        assert_eq!(settings.timeout(), Some(Duration::from_secs(15)));

        let plan = settings.probe_plan().unwrap();
        assert_eq!(
            plan.targets[0].to_string(),
            "0x742d35Cc6634C0532925a3b844Bc454e4438f44e"
        );
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read settings file"));
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "probes = not-a-list").unwrap();

        let err = Settings::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings file"));
    }

    #[test]
    fn test_probe_plan_rejects_bad_probe() {
        let settings = Settings {
            probes: vec!["0x7cA1b2d3E4f5061728394aBcDeF0123456789aBc".to_string()],
            ..Settings::default()
        };

        assert!(matches!(
            settings.probe_plan(),
            Err(ValidationError::Checksum(_))
        ));
    }

    #[test]
    fn test_explorer_urls() {
        let network = NetworkDescriptor {
            explorer_url: "https://sepolia.basescan.org/".to_string(),
            ..NetworkDescriptor::default()
        };
        let address = ChecksumAddress::parse("0x742d35Cc6634C0532925a3b844Bc454e4438f44e").unwrap();

        assert_eq!(
            network.address_url(&address),
            "https://sepolia.basescan.org/address/0x742d35Cc6634C0532925a3b844Bc454e4438f44e"
        );
        assert_eq!(network.block_url(42), "https://sepolia.basescan.org/block/42");
        assert_eq!(
            network.code_url(&address),
            "https://sepolia.basescan.org/address/0x742d35Cc6634C0532925a3b844Bc454e4438f44e#code"
        );
    }
}
