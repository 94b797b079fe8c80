use alloy_primitives::Address;
use config::{NetworkConfig, NetworkType};
use serde::{Deserialize, Serialize};
use std::path::Path;

const fn default_lookback_blocks() -> u64 {
    // ~1 week of L1 blocks
    50_400
}

const fn default_watch_interval_secs() -> u64 {
    60
}

/// Top-level kromactl configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// L1 RPC endpoint url
    pub l1_rpc_url: String,

    /// L2 RPC endpoint url
    pub l2_rpc_url: String,

    /// Kroma network the contracts belong to
    pub network: NetworkType,

    /// UpgradeGovernor proxy on L1
    pub upgrade_governor: Address,

    /// SecurityCouncil proxy on L1
    pub security_council: Address,

    /// Account that signs transactions. Required with `signer_proxy_url`,
    /// otherwise checked against the private key when set.
    #[serde(default)]
    pub account: Option<Address>,

    /// Sign through a signer-proxy instead of a local key
    #[serde(default)]
    pub signer_proxy_url: Option<String>,

    /// How far back log scans reach when no range is given
    #[serde(default = "default_lookback_blocks")]
    pub lookback_blocks: u64,

    #[serde(default = "default_watch_interval_secs")]
    pub watch_interval_secs: u64,

    /// Serve Prometheus metrics on this port while watching
    #[serde(default)]
    pub metrics_port: Option<u16>,

    /// Log actions without sending transactions
    #[serde(default)]
    pub dry_run: bool,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> eyre::Result<()> {
        if self.watch_interval_secs == 0 {
            eyre::bail!("watch_interval_secs must be at least 1");
        }

        Ok(())
    }

    pub const fn network_config(&self) -> NetworkConfig {
        NetworkConfig::from_network_type(self.network)
    }
}
