//! Network configuration for Kroma.
//!
//! Provides chain-specific addresses and parameters for the supported
//! networks (mainnet, Sepolia testnet).

use alloy_primitives::Address;
use binding::predeploys;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Network name not recognised
    #[error("Unknown network: {0} (expected mainnet or testnet)")]
    UnknownNetwork(String),
}

/// Network type (mainnet or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Mainnet,
    Testnet,
}

impl FromStr for NetworkType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" | "sepolia" => Ok(Self::Testnet),
            _ => Err(ConfigError::UnknownNetwork(s.to_string())),
        }
    }
}

/// Ethereum (L1) network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct L1Config {
    /// Chain ID
    pub chain_id: u64,
    /// Block time in seconds (12 for Ethereum)
    pub block_time_secs: u64,
}

impl L1Config {
    /// Ethereum mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            chain_id: 1,
            block_time_secs: 12,
        }
    }

    /// Ethereum Sepolia testnet configuration.
    pub const fn sepolia() -> Self {
        Self {
            chain_id: 11155111,
            block_time_secs: 12,
        }
    }
}

/// Kroma (L2) network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct L2Config {
    /// Chain ID
    pub chain_id: u64,
    /// Block time in seconds (2 for Kroma)
    pub block_time_secs: u64,
    /// ProtocolVault predeploy
    pub protocol_vault: Address,
    /// KromaMintableERC20Factory predeploy
    pub token_factory: Address,
    /// L2StandardBridge predeploy, the factory's `BRIDGE`
    pub l2_standard_bridge: Address,
}

impl L2Config {
    /// Kroma mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            chain_id: 255,
            block_time_secs: 2,
            protocol_vault: predeploys::PROTOCOL_VAULT,
            token_factory: predeploys::KROMA_MINTABLE_ERC20_FACTORY,
            l2_standard_bridge: predeploys::L2_STANDARD_BRIDGE,
        }
    }

    /// Kroma Sepolia testnet configuration.
    pub const fn sepolia() -> Self {
        Self {
            chain_id: 2358,
            block_time_secs: 2,
            protocol_vault: predeploys::PROTOCOL_VAULT,
            token_factory: predeploys::KROMA_MINTABLE_ERC20_FACTORY,
            l2_standard_bridge: predeploys::L2_STANDARD_BRIDGE,
        }
    }
}

/// Complete network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network type (mainnet or testnet)
    pub network_type: NetworkType,
    /// Ethereum/L1 configuration
    pub l1: L1Config,
    /// Kroma/L2 configuration
    pub l2: L2Config,
}

impl NetworkConfig {
    /// Create mainnet configuration.
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            l1: L1Config::mainnet(),
            l2: L2Config::mainnet(),
        }
    }

    /// Create testnet (Sepolia) configuration.
    pub const fn sepolia() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            l1: L1Config::sepolia(),
            l2: L2Config::sepolia(),
        }
    }

    /// Create configuration from network type.
    pub const fn from_network_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Testnet => Self::sepolia(),
        }
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    network_type: NetworkType,
    l1: L1Config,
    l2: L2Config,
}

impl NetworkConfigBuilder {
    /// Start with mainnet defaults.
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            l1: L1Config::mainnet(),
            l2: L2Config::mainnet(),
        }
    }

    /// Start with testnet defaults.
    pub const fn testnet() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            l1: L1Config::sepolia(),
            l2: L2Config::sepolia(),
        }
    }

    /// Override the L2 chain ID (devnets).
    pub const fn l2_chain_id(mut self, chain_id: u64) -> Self {
        self.l2.chain_id = chain_id;
        self
    }

    /// Override the ProtocolVault address.
    pub const fn protocol_vault(mut self, address: Address) -> Self {
        self.l2.protocol_vault = address;
        self
    }

    /// Override the KromaMintableERC20Factory address.
    pub const fn token_factory(mut self, address: Address) -> Self {
        self.l2.token_factory = address;
        self
    }

    /// Override the L2StandardBridge address.
    pub const fn l2_standard_bridge(mut self, address: Address) -> Self {
        self.l2.l2_standard_bridge = address;
        self
    }

    /// Build the network configuration.
    pub const fn build(self) -> NetworkConfig {
        NetworkConfig {
            network_type: self.network_type,
            l1: self.l1,
            l2: self.l2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_mainnet_config() {
        let config = NetworkConfig::mainnet();
        assert_eq!(config.l1.chain_id, 1);
        assert_eq!(config.l2.chain_id, 255);
        assert_eq!(config.network_type, NetworkType::Mainnet);
        assert_eq!(config.l2.protocol_vault, predeploys::PROTOCOL_VAULT);
    }

    #[test]
    fn test_sepolia_config() {
        let config = NetworkConfig::sepolia();
        assert_eq!(config.l1.chain_id, 11155111);
        assert_eq!(config.l2.chain_id, 2358);
        assert_eq!(config.network_type, NetworkType::Testnet);
    }

    #[test]
    fn test_custom_config_builder() {
        let custom_vault = address!("1111111111111111111111111111111111111111");

        let config = NetworkConfigBuilder::testnet()
            .protocol_vault(custom_vault)
            .l2_chain_id(901)
            .build();

        assert_eq!(config.l2.protocol_vault, custom_vault);
        assert_eq!(config.l2.chain_id, 901);
        assert_eq!(
            config.l2.token_factory,
            predeploys::KROMA_MINTABLE_ERC20_FACTORY
        );
        assert_eq!(config.network_type, NetworkType::Testnet);
    }

    #[test]
    fn test_network_type_parsing() {
        assert_eq!("mainnet".parse::<NetworkType>(), Ok(NetworkType::Mainnet));
        assert_eq!("Sepolia".parse::<NetworkType>(), Ok(NetworkType::Testnet));
        assert_eq!(
            "devnet".parse::<NetworkType>(),
            Err(ConfigError::UnknownNetwork("devnet".to_string()))
        );
    }

    #[test]
    fn test_network_type_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            network: NetworkType,
        }

        let parsed: Wrapper = toml::from_str("network = \"testnet\"").unwrap();
        assert_eq!(parsed.network, NetworkType::Testnet);
    }
}
