//! Configuration types for the Kroma governance tooling.
//!
//! This crate provides:
//! - Network configurations (Kroma mainnet, Kroma Sepolia)
//! - L2 contract addresses for each network
//! - Builder overrides for local devnets

pub mod network;

pub use network::{
    ConfigError, L1Config, L2Config, NetworkConfig, NetworkConfigBuilder, NetworkType,
};
