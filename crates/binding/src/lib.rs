//! Contract bindings for the Kroma governance, token factory and vault contracts.
//!
//! This crate consolidates the Solidity interfaces the rest of the workspace talks to:
//! - UpgradeGovernor and SecurityCouncil (L1 governance)
//! - KromaMintableERC20Factory and ProtocolVault (L2 predeploys)
//! - Shared `Types` library structs
//!
//! All bindings are generated using alloy's `sol!` macro. The creation bytecode
//! of the deployable contracts is embedded in [`artifact`].

pub mod artifact;
pub mod council;
pub mod factory;
pub mod governor;
pub mod predeploys;
pub mod types;
pub mod vault;

pub use artifact::{Artifact, ArtifactError};
pub use council::SecurityCouncil;
pub use factory::KromaMintableERC20Factory;
pub use governor::UpgradeGovernor;
pub use types::Types;
pub use vault::ProtocolVault;
