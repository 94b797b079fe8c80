//! Read-side helpers for the UpgradeGovernor.
//!
//! Provides:
//! - Local proposal id hashing ([`hash`])
//! - Proposal, vote and tally types ([`types`])
//! - State queries and `ProposalCreated` log scanning ([`state`])

pub mod hash;
pub mod state;
pub mod types;

pub use state::{GovernorParameters, GovernorStateProvider, ProposalInfo, ProposalRecord};
pub use types::{Proposal, ProposalId, ProposalState, Tally, VoteSupport};
