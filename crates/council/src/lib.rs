//! Read-side helpers for the SecurityCouncil multisig.

pub mod state;
pub mod types;

pub use state::CouncilStateProvider;
pub use types::{confirmations_needed, CouncilRequest, CouncilTransaction, TransactionId};
