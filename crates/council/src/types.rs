use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Id assigned by `submitTransaction`.
pub type TransactionId = U256;

/// A multisig transaction together with its confirmation weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilTransaction {
    pub id: TransactionId,
    pub target: Address,
    pub value: U256,
    pub data: Bytes,
    pub executed: bool,
    /// Sum of the confirming members' votes
    pub confirmations: U256,
}

impl CouncilTransaction {
    /// An unknown id reads back as an all-zero struct.
    pub fn exists(&self) -> bool {
        !self.target.is_zero()
    }

    pub fn is_executable(&self, quorum: U256) -> bool {
        !self.executed && self.confirmations >= quorum
    }
}

/// Work the council was asked to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CouncilRequest {
    /// The Colosseum asked the council to validate a challenged output.
    Validation {
        transaction_id: TransactionId,
        output_root: B256,
        l2_block_number: U256,
        block_number: u64,
        log_index: u64,
    },
    /// A guardian asked for an output to be deleted.
    Deletion {
        transaction_id: TransactionId,
        output_index: U256,
        block_number: u64,
        log_index: u64,
    },
}

impl CouncilRequest {
    pub const fn transaction_id(&self) -> TransactionId {
        match self {
            Self::Validation { transaction_id, .. } | Self::Deletion { transaction_id, .. } => {
                *transaction_id
            }
        }
    }

    /// L1 block the request was emitted in.
    pub const fn block_number(&self) -> u64 {
        match self {
            Self::Validation { block_number, .. } | Self::Deletion { block_number, .. } => {
                *block_number
            }
        }
    }

    /// Position of the request's log within its block.
    pub const fn log_index(&self) -> u64 {
        match self {
            Self::Validation { log_index, .. } | Self::Deletion { log_index, .. } => *log_index,
        }
    }
}

impl fmt::Display for CouncilRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation {
                transaction_id,
                output_root,
                l2_block_number,
                ..
            } => write!(
                f,
                "validation tx={} output_root={} l2_block={}",
                transaction_id, output_root, l2_block_number
            ),
            Self::Deletion {
                transaction_id,
                output_index,
                ..
            } => write!(f, "deletion tx={} output_index={}", transaction_id, output_index),
        }
    }
}

/// Weight still missing before `confirmations` reaches `quorum`.
pub fn confirmations_needed(quorum: U256, confirmations: U256) -> U256 {
    quorum.saturating_sub(confirmations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(confirmations: u64, executed: bool) -> CouncilTransaction {
        CouncilTransaction {
            id: U256::from(3),
            target: Address::repeat_byte(0x42),
            value: U256::ZERO,
            data: Bytes::from(vec![0xab]),
            executed,
            confirmations: U256::from(confirmations),
        }
    }

    #[test]
    fn test_confirmations_needed_saturates() {
        assert_eq!(
            confirmations_needed(U256::from(5), U256::from(2)),
            U256::from(3)
        );
        assert_eq!(confirmations_needed(U256::from(5), U256::from(9)), U256::ZERO);
    }

    #[test]
    fn test_executable() {
        let quorum = U256::from(3);
        assert!(transaction(3, false).is_executable(quorum));
        assert!(!transaction(2, false).is_executable(quorum));
        assert!(!transaction(5, true).is_executable(quorum));
    }

    #[test]
    fn test_unknown_transaction() {
        let mut tx = transaction(0, false);
        assert!(tx.exists());
        tx.target = Address::ZERO;
        assert!(!tx.exists());
    }

    #[test]
    fn test_request_accessors() {
        let request = CouncilRequest::Deletion {
            transaction_id: U256::from(9),
            output_index: U256::from(120),
            block_number: 77,
            log_index: 4,
        };
        assert_eq!(request.transaction_id(), U256::from(9));
        assert_eq!(request.block_number(), 77);
        assert_eq!(request.log_index(), 4);
        assert_eq!(request.to_string(), "deletion tx=9 output_index=120");
    }
}
