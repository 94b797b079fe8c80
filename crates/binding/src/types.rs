//! Shared `Types` library structs.
//!
//! Mirrors the structs of the Solidity `Types` library that appear in the
//! Kroma contract ABIs, plus the two hashes the contracts compute over them.

use alloy_primitives::{keccak256, B256};
use alloy_sol_types::{sol, SolValue};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    library Types {
        /// RLP-encoded header fields that are not part of the public input
        struct BlockHeaderRLP {
            bytes uncleHash;
            bytes coinbase;
            bytes receiptsRoot;
            bytes logsBloom;
            bytes difficulty;
            bytes gasUsed;
            bytes extraData;
            bytes mixHash;
            bytes nonce;
        }

        /// Bisection challenge between an asserter and a challenger
        struct Challenge {
            uint8 turn;
            uint64 timeoutAt;
            address asserter;
            address challenger;
            bytes32[] segments;
            uint256 segSize;
            uint256 segStart;
            bytes32 l1Head;
        }

        struct OutputRootProof {
            bytes32 version;
            bytes32 stateRoot;
            bytes32 messagePasserStorageRoot;
            bytes32 latestBlockhash;
            bytes32 nextBlockHash;
        }

        struct PublicInput {
            bytes32 blockHash;
            bytes32 parentHash;
            uint64 timestamp;
            uint64 number;
            uint64 gasLimit;
            uint256 baseFee;
            bytes32 transactionsRoot;
            bytes32 stateRoot;
            bytes32 withdrawalsRoot;
            bytes32[] txHashes;
            uint64 blobGasUsed;
            uint64 excessBlobGas;
            bytes32 parentBeaconRoot;
        }

        struct PublicInputProof {
            OutputRootProof srcOutputRootProof;
            OutputRootProof dstOutputRootProof;
            PublicInput publicInput;
            BlockHeaderRLP rlps;
            bytes32 l2ToL1MessagePasserBalance;
            bytes32 l2ToL1MessagePasserCodeHash;
            bytes[] merkleProof;
        }

        /// L2 to L1 withdrawal, hashed into the message passer storage
        struct WithdrawalTransaction {
            uint256 nonce;
            address sender;
            address target;
            uint256 value;
            uint256 gasLimit;
            bytes data;
        }

        /// Output root submitted to the L2OutputOracle
        struct CheckpointOutput {
            address submitter;
            bytes32 outputRoot;
            uint128 timestamp;
            uint128 l2BlockNumber;
        }

        struct Bond {
            uint128 amount;
            uint128 expiresAt;
        }

        struct ZkEvmProof {
            PublicInputProof publicInputProof;
            uint256[] proof;
            uint256[] pair;
        }

        struct ZkVmProof {
            bytes32 zkVmProgramVKey;
            bytes publicValues;
            bytes proofBytes;
        }
    }
}

impl Types::OutputRootProof {
    /// Output root committed by validators.
    ///
    /// `keccak256(version ++ stateRoot ++ messagePasserStorageRoot ++ latestBlockhash ++ nextBlockHash)`
    pub fn output_root(&self) -> B256 {
        let mut buf = [0u8; 160];
        buf[..32].copy_from_slice(self.version.as_slice());
        buf[32..64].copy_from_slice(self.stateRoot.as_slice());
        buf[64..96].copy_from_slice(self.messagePasserStorageRoot.as_slice());
        buf[96..128].copy_from_slice(self.latestBlockhash.as_slice());
        buf[128..].copy_from_slice(self.nextBlockHash.as_slice());
        keccak256(buf)
    }
}

impl Types::WithdrawalTransaction {
    /// Withdrawal hash as computed by `Hashing.hashWithdrawal`.
    pub fn hash(&self) -> B256 {
        // abi.encode of the fields, without the tuple offset
        let encoded = (
            &self.nonce,
            &self.sender,
            &self.target,
            &self.value,
            &self.gasLimit,
            &self.data,
        )
            .abi_encode_sequence();

        keccak256(encoded)
    }
}
