use crate::types::ProposalId;
use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;

pub fn description_hash(description: &str) -> B256 {
    keccak256(description.as_bytes())
}

/// `uint256(keccak256(abi.encode(targets, values, calldatas, descriptionHash)))`
pub fn hash_proposal(
    targets: &[Address],
    values: &[U256],
    calldatas: &[Bytes],
    description_hash: B256,
) -> ProposalId {
    let encoded = (
        targets.to_vec(),
        values.to_vec(),
        calldatas.to_vec(),
        description_hash,
    )
        .abi_encode_params();

    U256::from_be_bytes(keccak256(encoded).0)
}
