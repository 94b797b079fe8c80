//! KromaMintableERC20Factory contract bindings.
//!
//! L2 predeploy that deploys bridge-mintable ERC20 representations of L1
//! tokens. Tokens are created with CREATE2, keyed by remote token, name and
//! symbol.

use crate::artifact::{decode_bytecode, ArtifactError};
use alloy_primitives::{keccak256, Address};
use alloy_sol_types::{sol, SolValue};

sol! {
    /// KromaMintableERC20Factory - deploys KromaMintableERC20 tokens
    /// Address: 0x420000000000000000000000000000000000000B (Kroma L2 predeploy)
    #[sol(rpc)]
    #[derive(Debug)]
    contract KromaMintableERC20Factory {
        /// Emitted whenever a KromaMintableERC20 is created
        event KromaMintableERC20Created(
            address indexed localToken,
            address indexed remoteToken,
            address deployer
        );

        constructor(address _bridge);

        /// StandardBridge the created tokens trust for minting
        function BRIDGE() external view returns (address);

        /// Create a KromaMintableERC20 for `_remoteToken`
        function createKromaMintableERC20(
            address _remoteToken,
            string memory _name,
            string memory _symbol
        ) external returns (address);

        function version() external view returns (string memory);
    }
}

/// Creation code of the token contract the factory deploys.
const MINTABLE_ERC20_CODE: &str = include_str!("../artifacts/KromaMintableERC20.hex");

/// Address `createKromaMintableERC20(remote_token, name, symbol)` deploys to.
///
/// The salt is `keccak256(abi.encode(remote_token, name, symbol))` and the
/// token constructor takes `(bridge, remote_token, name, symbol)`.
pub fn mintable_erc20_address(
    factory: Address,
    bridge: Address,
    remote_token: Address,
    name: &str,
    symbol: &str,
) -> Result<Address, ArtifactError> {
    let (name, symbol) = (name.to_string(), symbol.to_string());
    let salt = keccak256((remote_token, name.clone(), symbol.clone()).abi_encode_params());

    let mut init_code = decode_bytecode("KromaMintableERC20", MINTABLE_ERC20_CODE)?.to_vec();
    init_code.extend((bridge, remote_token, name, symbol).abi_encode_params());

    Ok(factory.create2_from_code(salt, init_code))
}
