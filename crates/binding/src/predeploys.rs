//! Kroma L2 predeploy addresses.

use alloy_primitives::{address, Address};

pub const PROXY_ADMIN: Address = address!("0x4200000000000000000000000000000000000000");
pub const WETH9: Address = address!("0x4200000000000000000000000000000000000001");
pub const L1_BLOCK: Address = address!("0x4200000000000000000000000000000000000002");
pub const L2_TO_L1_MESSAGE_PASSER: Address = address!("0x4200000000000000000000000000000000000003");
pub const L2_CROSS_DOMAIN_MESSENGER: Address =
    address!("0x4200000000000000000000000000000000000004");
pub const GAS_PRICE_ORACLE: Address = address!("0x4200000000000000000000000000000000000005");
pub const PROTOCOL_VAULT: Address = address!("0x4200000000000000000000000000000000000006");
pub const L1_FEE_VAULT: Address = address!("0x4200000000000000000000000000000000000007");
pub const VALIDATOR_REWARD_VAULT: Address = address!("0x4200000000000000000000000000000000000008");
pub const L2_STANDARD_BRIDGE: Address = address!("0x4200000000000000000000000000000000000009");
pub const GOVERNANCE_TOKEN: Address = address!("0x4200000000000000000000000000000000000010");
pub const L2_ERC721_BRIDGE: Address = address!("0x420000000000000000000000000000000000000a");
pub const KROMA_MINTABLE_ERC20_FACTORY: Address =
    address!("0x420000000000000000000000000000000000000b");
pub const KROMA_MINTABLE_ERC721_FACTORY: Address =
    address!("0x420000000000000000000000000000000000000c");

/// All predeploys, keyed by contract name.
pub const ALL: [(&str, Address); 14] = [
    ("ProxyAdmin", PROXY_ADMIN),
    ("WETH9", WETH9),
    ("L1Block", L1_BLOCK),
    ("L2ToL1MessagePasser", L2_TO_L1_MESSAGE_PASSER),
    ("L2CrossDomainMessenger", L2_CROSS_DOMAIN_MESSENGER),
    ("GasPriceOracle", GAS_PRICE_ORACLE),
    ("ProtocolVault", PROTOCOL_VAULT),
    ("L1FeeVault", L1_FEE_VAULT),
    ("ValidatorRewardVault", VALIDATOR_REWARD_VAULT),
    ("L2StandardBridge", L2_STANDARD_BRIDGE),
    ("GovernanceToken", GOVERNANCE_TOKEN),
    ("L2ERC721Bridge", L2_ERC721_BRIDGE),
    ("KromaMintableERC20Factory", KROMA_MINTABLE_ERC20_FACTORY),
    ("KromaMintableERC721Factory", KROMA_MINTABLE_ERC721_FACTORY),
];

pub fn by_name(name: &str) -> Option<Address> {
    ALL.iter().find_map(|(n, addr)| (*n == name).then_some(*addr))
}

/// Returns true for predeploys that sit behind a proxy contract.
pub fn is_proxied(predeploy: Address) -> bool {
    predeploy != WETH9
}
