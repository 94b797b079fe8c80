//! ProtocolVault contract bindings.
//!
//! L2 fee vault predeploy. Accumulated fees are swept to `RECIPIENT`, either
//! through the bridge to L1 (`withdraw`) or directly on L2 (`withdrawToL2`),
//! once the balance reaches `MIN_WITHDRAWAL_AMOUNT`.

use alloy_sol_types::sol;

sol! {
    /// ProtocolVault - protocol fee vault
    /// Address: 0x4200000000000000000000000000000000000006 (Kroma L2 predeploy)
    #[sol(rpc)]
    #[derive(Debug)]
    contract ProtocolVault {
        /// Emitted each time a withdrawal occurs
        event Withdrawal(uint256 value, address to, address from);

        constructor(address _recipient);

        receive() external payable;

        /// Minimum balance before a withdrawal can be triggered
        function MIN_WITHDRAWAL_AMOUNT() external view returns (uint256);

        /// Account that receives the withdrawn fees
        function RECIPIENT() external view returns (address);

        /// Total amount of wei processed by the vault
        function totalProcessed() external view returns (uint256);

        function version() external view returns (string memory);

        /// Withdraw the full balance to `RECIPIENT` on L1
        function withdraw() external;

        /// Withdraw the full balance to `RECIPIENT` on L2
        function withdrawToL2() external;
    }
}
