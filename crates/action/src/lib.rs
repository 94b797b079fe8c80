//! Governance, council, vault and token factory transactions.
//!
//! Every write goes through the same path: build the call, fill it against
//! the provider, sign it with a [`SignerFn`] and broadcast the raw bytes.

pub mod confirm;
pub mod execute;
pub mod propose;
pub mod queue;
pub mod token;
pub mod vault;
pub mod vote;

use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::Provider;
use alloy_rpc_types::{Log, TransactionReceipt, TransactionRequest};
use alloy_sol_types::SolEvent;
pub use client::{fill_transaction, SignerFn};
use std::future::Future;
use tracing::debug;

/// Trait for executable onchain actions.
pub trait Action: Send + Sync {
    /// Check to see if the action is ready to be executed.
    ///
    /// Returns true if all preconditions are met.
    fn is_ready(&self) -> impl Future<Output = eyre::Result<bool>> + Send;

    /// Check if the action has already been completed.
    fn is_completed(&self) -> impl Future<Output = eyre::Result<bool>> + Send;

    /// Execute the action.
    fn execute(&mut self) -> impl Future<Output = eyre::Result<Result>> + Send;

    /// Get a human-readable description of this action.
    fn description(&self) -> String;
}

/// Result of an action.
#[derive(Debug, Clone)]
pub struct Result {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block number where transaction was included
    pub block_number: Option<u64>,
    /// Gas used
    pub gas_used: Option<U256>,
}

impl Result {
    fn from_receipt(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: Some(U256::from(receipt.gas_used)),
        }
    }
}

/// Fill, sign and broadcast `tx`, then wait for a successful receipt.
pub(crate) async fn send_transaction<P>(
    provider: &P,
    signer: &SignerFn,
    tx: TransactionRequest,
    from: Address,
) -> eyre::Result<TransactionReceipt>
where
    P: Provider,
{
    let chain_id = provider.get_chain_id().await?;
    let filled_tx = fill_transaction(tx, provider, from, chain_id).await?;

    let signed_tx = signer(filled_tx).await?;

    let pending = provider.send_raw_transaction(&signed_tx).await?;
    debug!(tx_hash = %pending.tx_hash(), "Transaction broadcast");

    let receipt = pending.get_receipt().await?;
    if !receipt.status() {
        eyre::bail!("Transaction reverted");
    }

    Ok(receipt)
}

/// First `E` emitted by `emitter` in the receipt.
pub(crate) fn find_event<E: SolEvent>(receipt: &TransactionReceipt, emitter: Address) -> Option<E> {
    find_event_in_logs(receipt.inner.logs(), emitter)
}

fn find_event_in_logs<E: SolEvent>(logs: &[Log], emitter: Address) -> Option<E> {
    logs.iter()
        .filter(|log| log.address() == emitter)
        .find_map(|log| E::decode_log(&log.inner).ok())
        .map(|log| log.data)
}


#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Log as PrimitiveLog;
    use binding::ProtocolVault;

    fn rpc_log(address: Address, event: &ProtocolVault::Withdrawal) -> Log {
        Log {
            inner: PrimitiveLog {
                address,
                data: event.encode_log_data(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_find_event_filters_by_emitter() {
        let vault = Address::repeat_byte(0x0a);
        let event = ProtocolVault::Withdrawal {
            value: U256::from(5),
            to: Address::repeat_byte(1),
            from: vault,
        };
        let other = ProtocolVault::Withdrawal {
            value: U256::from(9),
            ..event.clone()
        };

        let logs = vec![rpc_log(Address::repeat_byte(0x0b), &other), rpc_log(vault, &event)];
        let found: ProtocolVault::Withdrawal = find_event_in_logs(&logs, vault).unwrap();
        assert_eq!(found.value, U256::from(5));

        let missing: Option<ProtocolVault::Withdrawal> =
            find_event_in_logs(&logs, Address::repeat_byte(0x0c));
        assert!(missing.is_none());
    }
}
