use crate::types::{CouncilRequest, CouncilTransaction, TransactionId};
use alloy_contract::private::Provider;
use alloy_primitives::{Address, U256};
use alloy_rpc_types_eth::BlockNumberOrTag;
use binding::SecurityCouncil;
use std::future::Future;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, warn};

/// Block range per `eth_getLogs` request.
const CHUNK_SIZE: u64 = 9_500;

pub struct CouncilStateProvider<P> {
    provider: P,
    council: Address,
}

impl<P> CouncilStateProvider<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, council: Address) -> Self {
        Self { provider, council }
    }

    pub const fn council(&self) -> Address {
        self.council
    }

    fn contract(&self) -> SecurityCouncil::SecurityCouncilInstance<&P> {
        SecurityCouncil::new(self.council, &self.provider)
    }

    pub async fn transaction(&self, id: TransactionId) -> eyre::Result<CouncilTransaction> {
        let contract = self.contract();
        let tx = contract.transactions(id).call().await?;
        let confirmations = contract.getConfirmationCount(id).call().await?;

        Ok(CouncilTransaction {
            id,
            target: tx.target,
            value: tx.value,
            data: tx.data,
            executed: tx.executed,
            confirmations,
        })
    }

    pub async fn confirmation_count(&self, id: TransactionId) -> eyre::Result<U256> {
        let count = self.contract().getConfirmationCount(id).call().await?;
        Ok(count)
    }

    pub async fn is_confirmed(&self, id: TransactionId) -> eyre::Result<bool> {
        let confirmed = self.contract().isConfirmed(id).call().await?;
        Ok(confirmed)
    }

    pub async fn is_confirmed_by(&self, id: TransactionId, account: Address) -> eyre::Result<bool> {
        let confirmed = self.contract().isConfirmedBy(id, account).call().await?;
        Ok(confirmed)
    }

    pub async fn quorum(&self) -> eyre::Result<U256> {
        let quorum = self.contract().quorum().call().await?;
        Ok(quorum)
    }

    /// Council transactions submitted in the range that are not executed yet.
    pub async fn pending_transactions(
        &self,
        from_block: BlockNumberOrTag,
        to_block: BlockNumberOrTag,
    ) -> eyre::Result<Vec<CouncilTransaction>> {
        let (from, to) = self.resolve_range(from_block, to_block).await?;

        let submitted = self
            .scan_chunks(from, to, |start, end| self.scan_submitted(start, end))
            .await?;

        let mut pending = Vec::new();
        for id in submitted {
            let tx = self.transaction(id).await?;
            if tx.executed {
                continue;
            }
            pending.push(tx);
        }

        debug!(count = pending.len(), council = %self.council, "Found pending council transactions");

        Ok(pending)
    }

    /// Validation and deletion requests emitted in the range, in log order.
    pub async fn requests(
        &self,
        from_block: BlockNumberOrTag,
        to_block: BlockNumberOrTag,
    ) -> eyre::Result<Vec<CouncilRequest>> {
        let (from, to) = self.resolve_range(from_block, to_block).await?;

        let mut requests = self
            .scan_chunks(from, to, |start, end| self.scan_requests(start, end))
            .await?;
        requests.sort_by_key(|request| (request.block_number(), request.log_index()));

        Ok(requests)
    }

    async fn resolve_range(
        &self,
        from_block: BlockNumberOrTag,
        to_block: BlockNumberOrTag,
    ) -> eyre::Result<(u64, u64)> {
        let from = self.resolve_block_number(from_block).await?;
        let to = self.resolve_block_number(to_block).await?;

        if from > to {
            return Err(eyre::eyre!(
                "from_block ({}) must be <= to_block ({})",
                from,
                to
            ));
        }

        Ok((from, to))
    }

    async fn resolve_block_number(&self, block: BlockNumberOrTag) -> eyre::Result<u64> {
        match block {
            BlockNumberOrTag::Number(n) => Ok(n),
            BlockNumberOrTag::Earliest => Ok(0),
            BlockNumberOrTag::Latest => Ok(self.provider.get_block_number().await?),
            _ => Err(eyre::eyre!("Unsupported block tag: {:?}", block)),
        }
    }

    /// Run `scan` over `[from, to]` in chunks, retrying each chunk.
    async fn scan_chunks<T, F, Fut>(&self, from: u64, to: u64, scan: F) -> eyre::Result<Vec<T>>
    where
        F: Fn(u64, u64) -> Fut,
        Fut: Future<Output = eyre::Result<Vec<T>>>,
    {
        let mut items = Vec::new();
        let mut current = from;

        while current <= to {
            let chunk_end = current.saturating_add(CHUNK_SIZE - 1).min(to);

            // 100ms, 200ms, 400ms, 800ms, 1.6s
            let retry_strategy = ExponentialBackoff::from_millis(2).factor(50).take(5);
            let chunk = Retry::spawn(retry_strategy, || async {
                scan(current, chunk_end).await.map_err(|e| {
                    warn!(
                        from = current,
                        to = chunk_end,
                        error = %e,
                        "Council log scan failed, will retry"
                    );
                    e
                })
            })
            .await?;

            items.extend(chunk);
            current = chunk_end + 1;
        }

        Ok(items)
    }

    async fn scan_submitted(&self, from_block: u64, to_block: u64) -> eyre::Result<Vec<TransactionId>> {
        let events = self
            .contract()
            .TransactionSubmitted_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await?;

        Ok(events
            .into_iter()
            .map(|(event, _)| event.transactionId)
            .collect())
    }

    async fn scan_requests(&self, from_block: u64, to_block: u64) -> eyre::Result<Vec<CouncilRequest>> {
        let contract = self.contract();

        let validations = contract
            .ValidationRequested_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await?;

        let deletions = contract
            .DeletionRequested_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await?;

        let mut requests = Vec::with_capacity(validations.len() + deletions.len());
        requests.extend(validations.into_iter().map(|(event, log)| {
            CouncilRequest::Validation {
                transaction_id: event.transactionId,
                output_root: event.outputRoot,
                l2_block_number: event.l2BlockNumber,
                block_number: log.block_number.unwrap_or_default(),
                log_index: log.log_index.unwrap_or_default(),
            }
        }));
        requests.extend(deletions.into_iter().map(|(event, log)| {
            CouncilRequest::Deletion {
                transaction_id: event.transactionId,
                output_index: event.outputIndex,
                block_number: log.block_number.unwrap_or_default(),
                log_index: log.log_index.unwrap_or_default(),
            }
        }));

        Ok(requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, Log as PrimitiveLog, B256};
    use alloy_provider::ProviderBuilder;
    use alloy_rpc_types_eth::Log;
    use alloy_sol_types::{SolEvent, SolValue};
    use alloy_transport::mock::Asserter;

    fn mocked() -> (Asserter, CouncilStateProvider<impl Provider + Clone>) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
        (
            asserter,
            CouncilStateProvider::new(provider, Address::repeat_byte(0xcc)),
        )
    }

    fn push_return<T: SolValue>(asserter: &Asserter, value: T)
    where
        for<'a> <T::SolType as alloy_sol_types::SolType>::Token<'a>:
            alloy_sol_types::abi::TokenSeq<'a>,
    {
        asserter.push_success(&Bytes::from(value.abi_encode_params()));
    }

    fn rpc_log<E: SolEvent>(event: &E, block: u64, log_index: u64) -> Log {
        Log {
            inner: PrimitiveLog {
                address: Address::repeat_byte(0xcc),
                data: event.encode_log_data(),
            },
            block_number: Some(block),
            log_index: Some(log_index),
            ..Default::default()
        }
    }

    fn submitted(id: u64, block: u64) -> Log {
        let event = SecurityCouncil::TransactionSubmitted {
            sender: Address::repeat_byte(0x01),
            transactionId: U256::from(id),
        };
        rpc_log(&event, block, 0)
    }

    fn push_transaction(asserter: &Asserter, executed: bool, confirmations: u64) {
        push_return(
            asserter,
            (Address::repeat_byte(0x11), executed, U256::ZERO, Bytes::new()),
        );
        push_return(asserter, (U256::from(confirmations),));
    }

    #[tokio::test]
    async fn test_transaction_combines_struct_and_confirmations() {
        let (asserter, state) = mocked();
        let target = Address::repeat_byte(0x11);
        let data = Bytes::from(vec![0xde, 0xad]);

        // transactions(id)
        push_return(&asserter, (target, false, U256::from(0), data.clone()));
        // getConfirmationCount(id)
        push_return(&asserter, (U256::from(4),));

        let tx = state.transaction(U256::from(1)).await.unwrap();
        assert_eq!(tx.target, target);
        assert_eq!(tx.data, data);
        assert!(!tx.executed);
        assert_eq!(tx.confirmations, U256::from(4));
    }

    #[tokio::test]
    async fn test_is_confirmed_by() {
        let (asserter, state) = mocked();
        push_return(&asserter, (true,));

        assert!(state
            .is_confirmed_by(U256::from(1), Address::repeat_byte(0x22))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_pending_transactions_drops_executed() {
        let (asserter, state) = mocked();
        asserter.push_success(&vec![submitted(1, 10), submitted(2, 12)]);
        push_transaction(&asserter, true, 3);
        push_transaction(&asserter, false, 1);

        let pending = state
            .pending_transactions(BlockNumberOrTag::Number(0), BlockNumberOrTag::Number(100))
            .await
            .unwrap();

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, U256::from(2));
        assert_eq!(pending[0].confirmations, U256::from(1));
    }

    #[tokio::test]
    async fn test_pending_transactions_scans_in_chunks() {
        let (asserter, state) = mocked();
        // [100, 9_599] and [9_600, 9_600]
        asserter.push_success(&vec![submitted(1, 150)]);
        asserter.push_success(&vec![submitted(2, 9_600)]);
        push_transaction(&asserter, false, 0);
        push_transaction(&asserter, false, 0);

        let pending = state
            .pending_transactions(BlockNumberOrTag::Number(100), BlockNumberOrTag::Number(9_600))
            .await
            .unwrap();

        let ids: Vec<_> = pending.iter().map(|tx| tx.id).collect();
        assert_eq!(ids, vec![U256::from(1), U256::from(2)]);
    }

    #[tokio::test]
    async fn test_requests_follow_log_order() {
        let (asserter, state) = mocked();
        let validation = |id: u64| SecurityCouncil::ValidationRequested {
            transactionId: U256::from(id),
            outputRoot: B256::repeat_byte(0xab),
            l2BlockNumber: U256::from(1_800),
        };
        let deletion = SecurityCouncil::DeletionRequested {
            transactionId: U256::from(3),
            outputIndex: U256::from(120),
        };

        // validations are queried before deletions
        asserter.push_success(&vec![rpc_log(&validation(1), 5, 3), rpc_log(&validation(2), 2, 0)]);
        asserter.push_success(&vec![rpc_log(&deletion, 5, 1)]);

        let requests = state
            .requests(BlockNumberOrTag::Number(0), BlockNumberOrTag::Number(10))
            .await
            .unwrap();

        let order: Vec<_> = requests
            .iter()
            .map(|r| (r.block_number(), r.log_index(), r.transaction_id()))
            .collect();
        assert_eq!(
            order,
            vec![
                (2, 0, U256::from(2)),
                (5, 1, U256::from(3)),
                (5, 3, U256::from(1)),
            ]
        );
        assert!(matches!(requests[1], CouncilRequest::Deletion { .. }));
    }

    #[tokio::test]
    async fn test_requests_rejects_inverted_range() {
        let (_asserter, state) = mocked();
        let err = state
            .requests(BlockNumberOrTag::Number(100), BlockNumberOrTag::Number(1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("must be <="));
    }
}
