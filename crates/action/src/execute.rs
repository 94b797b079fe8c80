//! Execute a queued proposal once its timelock delay has passed.

use crate::{send_transaction, Action, SignerFn};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::BlockNumberOrTag;
use binding::UpgradeGovernor;
use governance::{GovernorStateProvider, ProposalState};
use tracing::info;

pub use crate::queue::Queue as Execute;

pub struct ExecuteAction<P> {
    provider: P,
    signer: SignerFn,
    action: Execute,
}

impl<P> ExecuteAction<P>
where
    P: Provider + Clone,
{
    pub fn new(provider: P, signer: SignerFn, action: Execute) -> Self {
        Self {
            provider,
            signer,
            action,
        }
    }

    async fn proposal_state(&self) -> eyre::Result<ProposalState> {
        GovernorStateProvider::new(self.provider.clone(), self.action.governor)
            .state(self.action.proposal.id())
            .await
    }

    /// Whether the latest block is past the proposal's timelock eta.
    async fn eta_passed(&self) -> eyre::Result<bool> {
        let contract = UpgradeGovernor::new(self.action.governor, &self.provider);
        let eta = contract
            .proposalEta(self.action.proposal.id())
            .call()
            .await?;
        if eta.is_zero() {
            return Ok(false);
        }

        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await?
            .ok_or_else(|| eyre::eyre!("Latest block not found"))?;

        Ok(U256::from(block.header.timestamp) >= eta)
    }
}

impl<P> Action for ExecuteAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.proposal_state().await? != ProposalState::Queued {
            return Ok(false);
        }

        self.eta_passed().await
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        Ok(self.proposal_state().await? == ProposalState::Executed)
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.action.proposal.validate()?;

        let state = self.proposal_state().await?;
        if state != ProposalState::Queued {
            eyre::bail!("Proposal is {}, execution requires queued", state);
        }

        if !self.eta_passed().await? {
            eyre::bail!("Timelock delay has not passed");
        }

        let proposal = &self.action.proposal;
        let contract = UpgradeGovernor::new(self.action.governor, &self.provider);
        let tx_request = contract
            .execute(
                proposal.targets.clone(),
                proposal.values.clone(),
                proposal.calldatas.clone(),
                proposal.description_hash(),
            )
            .into_transaction_request();

        let receipt =
            send_transaction(&self.provider, &self.signer, tx_request, self.action.from).await?;

        info!(
            tx_hash = %receipt.transaction_hash,
            proposal_id = %proposal.id(),
            block_number = receipt.block_number,
            "Proposal executed"
        );

        Ok(crate::Result::from_receipt(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Execute proposal {} on governor {}",
            self.action.proposal.id(),
            self.action.governor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_signer, mocked, push_return, push_state, MockProvider};
    use alloy_primitives::Bytes;
    use alloy_rpc_types_eth::Block;
    use alloy_transport::mock::Asserter;
    use governance::Proposal;

    fn execute() -> Execute {
        Execute {
            governor: Address::repeat_byte(1),
            from: Address::repeat_byte(2),
            proposal: Proposal::single(Address::repeat_byte(3), U256::ZERO, Bytes::new(), "x"),
        }
    }

    fn push_latest_block(asserter: &Asserter, timestamp: u64) {
        let mut block: Block = Block::default();
        block.header.inner.timestamp = timestamp;
        asserter.push_success(&block);
    }

    #[tokio::test]
    async fn test_ready_once_eta_passed() {
        for (timestamp, ready) in [(1_500, true), (1_000, true), (999, false)] {
            let (asserter, provider) = mocked();
            push_state(&asserter, ProposalState::Queued);
            // proposalEta
            push_return(&asserter, (U256::from(1_000),));
            push_latest_block(&asserter, timestamp);

            let action = ExecuteAction::new(provider, mock_signer(), execute());
            assert_eq!(action.is_ready().await.unwrap(), ready, "timestamp {timestamp}");
        }
    }

    #[tokio::test]
    async fn test_not_ready_without_eta() {
        let (asserter, provider) = mocked();
        push_state(&asserter, ProposalState::Queued);
        push_return(&asserter, (U256::ZERO,));

        let action = ExecuteAction::new(provider, mock_signer(), execute());
        assert!(!action.is_ready().await.unwrap());
    }

    #[tokio::test]
    async fn test_not_ready_unless_queued() {
        let (asserter, provider) = mocked();
        push_state(&asserter, ProposalState::Succeeded);

        let action = ExecuteAction::new(provider, mock_signer(), execute());
        assert!(!action.is_ready().await.unwrap());
    }

    #[tokio::test]
    async fn test_completed_when_executed() {
        let (asserter, provider) = mocked();
        push_state(&asserter, ProposalState::Executed);
        push_state(&asserter, ProposalState::Queued);

        let action = ExecuteAction::new(provider, mock_signer(), execute());
        assert!(action.is_completed().await.unwrap());
        assert!(!action.is_completed().await.unwrap());
    }

    #[test]
    fn test_description() {
        let action = ExecuteAction::new(MockProvider, mock_signer(), execute());

        let desc = action.description();
        assert!(desc.starts_with("Execute proposal"));
        assert!(desc.contains("0x0101010101010101010101010101010101010101"));
    }
}
