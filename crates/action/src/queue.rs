//! Queue a succeeded proposal in the timelock.

use crate::{find_event, send_transaction, Action, SignerFn};
use alloy_primitives::Address;
use alloy_provider::Provider;
use binding::UpgradeGovernor;
use governance::{GovernorStateProvider, Proposal, ProposalState};
use tracing::info;

/// Input shared by queue and execute: the full proposal is needed because
/// the governor rehashes it.
#[derive(Debug, Clone)]
pub struct Queue {
    pub governor: Address,
    /// Sender, must match the signer
    pub from: Address,
    pub proposal: Proposal,
}

pub struct QueueAction<P> {
    provider: P,
    signer: SignerFn,
    action: Queue,
}

impl<P> QueueAction<P>
where
    P: Provider + Clone,
{
    pub fn new(provider: P, signer: SignerFn, action: Queue) -> Self {
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
}

impl<P> Action for QueueAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        Ok(self.proposal_state().await? == ProposalState::Succeeded)
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        Ok(matches!(
            self.proposal_state().await?,
            ProposalState::Queued | ProposalState::Executed
        ))
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.action.proposal.validate()?;

        let state = self.proposal_state().await?;
        if state != ProposalState::Succeeded {
            eyre::bail!("Proposal is {}, queueing requires succeeded", state);
        }

        let proposal = &self.action.proposal;
        let contract = UpgradeGovernor::new(self.action.governor, &self.provider);
        let tx_request = contract
            .queue(
                proposal.targets.clone(),
                proposal.values.clone(),
                proposal.calldatas.clone(),
                proposal.description_hash(),
            )
            .into_transaction_request();

        let receipt =
            send_transaction(&self.provider, &self.signer, tx_request, self.action.from).await?;

        if let Some(queued) =
            find_event::<UpgradeGovernor::ProposalQueued>(&receipt, self.action.governor)
        {
            info!(
                tx_hash = %receipt.transaction_hash,
                proposal_id = %queued.proposalId,
                eta = %queued.eta,
                "Proposal queued"
            );
        }

        Ok(crate::Result::from_receipt(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Queue proposal {} on governor {}",
            self.action.proposal.id(),
            self.action.governor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_signer, mocked, push_state, MockProvider};
    use alloy_primitives::{Bytes, U256};

    fn queue() -> Queue {
        Queue {
            governor: Address::repeat_byte(1),
            from: Address::repeat_byte(2),
            proposal: Proposal::single(Address::repeat_byte(3), U256::ZERO, Bytes::new(), "Queue me"),
        }
    }

    #[tokio::test]
    async fn test_ready_only_when_succeeded() {
        for (state, ready) in [
            (ProposalState::Succeeded, true),
            (ProposalState::Active, false),
            (ProposalState::Defeated, false),
            (ProposalState::Queued, false),
        ] {
            let (asserter, provider) = mocked();
            push_state(&asserter, state);

            let action = QueueAction::new(provider, mock_signer(), queue());
            assert_eq!(action.is_ready().await.unwrap(), ready, "{state}");
        }
    }

    #[tokio::test]
    async fn test_completed_once_queued_or_executed() {
        for (state, completed) in [
            (ProposalState::Queued, true),
            (ProposalState::Executed, true),
            (ProposalState::Succeeded, false),
            (ProposalState::Expired, false),
        ] {
            let (asserter, provider) = mocked();
            push_state(&asserter, state);

            let action = QueueAction::new(provider, mock_signer(), queue());
            assert_eq!(action.is_completed().await.unwrap(), completed, "{state}");
        }
    }

    #[test]
    fn test_description_contains_local_id() {
        let proposal = Proposal::single(
            Address::repeat_byte(3),
            U256::ZERO,
            Bytes::new(),
            "Queue me",
        );
        let id = proposal.id();

        let action = QueueAction::new(
            MockProvider,
            mock_signer(),
            Queue {
                governor: Address::repeat_byte(1),
                from: Address::repeat_byte(2),
                proposal,
            },
        );

        assert!(action.description().contains(&id.to_string()));
    }
}
