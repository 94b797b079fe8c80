//! Cast a vote on an active proposal.

use crate::{find_event, send_transaction, Action, SignerFn};
use alloy_primitives::Address;
use alloy_provider::Provider;
use binding::UpgradeGovernor;
use governance::{GovernorStateProvider, ProposalId, ProposalState, VoteSupport};
use tracing::info;

/// Input for a vote action.
#[derive(Debug, Clone)]
pub struct Vote {
    pub governor: Address,
    /// Voting account, must match the signer
    pub voter: Address,
    pub proposal_id: ProposalId,
    pub support: VoteSupport,
    /// Recorded on-chain through `castVoteWithReason` when set
    pub reason: Option<String>,
}

pub struct VoteAction<P> {
    provider: P,
    signer: SignerFn,
    action: Vote,
}

impl<P> VoteAction<P>
where
    P: Provider + Clone,
{
    pub fn new(provider: P, signer: SignerFn, action: Vote) -> Self {
        Self {
            provider,
            signer,
            action,
        }
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.action.governor == Address::ZERO {
            eyre::bail!("Governor must not be zero");
        }

        if self.action.voter == Address::ZERO {
            eyre::bail!("Voter must not be zero");
        }

        if self.action.proposal_id.is_zero() {
            eyre::bail!("Proposal id must not be zero");
        }

        Ok(())
    }

    fn state(&self) -> GovernorStateProvider<P> {
        GovernorStateProvider::new(self.provider.clone(), self.action.governor)
    }
}

impl<P> Action for VoteAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        let state = self.state();
        if state.state(self.action.proposal_id).await? != ProposalState::Active {
            return Ok(false);
        }

        Ok(!self.is_completed().await?)
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        self.state()
            .has_voted(self.action.proposal_id, self.action.voter)
            .await
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.validate()?;

        let current = self.state().state(self.action.proposal_id).await?;
        if current != ProposalState::Active {
            eyre::bail!("Proposal is {}, voting requires active", current);
        }

        if self.is_completed().await? {
            eyre::bail!("Voter {} already voted", self.action.voter);
        }

        let contract = UpgradeGovernor::new(self.action.governor, &self.provider);
        let support = self.action.support.as_u8();
        let tx_request = match &self.action.reason {
            Some(reason) => contract
                .castVoteWithReason(self.action.proposal_id, support, reason.clone())
                .into_transaction_request(),
            None => contract
                .castVote(self.action.proposal_id, support)
                .into_transaction_request(),
        };

        let receipt =
            send_transaction(&self.provider, &self.signer, tx_request, self.action.voter).await?;

        if let Some(cast) = find_event::<UpgradeGovernor::VoteCast>(&receipt, self.action.governor) {
            info!(
                tx_hash = %receipt.transaction_hash,
                proposal_id = %cast.proposalId,
                support = cast.support,
                weight = %cast.weight,
                "Vote cast"
            );
        }

        Ok(crate::Result::from_receipt(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Vote {:?} on proposal {} as {}",
            self.action.support, self.action.proposal_id, self.action.voter
        )
    }
}
