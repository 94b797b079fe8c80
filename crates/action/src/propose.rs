//! Submit a proposal to the UpgradeGovernor.

use crate::{find_event, send_transaction, Action, SignerFn};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use binding::UpgradeGovernor;
use governance::{GovernorStateProvider, Proposal, ProposalId};
use tracing::info;

/// Input for a propose action.
#[derive(Debug, Clone)]
pub struct Propose {
    /// UpgradeGovernor contract address
    pub governor: Address,
    /// Account submitting the proposal, must match the signer
    pub proposer: Address,
    pub proposal: Proposal,
}

pub struct ProposeAction<P> {
    provider: P,
    signer: SignerFn,
    action: Propose,
}

impl<P> ProposeAction<P>
where
    P: Provider + Clone,
{
    pub fn new(provider: P, signer: SignerFn, action: Propose) -> Self {
        Self {
            provider,
            signer,
            action,
        }
    }

    /// Id the governor will assign to this proposal.
    pub fn proposal_id(&self) -> ProposalId {
        self.action.proposal.id()
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.action.governor == Address::ZERO {
            eyre::bail!("Governor must not be zero");
        }

        if self.action.proposer == Address::ZERO {
            eyre::bail!("Proposer must not be zero");
        }

        if self.action.proposal.description.is_empty() {
            eyre::bail!("Description must not be empty");
        }

        self.action.proposal.validate()
    }

    fn state(&self) -> GovernorStateProvider<P> {
        GovernorStateProvider::new(self.provider.clone(), self.action.governor)
    }

    /// Proposer votes at the last finished timepoint and the required threshold.
    pub async fn votes_and_threshold(&self) -> eyre::Result<(U256, U256)> {
        let state = self.state();
        let clock = state.clock().await?;
        let votes = state
            .voting_power(self.action.proposer, clock.saturating_sub(1))
            .await?;
        let threshold = state.proposal_threshold().await?;
        Ok((votes, threshold))
    }
}

impl<P> Action for ProposeAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        self.validate()?;
        if self.is_completed().await? {
            return Ok(false);
        }

        let (votes, threshold) = self.votes_and_threshold().await?;
        Ok(votes >= threshold)
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        let contract = UpgradeGovernor::new(self.action.governor, &self.provider);
        let snapshot = contract.proposalSnapshot(self.proposal_id()).call().await?;
        Ok(!snapshot.is_zero())
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.validate()?;

        if self.is_completed().await? {
            eyre::bail!("Proposal {} already exists", self.proposal_id());
        }

        let (votes, threshold) = self.votes_and_threshold().await?;
        if votes < threshold {
            eyre::bail!(
                "Proposer votes {} below proposal threshold {}",
                votes,
                threshold
            );
        }

        let proposal = &self.action.proposal;
        let contract = UpgradeGovernor::new(self.action.governor, &self.provider);
        let tx_request = contract
            .propose(
                proposal.targets.clone(),
                proposal.values.clone(),
                proposal.calldatas.clone(),
                proposal.description.clone(),
            )
            .into_transaction_request();

        let receipt =
            send_transaction(&self.provider, &self.signer, tx_request, self.action.proposer).await?;

        let created: UpgradeGovernor::ProposalCreated = find_event(&receipt, self.action.governor)
            .ok_or_else(|| eyre::eyre!("ProposalCreated event not found in receipt"))?;

        info!(
            tx_hash = %receipt.transaction_hash,
            proposal_id = %created.proposalId,
            vote_start = %created.voteStart,
            vote_end = %created.voteEnd,
            "Proposal created"
        );

        Ok(crate::Result::from_receipt(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Propose {} call(s) to governor {}: {}",
            self.action.proposal.targets.len(),
            self.action.governor,
            self.action.proposal.description.lines().next().unwrap_or_default()
        )
    }
}
