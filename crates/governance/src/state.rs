use crate::types::{Proposal, ProposalId, ProposalState, Tally};
use alloy_contract::private::Provider;
use alloy_primitives::{Address, U256};
use alloy_rpc_types_eth::BlockNumberOrTag;
use binding::UpgradeGovernor;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, error, warn};

/// Block range per `eth_getLogs` request (500 block margin under common RPC limits).
const CHUNK_SIZE: u64 = 9_500;

/// A proposal discovered from a `ProposalCreated` log.
#[derive(Debug, Clone)]
pub struct ProposalRecord {
    pub id: ProposalId,
    pub proposer: Address,
    pub proposal: Proposal,
    pub vote_start: U256,
    pub vote_end: U256,
    /// L1 block the proposal was created in
    pub block_number: u64,
}

/// Snapshot of a proposal's on-chain status.
#[derive(Debug, Clone)]
pub struct ProposalInfo {
    pub id: ProposalId,
    pub state: ProposalState,
    pub proposer: Address,
    pub snapshot: U256,
    pub deadline: U256,
    /// Zero unless queued
    pub eta: U256,
    pub tally: Tally,
    /// None while the snapshot is still in the future
    pub quorum: Option<U256>,
}

impl ProposalInfo {
    pub fn quorum_reached(&self) -> Option<bool> {
        self.quorum.map(|q| self.tally.quorum_reached(q))
    }
}

/// Governor configuration read from the contract.
#[derive(Debug, Clone)]
pub struct GovernorParameters {
    pub name: String,
    pub version: String,
    pub counting_mode: String,
    pub voting_delay: U256,
    pub voting_period: U256,
    pub proposal_threshold: U256,
    pub quorum_numerator: U256,
    pub quorum_denominator: U256,
    pub timelock: Address,
    pub token: Address,
}

pub struct GovernorStateProvider<P> {
    provider: P,
    governor: Address,
}

impl<P> GovernorStateProvider<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P, governor: Address) -> Self {
        Self { provider, governor }
    }

    pub const fn governor(&self) -> Address {
        self.governor
    }

    fn contract(&self) -> UpgradeGovernor::UpgradeGovernorInstance<&P> {
        UpgradeGovernor::new(self.governor, &self.provider)
    }

    pub async fn state(&self, id: ProposalId) -> eyre::Result<ProposalState> {
        let raw = self.contract().state(id).call().await?;
        ProposalState::try_from(raw)
    }

    pub async fn tally(&self, id: ProposalId) -> eyre::Result<Tally> {
        let votes = self.contract().proposalVotes(id).call().await?;
        Ok(Tally {
            against: votes.againstVotes,
            for_votes: votes.forVotes,
            abstain: votes.abstainVotes,
        })
    }

    /// Current timepoint of the governor clock.
    pub async fn clock(&self) -> eyre::Result<u64> {
        let clock = self.contract().clock().call().await?;
        Ok(clock.to::<u64>())
    }

    /// Quorum required for a proposal, read at its snapshot.
    ///
    /// `quorum(timepoint)` only answers for past timepoints, so this returns
    /// `None` while the snapshot has not been reached yet.
    pub async fn quorum_at_snapshot(&self, id: ProposalId) -> eyre::Result<Option<U256>> {
        let contract = self.contract();
        let snapshot = contract.proposalSnapshot(id).call().await?;
        if snapshot.is_zero() {
            eyre::bail!("Unknown proposal id: {}", id);
        }

        let clock = U256::from(self.clock().await?);
        if snapshot >= clock {
            debug!(%id, %snapshot, %clock, "Snapshot not reached, quorum unknown");
            return Ok(None);
        }

        let quorum = contract.quorum(snapshot).call().await?;
        Ok(Some(quorum))
    }

    /// Collect everything the governor knows about a proposal.
    pub async fn proposal_info(&self, id: ProposalId) -> eyre::Result<ProposalInfo> {
        let contract = self.contract();

        let state = self.state(id).await?;
        let proposer = contract.proposalProposer(id).call().await?;
        let snapshot = contract.proposalSnapshot(id).call().await?;
        let deadline = contract.proposalDeadline(id).call().await?;
        let eta = contract.proposalEta(id).call().await?;
        let tally = self.tally(id).await?;

        // Canceled proposals can still have a future snapshot.
        let clock = U256::from(self.clock().await?);
        let quorum = if snapshot >= clock {
            None
        } else {
            Some(contract.quorum(snapshot).call().await?)
        };

        debug!(%id, %state, %snapshot, %deadline, "Queried proposal");

        Ok(ProposalInfo {
            id,
            state,
            proposer,
            snapshot,
            deadline,
            eta,
            tally,
            quorum,
        })
    }

    pub async fn has_voted(&self, id: ProposalId, account: Address) -> eyre::Result<bool> {
        let voted = self.contract().hasVoted(id, account).call().await?;
        Ok(voted)
    }

    /// Voting power of `account` at a past timepoint.
    pub async fn voting_power(&self, account: Address, timepoint: u64) -> eyre::Result<U256> {
        let votes = self
            .contract()
            .getVotes(account, U256::from(timepoint))
            .call()
            .await?;
        Ok(votes)
    }

    pub async fn proposal_threshold(&self) -> eyre::Result<U256> {
        let threshold = self.contract().proposalThreshold().call().await?;
        Ok(threshold)
    }

    pub async fn parameters(&self) -> eyre::Result<GovernorParameters> {
        let contract = self.contract();

        Ok(GovernorParameters {
            name: contract.name().call().await?,
            version: contract.version().call().await?,
            counting_mode: contract.COUNTING_MODE().call().await?,
            voting_delay: contract.votingDelay().call().await?,
            voting_period: contract.votingPeriod().call().await?,
            proposal_threshold: contract.proposalThreshold().call().await?,
            quorum_numerator: contract.quorumNumerator_1().call().await?,
            quorum_denominator: contract.quorumDenominator().call().await?,
            timelock: contract.timelock().call().await?,
            token: contract.token().call().await?,
        })
    }

    /// Get all proposals created in the given block range.
    ///
    /// Both endpoints are resolved to concrete block numbers first so that the
    /// scan works on one consistent snapshot. The range is scanned in chunks,
    /// each retried with exponential backoff.
    pub async fn get_proposals(
        &self,
        from_block: BlockNumberOrTag,
        to_block: BlockNumberOrTag,
    ) -> eyre::Result<Vec<ProposalRecord>> {
        let from_block_num = self.resolve_block_number(from_block).await?;
        let to_block_num = self.resolve_block_number(to_block).await?;

        if from_block_num > to_block_num {
            return Err(eyre::eyre!(
                "from_block ({}) must be <= to_block ({})",
                from_block_num,
                to_block_num
            ));
        }

        debug!(
            from = from_block_num,
            to = to_block_num,
            governor = %self.governor,
            "Scanning for proposals"
        );

        let mut proposals = Vec::new();
        let mut current = from_block_num;

        while current <= to_block_num {
            let chunk_end = current.saturating_add(CHUNK_SIZE - 1).min(to_block_num);
            proposals.extend(self.scan_chunk_with_retry(current, chunk_end).await?);
            current = chunk_end + 1;
        }

        Ok(proposals)
    }

    async fn resolve_block_number(&self, block: BlockNumberOrTag) -> eyre::Result<u64> {
        match block {
            BlockNumberOrTag::Number(n) => Ok(n),
            BlockNumberOrTag::Earliest => Ok(0),
            BlockNumberOrTag::Latest => Ok(self.provider.get_block_number().await?),
            _ => Err(eyre::eyre!("Unsupported block tag: {:?}", block)),
        }
    }

    async fn scan_chunk_with_retry(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> eyre::Result<Vec<ProposalRecord>> {
        // 100ms, 200ms, 400ms, 800ms, 1.6s
        let retry_strategy = ExponentialBackoff::from_millis(2)
            .factor(50)
            .take(5);

        Retry::spawn(retry_strategy, || async {
            self.scan_chunk(from_block, to_block).await.map_err(|e| {
                warn!(
                    from = from_block,
                    to = to_block,
                    error = %e,
                    "Proposal scan failed, will retry"
                );
                e
            })
        })
        .await
    }

    async fn scan_chunk(&self, from_block: u64, to_block: u64) -> eyre::Result<Vec<ProposalRecord>> {
        let events = self
            .contract()
            .ProposalCreated_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query()
            .await?;

        let mut proposals = Vec::with_capacity(events.len());
        for (event, log) in events {
            let proposal = Proposal {
                targets: event.targets,
                values: event.values,
                calldatas: event.calldatas,
                description: event.description,
            };

            let computed_id = proposal.id();
            if computed_id != event.proposalId {
                error!(
                    block = ?log.block_number,
                    computed_id = %computed_id,
                    proposal_id = %event.proposalId,
                    "Proposal id mismatch, skipping"
                );
                continue;
            }

            proposals.push(ProposalRecord {
                id: event.proposalId,
                proposer: event.proposer,
                proposal,
                vote_start: event.voteStart,
                vote_end: event.voteEnd,
                block_number: log.block_number.unwrap_or_default(),
            });
        }

        Ok(proposals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, Log as PrimitiveLog};
    use alloy_provider::ProviderBuilder;
    use alloy_rpc_types_eth::Log;
    use alloy_sol_types::{SolEvent, SolValue};
    use alloy_transport::mock::Asserter;

    fn governor() -> Address {
        Address::repeat_byte(0x99)
    }

    fn mocked() -> (Asserter, GovernorStateProvider<impl Provider + Clone>) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
        (asserter, GovernorStateProvider::new(provider, governor()))
    }

    fn push_return<T: SolValue>(asserter: &Asserter, value: T)
    where
        for<'a> <T::SolType as alloy_sol_types::SolType>::Token<'a>:
            alloy_sol_types::abi::TokenSeq<'a>,
    {
        asserter.push_success(&Bytes::from(value.abi_encode_params()));
    }

    fn proposal(description: &str) -> Proposal {
        Proposal::single(Address::repeat_byte(0x33), U256::ZERO, Bytes::new(), description)
    }

    fn created_log(id: ProposalId, proposal: &Proposal, block: u64) -> Log {
        let event = UpgradeGovernor::ProposalCreated {
            proposalId: id,
            proposer: Address::repeat_byte(0x44),
            targets: proposal.targets.clone(),
            values: proposal.values.clone(),
            signatures: vec![String::new(); proposal.targets.len()],
            calldatas: proposal.calldatas.clone(),
            voteStart: U256::from(block + 1),
            voteEnd: U256::from(block + 100),
            description: proposal.description.clone(),
        };

        Log {
            inner: PrimitiveLog {
                address: governor(),
                data: event.encode_log_data(),
            },
            block_number: Some(block),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_state_decodes_enum() {
        let (asserter, state) = mocked();
        push_return(&asserter, (U256::from(4u8),));

        let result = state.state(U256::from(1)).await.unwrap();
        assert_eq!(result, ProposalState::Succeeded);
    }

    #[tokio::test]
    async fn test_tally_maps_vote_counts() {
        let (asserter, state) = mocked();
        push_return(
            &asserter,
            (U256::from(5), U256::from(10), U256::from(2)),
        );

        let tally = state.tally(U256::from(1)).await.unwrap();
        assert_eq!(tally.against, U256::from(5));
        assert_eq!(tally.for_votes, U256::from(10));
        assert_eq!(tally.abstain, U256::from(2));
    }

    #[tokio::test]
    async fn test_quorum_unknown_before_snapshot() {
        let (asserter, state) = mocked();
        // proposalSnapshot
        push_return(&asserter, (U256::from(1_000),));
        // clock
        push_return(&asserter, (U256::from(900),));

        let quorum = state.quorum_at_snapshot(U256::from(7)).await.unwrap();
        assert_eq!(quorum, None);
    }

    #[tokio::test]
    async fn test_quorum_after_snapshot() {
        let (asserter, state) = mocked();
        push_return(&asserter, (U256::from(1_000),));
        push_return(&asserter, (U256::from(1_001),));
        push_return(&asserter, (U256::from(42),));

        let quorum = state.quorum_at_snapshot(U256::from(7)).await.unwrap();
        assert_eq!(quorum, Some(U256::from(42)));
    }

    #[tokio::test]
    async fn test_quorum_unknown_proposal() {
        let (asserter, state) = mocked();
        push_return(&asserter, (U256::ZERO,));

        let err = state.quorum_at_snapshot(U256::from(7)).await.unwrap_err();
        assert!(err.to_string().contains("Unknown proposal id"));
    }

    #[tokio::test]
    async fn test_proposal_info_canceled_before_snapshot() {
        let (asserter, state) = mocked();
        // state: Canceled
        push_return(&asserter, (U256::from(2u8),));
        // proposalProposer
        push_return(&asserter, (Address::repeat_byte(0x44),));
        // proposalSnapshot, proposalDeadline, proposalEta
        push_return(&asserter, (U256::from(1_000),));
        push_return(&asserter, (U256::from(2_000),));
        push_return(&asserter, (U256::ZERO,));
        // proposalVotes
        push_return(&asserter, (U256::ZERO, U256::ZERO, U256::ZERO));
        // clock
        push_return(&asserter, (U256::from(900),));
        // a quorum lookup at the future snapshot would revert
        asserter.push_failure_msg("execution reverted: ERC20Votes: future lookup");

        let info = state.proposal_info(U256::from(7)).await.unwrap();
        assert_eq!(info.state, ProposalState::Canceled);
        assert_eq!(info.quorum, None);
        assert_eq!(info.quorum_reached(), None);
    }

    #[tokio::test]
    async fn test_proposal_info_reads_quorum_after_snapshot() {
        let (asserter, state) = mocked();
        push_return(&asserter, (U256::from(1u8),));
        push_return(&asserter, (Address::repeat_byte(0x44),));
        push_return(&asserter, (U256::from(1_000),));
        push_return(&asserter, (U256::from(2_000),));
        push_return(&asserter, (U256::ZERO,));
        push_return(&asserter, (U256::from(1), U256::from(50), U256::ZERO));
        push_return(&asserter, (U256::from(1_500),));
        // quorum(snapshot)
        push_return(&asserter, (U256::from(40),));

        let info = state.proposal_info(U256::from(7)).await.unwrap();
        assert_eq!(info.state, ProposalState::Active);
        assert_eq!(info.proposer, Address::repeat_byte(0x44));
        assert_eq!(info.quorum, Some(U256::from(40)));
        assert_eq!(info.quorum_reached(), Some(true));
    }

    #[tokio::test]
    async fn test_get_proposals_skips_mismatched_id() {
        let (asserter, state) = mocked();
        let good = proposal("Upgrade the vault");
        let tampered = proposal("Upgrade the factory");

        asserter.push_success(&vec![
            created_log(good.id(), &good, 10),
            created_log(good.id(), &tampered, 11),
        ]);

        let records = state
            .get_proposals(BlockNumberOrTag::Number(0), BlockNumberOrTag::Number(100))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, good.id());
        assert_eq!(records[0].proposal, good);
        assert_eq!(records[0].block_number, 10);
        assert_eq!(records[0].vote_start, U256::from(11));
    }

    #[tokio::test]
    async fn test_get_proposals_scans_in_chunks() {
        let (asserter, state) = mocked();
        let first = proposal("First");
        let second = proposal("Second");

        // [0, 9_499] and [9_500, 9_500]
        asserter.push_success(&vec![created_log(first.id(), &first, 5)]);
        asserter.push_success(&vec![created_log(second.id(), &second, 9_500)]);

        let records = state
            .get_proposals(BlockNumberOrTag::Number(0), BlockNumberOrTag::Number(9_500))
            .await
            .unwrap();

        let blocks: Vec<_> = records.iter().map(|r| r.block_number).collect();
        assert_eq!(blocks, vec![5, 9_500]);
        assert_eq!(records[1].id, second.id());
    }

    #[tokio::test]
    async fn test_get_proposals_rejects_inverted_range() {
        let (_asserter, state) = mocked();
        let err = state
            .get_proposals(BlockNumberOrTag::Number(10), BlockNumberOrTag::Number(5))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("must be <="));
    }

    #[tokio::test]
    async fn test_get_proposals_rejects_unsupported_tag() {
        let (_asserter, state) = mocked();
        let err = state
            .get_proposals(BlockNumberOrTag::Pending, BlockNumberOrTag::Number(5))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported block tag"));
    }
}
