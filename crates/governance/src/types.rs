use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type ProposalId = U256;

/// A governance proposal: the calls the timelock will make, plus a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub targets: Vec<Address>,
    pub values: Vec<U256>,
    pub calldatas: Vec<Bytes>,
    pub description: String,
}

impl Proposal {
    /// Proposal with a single call.
    pub fn single(target: Address, value: U256, calldata: Bytes, description: impl Into<String>) -> Self {
        Self {
            targets: vec![target],
            values: vec![value],
            calldatas: vec![calldata],
            description: description.into(),
        }
    }

    /// Reject proposals the governor would revert on.
    pub fn validate(&self) -> eyre::Result<()> {
        if self.targets.is_empty() {
            eyre::bail!("Proposal must contain at least one call");
        }

        if self.targets.len() != self.values.len() {
            eyre::bail!(
                "Invalid proposal length: {} targets, {} values",
                self.targets.len(),
                self.values.len()
            );
        }

        if self.targets.len() != self.calldatas.len() {
            eyre::bail!(
                "Invalid proposal length: {} targets, {} calldatas",
                self.targets.len(),
                self.calldatas.len()
            );
        }

        Ok(())
    }

    /// `keccak256(bytes(description))`, the argument `queue`/`execute`/`cancel` take.
    pub fn description_hash(&self) -> B256 {
        crate::hash::description_hash(&self.description)
    }

    /// Proposal id as computed by `hashProposal`.
    pub fn id(&self) -> ProposalId {
        crate::hash::hash_proposal(
            &self.targets,
            &self.values,
            &self.calldatas,
            self.description_hash(),
        )
    }
}

/// `IGovernor.ProposalState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    Pending,
    Active,
    Canceled,
    Defeated,
    Succeeded,
    Queued,
    Expired,
    Executed,
}

impl ProposalState {
    pub const ALL: [Self; 8] = [
        Self::Pending,
        Self::Active,
        Self::Canceled,
        Self::Defeated,
        Self::Succeeded,
        Self::Queued,
        Self::Expired,
        Self::Executed,
    ];

    /// No further transition is possible.
    pub const fn is_final(self) -> bool {
        matches!(
            self,
            Self::Canceled | Self::Defeated | Self::Expired | Self::Executed
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Canceled => "canceled",
            Self::Defeated => "defeated",
            Self::Succeeded => "succeeded",
            Self::Queued => "queued",
            Self::Expired => "expired",
            Self::Executed => "executed",
        }
    }
}

impl TryFrom<u8> for ProposalState {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| eyre::eyre!("Invalid proposal state: {}", value))
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ballot for `castVote`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteSupport {
    Against = 0,
    For = 1,
    Abstain = 2,
}

impl VoteSupport {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for VoteSupport {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Against),
            1 => Ok(Self::For),
            2 => Ok(Self::Abstain),
            _ => Err(eyre::eyre!("Invalid vote type: {}", value)),
        }
    }
}

impl std::str::FromStr for VoteSupport {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "against" | "0" => Ok(Self::Against),
            "for" | "1" => Ok(Self::For),
            "abstain" | "2" => Ok(Self::Abstain),
            _ => Err(eyre::eyre!("Invalid vote type: {}", s)),
        }
    }
}

/// Vote totals of a proposal.
///
/// The governor counts `support=bravo&quorum=for,abstain`: abstentions count
/// toward quorum but not toward the outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub against: U256,
    pub for_votes: U256,
    pub abstain: U256,
}

impl Tally {
    pub fn quorum_reached(&self, quorum: U256) -> bool {
        self.for_votes.saturating_add(self.abstain) >= quorum
    }

    pub fn vote_succeeded(&self) -> bool {
        self.for_votes > self.against
    }

    pub fn total(&self) -> U256 {
        self.against
            .saturating_add(self.for_votes)
            .saturating_add(self.abstain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> Proposal {
        Proposal::single(
            Address::repeat_byte(0x11),
            U256::ZERO,
            Bytes::from(vec![0x12, 0x34]),
            "# Upgrade L2OutputOracle",
        )
    }

    #[test]
    fn test_validate() {
        assert!(proposal().validate().is_ok());

        let mut empty = proposal();
        empty.targets.clear();
        empty.values.clear();
        empty.calldatas.clear();
        let err = empty.validate().unwrap_err();
        assert!(err.to_string().contains("at least one call"));

        let mut mismatched = proposal();
        mismatched.values.push(U256::from(1));
        let err = mismatched.validate().unwrap_err();
        assert!(err.to_string().contains("1 targets, 2 values"));

        let mut mismatched = proposal();
        mismatched.calldatas.push(Bytes::new());
        let err = mismatched.validate().unwrap_err();
        assert!(err.to_string().contains("calldatas"));
    }

    #[test]
    fn test_proposal_state_from_u8() {
        for (i, state) in ProposalState::ALL.iter().enumerate() {
            assert_eq!(ProposalState::try_from(i as u8).unwrap(), *state);
        }
        assert!(ProposalState::try_from(8).is_err());
        assert_eq!(ProposalState::try_from(5).unwrap(), ProposalState::Queued);
    }

    #[test]
    fn test_final_states() {
        assert!(!ProposalState::Pending.is_final());
        assert!(!ProposalState::Active.is_final());
        assert!(!ProposalState::Succeeded.is_final());
        assert!(!ProposalState::Queued.is_final());
        assert!(ProposalState::Canceled.is_final());
        assert!(ProposalState::Defeated.is_final());
        assert!(ProposalState::Expired.is_final());
        assert!(ProposalState::Executed.is_final());
    }

    #[test]
    fn test_vote_support_parsing() {
        assert_eq!("for".parse::<VoteSupport>().unwrap(), VoteSupport::For);
        assert_eq!("AGAINST".parse::<VoteSupport>().unwrap(), VoteSupport::Against);
        assert_eq!("2".parse::<VoteSupport>().unwrap(), VoteSupport::Abstain);
        assert!("yes".parse::<VoteSupport>().is_err());
        assert_eq!(VoteSupport::For.as_u8(), 1);
        assert!(VoteSupport::try_from(3).is_err());
    }

    #[test]
    fn test_tally_quorum_counts_abstain() {
        let tally = Tally {
            against: U256::from(50),
            for_votes: U256::from(30),
            abstain: U256::from(20),
        };

        assert!(tally.quorum_reached(U256::from(50)));
        assert!(!tally.quorum_reached(U256::from(51)));
        // against votes never count toward quorum
        assert!(!tally.vote_succeeded());
        assert_eq!(tally.total(), U256::from(100));
    }

    #[test]
    fn test_tally_tie_is_defeat() {
        let tally = Tally {
            against: U256::from(10),
            for_votes: U256::from(10),
            abstain: U256::ZERO,
        };
        assert!(!tally.vote_succeeded());

        let tally = Tally {
            for_votes: U256::from(11),
            ..tally
        };
        assert!(tally.vote_succeeded());
    }
}
