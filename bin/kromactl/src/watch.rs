//! One pass of the watch loop: governance, council and vault snapshot.

use crate::{config::Config, lookback_range, metrics::Metrics};
use action::vault::vault_status;
use alloy_primitives::U256;
use alloy_provider::Provider;
use council::CouncilStateProvider;
use governance::{GovernorStateProvider, ProposalState};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// What a watch cycle observed.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub proposals: BTreeMap<&'static str, usize>,
    /// Proposals that need someone to act on them
    pub actionable: Vec<(U256, ProposalState)>,
    pub council_pending: usize,
    pub council_executable: usize,
    pub vault_balance: U256,
    pub vault_withdrawable: bool,
}

/// Count proposals per state, with every state present.
pub fn count_by_state(states: &[ProposalState]) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<_, _> = ProposalState::ALL
        .iter()
        .map(|state| (state.as_str(), 0))
        .collect();

    for state in states {
        *counts.entry(state.as_str()).or_default() += 1;
    }

    counts
}

/// Active proposals can be voted on, succeeded ones queued, queued ones executed.
pub const fn is_actionable(state: ProposalState) -> bool {
    matches!(
        state,
        ProposalState::Active | ProposalState::Succeeded | ProposalState::Queued
    )
}

pub async fn watch_cycle<P1, P2>(
    l1_provider: &P1,
    l2_provider: &P2,
    config: &Config,
    metrics: &Metrics,
) -> eyre::Result<Snapshot>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    let latest = l1_provider.get_block_number().await?;
    let (from, to) = lookback_range(latest, config.lookback_blocks);

    let governor = GovernorStateProvider::new(l1_provider.clone(), config.upgrade_governor);
    let records = governor.get_proposals(from, to).await?;

    let mut states = Vec::with_capacity(records.len());
    let mut actionable = Vec::new();
    for record in &records {
        let state = governor.state(record.id).await?;
        if is_actionable(state) {
            actionable.push((record.id, state));
        }
        states.push(state);
    }

    let proposals = count_by_state(&states);
    for state in ProposalState::ALL {
        metrics.set_proposals(state, proposals.get(state.as_str()).copied().unwrap_or_default());
    }

    let council = CouncilStateProvider::new(l1_provider.clone(), config.security_council);
    let pending = council.pending_transactions(from, to).await?;
    let quorum = council.quorum().await?;
    let council_executable = pending
        .iter()
        .filter(|tx| tx.is_executable(quorum))
        .count();
    metrics.set_council_transactions(pending.len(), council_executable);

    let vault = vault_status(l2_provider, config.network_config().l2.protocol_vault).await?;
    metrics.set_vault_balance(vault.balance.saturating_to::<u128>());

    for (id, state) in &actionable {
        info!(proposal_id = %id, %state, "Proposal needs action");
    }

    let snapshot = Snapshot {
        proposals,
        actionable,
        council_pending: pending.len(),
        council_executable,
        vault_balance: vault.balance,
        vault_withdrawable: vault.can_withdraw(),
    };

    debug!(
        proposals = records.len(),
        council_pending = snapshot.council_pending,
        council_executable = snapshot.council_executable,
        vault_balance = %snapshot.vault_balance,
        "Watch cycle complete"
    );

    Ok(snapshot)
}
