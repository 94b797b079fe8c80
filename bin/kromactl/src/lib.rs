pub mod config;
pub mod metrics;
pub mod watch;

use crate::config::Config;
use action::{Action, SignerFn};
use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types_eth::BlockNumberOrTag;
use binding::Artifact;
use client::RemoteSigner;
use tracing::info;

/// Chain a command talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    L1,
    L2,
}

impl Layer {
    /// Governance contracts live on L1, vault and token factory are L2 predeploys.
    pub const fn of(artifact: Artifact) -> Self {
        match artifact {
            Artifact::UpgradeGovernor | Artifact::SecurityCouncil => Self::L1,
            Artifact::KromaMintableERC20Factory | Artifact::ProtocolVault => Self::L2,
        }
    }

    pub const fn chain_id(self, config: &Config) -> u64 {
        let network = config.network_config();
        match self {
            Self::L1 => network.l1.chain_id,
            Self::L2 => network.l2.chain_id,
        }
    }

    pub fn rpc_url(self, config: &Config) -> &str {
        match self {
            Self::L1 => &config.l1_rpc_url,
            Self::L2 => &config.l2_rpc_url,
        }
    }
}

/// Block range covering the last `lookback` blocks up to `latest`.
pub fn lookback_range(latest: u64, lookback: u64) -> (BlockNumberOrTag, BlockNumberOrTag) {
    (
        BlockNumberOrTag::Number(latest.saturating_sub(lookback)),
        BlockNumberOrTag::Number(latest),
    )
}

/// Build the transaction signer and the address it signs for.
///
/// A configured signer-proxy takes precedence over a private key.
pub fn create_signer<P>(
    config: &Config,
    private_key: Option<&str>,
    chain_id: u64,
    provider: P,
) -> eyre::Result<(SignerFn, Address)>
where
    P: Provider + Clone + 'static,
{
    if let Some(proxy_url) = &config.signer_proxy_url {
        let account = config
            .account
            .ok_or_else(|| eyre::eyre!("`account` must be set when using signer_proxy_url"))?;
        let remote = RemoteSigner::new(proxy_url.clone(), account, chain_id);
        return Ok((client::remote_signer_fn(remote, provider), account));
    }

    let private_key = private_key
        .ok_or_else(|| eyre::eyre!("Private key required: pass --private-key or set PRIVATE_KEY"))?;
    let address = client::parse_private_key(private_key)?.address();

    if let Some(account) = config.account {
        if account != address {
            eyre::bail!(
                "Private key address {} does not match configured account {}",
                address,
                account
            );
        }
    }

    let signer = client::local_signer_fn(private_key, chain_id, provider)?;
    Ok((signer, address))
}

/// Run an action unless it is already completed or not ready.
///
/// Returns `None` when nothing was sent, including dry runs.
pub async fn run_action<A: Action>(
    action: &mut A,
    dry_run: bool,
) -> eyre::Result<Option<action::Result>> {
    let description = action.description();

    if action.is_completed().await? {
        info!(action = %description, "Already completed, skipping");
        return Ok(None);
    }

    if !action.is_ready().await? {
        eyre::bail!("Action not ready: {}", description);
    }

    if dry_run {
        info!(action = %description, "[DRY-RUN] Would execute");
        return Ok(None);
    }

    info!(action = %description, "Executing");
    let result = action.execute().await?;
    info!(
        tx_hash = %result.tx_hash,
        block_number = result.block_number,
        "Action completed"
    );

    Ok(Some(result))
}
