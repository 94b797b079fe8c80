use action::{
    confirm::{ConfirmAction, CouncilCall, CouncilExecuteAction},
    execute::{Execute, ExecuteAction},
    propose::{Propose, ProposeAction},
    queue::{Queue, QueueAction},
    token::{CreateToken, CreateTokenAction},
    vault::{vault_status, Destination, VaultWithdraw, VaultWithdrawAction},
    vote::{Vote, VoteAction},
};
use alloy_primitives::{utils::format_ether, Address, Bytes, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::BlockNumberOrTag;
use binding::{predeploys, Artifact};
use clap::{Parser, Subcommand};
use council::{confirmations_needed, CouncilStateProvider};
use governance::{GovernorStateProvider, Proposal, ProposalRecord, VoteSupport};
use kromactl::{
    config::Config,
    create_signer, lookback_range,
    metrics::{install_prometheus_exporter, Metrics},
    run_action,
    watch::watch_cycle,
    Layer,
};
use std::time::{Duration, Instant};
use tokio::time;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "kromactl")]
#[command(about = "Operate Kroma governance, the security council, the protocol vault and the token factory")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Private key for signing transactions (hex string, with or without 0x prefix)
    #[arg(short = 'k', long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Dry-run mode: log actions without executing transactions
    #[arg(long)]
    dry_run: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// UpgradeGovernor queries and proposal lifecycle
    #[command(subcommand)]
    Governor(GovernorCommand),

    /// SecurityCouncil multisig
    #[command(subcommand)]
    Council(CouncilCommand),

    /// ProtocolVault on L2
    #[command(subcommand)]
    Vault(VaultCommand),

    /// KromaMintableERC20Factory on L2
    #[command(subcommand)]
    Factory(FactoryCommand),

    /// Deploy a contract from its embedded bytecode
    Deploy {
        #[arg(value_parser = parse_artifact)]
        artifact: Artifact,

        /// Colosseum address (SecurityCouncil)
        #[arg(long, value_parser = parse_address)]
        colosseum: Option<Address>,

        /// Governor address (SecurityCouncil)
        #[arg(long, value_parser = parse_address)]
        governor: Option<Address>,

        /// Bridge address (KromaMintableERC20Factory), defaults to the L2 standard bridge
        #[arg(long, value_parser = parse_address)]
        bridge: Option<Address>,

        /// Recipient address (ProtocolVault)
        #[arg(long, value_parser = parse_address)]
        recipient: Option<Address>,
    },

    /// List the embedded artifacts and L2 predeploys
    Artifacts,

    /// Poll governance, council and vault state and export metrics
    Watch,
}

#[derive(Subcommand)]
enum GovernorCommand {
    /// Show governor parameters
    Params,

    /// Show a proposal's state, votes and quorum
    Proposal {
        #[arg(value_parser = parse_u256)]
        id: U256,
    },

    /// List proposals created in a block range
    Proposals {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Submit a new proposal
    Propose {
        #[command(flatten)]
        proposal: ProposalArgs,
    },

    /// Cast a vote
    Vote {
        #[arg(value_parser = parse_u256)]
        id: U256,

        /// for, against or abstain
        #[arg(value_parser = parse_support)]
        support: VoteSupport,

        #[arg(long)]
        reason: Option<String>,
    },

    /// Queue a succeeded proposal in the timelock
    Queue {
        #[arg(value_parser = parse_u256)]
        id: U256,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Execute a queued proposal
    Execute {
        #[arg(value_parser = parse_u256)]
        id: U256,

        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(Subcommand)]
enum CouncilCommand {
    /// Show a council transaction
    Tx {
        #[arg(value_parser = parse_u256)]
        id: U256,
    },

    /// List transactions not executed yet
    Pending {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// List validation and deletion requests
    Requests {
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Confirm a transaction as the signing member
    Confirm {
        #[arg(value_parser = parse_u256)]
        id: U256,
    },

    /// Execute a transaction that reached quorum
    Execute {
        #[arg(value_parser = parse_u256)]
        id: U256,
    },
}

#[derive(Subcommand)]
enum VaultCommand {
    /// Show balance and accounting
    Status,

    /// Withdraw the vault balance to its recipient
    Withdraw {
        /// Keep the funds on L2 instead of bridging to L1
        #[arg(long)]
        to_l2: bool,
    },
}

#[derive(Subcommand)]
enum FactoryCommand {
    /// Create an L2 token for an L1 token
    Create {
        #[arg(value_parser = parse_address)]
        remote_token: Address,
        name: String,
        symbol: String,
    },
}

#[derive(clap::Args)]
struct RangeArgs {
    /// First L1 block to scan, defaults to `lookback_blocks` before the latest
    #[arg(long)]
    from_block: Option<u64>,

    /// Last L1 block to scan, defaults to the latest
    #[arg(long)]
    to_block: Option<u64>,
}

#[derive(clap::Args)]
struct ProposalArgs {
    /// Call target, repeat for each call
    #[arg(long = "target", required = true, value_parser = parse_address)]
    targets: Vec<Address>,

    /// Wei sent with each call, defaults to zero for all calls
    #[arg(long = "value", value_parser = parse_u256)]
    values: Vec<U256>,

    /// Hex calldata of each call
    #[arg(long = "calldata", required = true, value_parser = parse_bytes)]
    calldatas: Vec<Bytes>,

    /// Proposal description
    #[arg(long, conflicts_with = "description_file")]
    description: Option<String>,

    /// Read the description from a file
    #[arg(long)]
    description_file: Option<String>,
}

impl ProposalArgs {
    fn into_proposal(self) -> eyre::Result<Proposal> {
        let description = match (self.description, self.description_file) {
            (Some(description), _) => description,
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => eyre::bail!("--description or --description-file is required"),
        };

        let values = if self.values.is_empty() {
            vec![U256::ZERO; self.targets.len()]
        } else {
            self.values
        };

        let proposal = Proposal {
            targets: self.targets,
            values,
            calldatas: self.calldatas,
            description,
        };
        proposal.validate()?;

        Ok(proposal)
    }
}

fn parse_address(s: &str) -> Result<Address, String> {
    s.parse().map_err(|e| format!("invalid address: {e}"))
}

fn parse_u256(s: &str) -> Result<U256, String> {
    s.parse().map_err(|e| format!("invalid number: {e}"))
}

fn parse_bytes(s: &str) -> Result<Bytes, String> {
    s.parse().map_err(|e| format!("invalid hex: {e}"))
}

fn parse_support(s: &str) -> Result<VoteSupport, String> {
    s.parse().map_err(|e: eyre::Report| e.to_string())
}

fn parse_artifact(s: &str) -> Result<Artifact, String> {
    s.parse().map_err(|e: binding::ArtifactError| e.to_string())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = Config::from_file(&cli.config)?;

    // Override dry_run from CLI flag
    if cli.dry_run {
        config.dry_run = true;
    }

    let network = config.network_config();
    info!(
        network = ?network.network_type,
        l1_chain_id = network.l1.chain_id,
        l2_chain_id = network.l2.chain_id,
        governor = %config.upgrade_governor,
        council = %config.security_council,
        dry_run = config.dry_run,
        "Loaded config"
    );

    let private_key = cli.private_key.as_deref();

    match cli.command {
        Command::Governor(command) => governor(command, &config, private_key).await,
        Command::Council(command) => council(command, &config, private_key).await,
        Command::Vault(command) => vault(command, &config, private_key).await,
        Command::Factory(command) => factory(command, &config, private_key).await,
        Command::Deploy {
            artifact,
            colosseum,
            governor,
            bridge,
            recipient,
        } => {
            let args = match artifact {
                Artifact::UpgradeGovernor => Vec::new(),
                Artifact::SecurityCouncil => deploy::security_council_args(
                    colosseum.ok_or_else(|| eyre::eyre!("--colosseum is required"))?,
                    governor.unwrap_or(config.upgrade_governor),
                ),
                Artifact::KromaMintableERC20Factory => {
                    deploy::token_factory_args(bridge.unwrap_or(network.l2.l2_standard_bridge))
                }
                Artifact::ProtocolVault => deploy::protocol_vault_args(
                    recipient.ok_or_else(|| eyre::eyre!("--recipient is required"))?,
                ),
            };

            let layer = Layer::of(artifact);
            let provider = client::create_provider(layer.rpc_url(&config))?;

            if config.dry_run {
                let code = artifact.deploy_code(&args)?;
                info!(%artifact, ?layer, size = code.len(), "[DRY-RUN] Would deploy");
                return Ok(());
            }

            let (signer, from) = create_signer(
                &config,
                private_key,
                layer.chain_id(&config),
                provider.clone(),
            )?;
            let deployment = deploy::deploy(&provider, &signer, from, artifact, &args).await?;
            println!("{}\t{}\t{}", deployment.artifact, deployment.address, deployment.tx_hash);
            Ok(())
        }
        Command::Artifacts => {
            for artifact in Artifact::ALL {
                let size = artifact.creation_code()?.len();
                println!("{artifact}\t{size} bytes\t{:?}", Layer::of(artifact));
            }
            for (name, address) in predeploys::ALL {
                println!("{name}\t{address}");
            }
            Ok(())
        }
        Command::Watch => watch(&config).await,
    }
}

async fn resolve_range<P: Provider>(
    provider: &P,
    range: &RangeArgs,
    lookback: u64,
) -> eyre::Result<(BlockNumberOrTag, BlockNumberOrTag)> {
    let to = match range.to_block {
        Some(to) => to,
        None => provider.get_block_number().await?,
    };
    let (default_from, to) = lookback_range(to, lookback);
    let from = range
        .from_block
        .map(BlockNumberOrTag::Number)
        .unwrap_or(default_from);
    Ok((from, to))
}

async fn find_proposal<P: Provider + Clone>(
    state: &GovernorStateProvider<P>,
    provider: &P,
    id: U256,
    range: &RangeArgs,
    lookback: u64,
) -> eyre::Result<ProposalRecord> {
    let (from, to) = resolve_range(provider, range, lookback).await?;
    state
        .get_proposals(from, to)
        .await?
        .into_iter()
        .find(|record| record.id == id)
        .ok_or_else(|| eyre::eyre!("Proposal {} not found between {:?} and {:?}", id, from, to))
}

async fn governor(
    command: GovernorCommand,
    config: &Config,
    private_key: Option<&str>,
) -> eyre::Result<()> {
    let provider = client::create_provider(&config.l1_rpc_url)?;
    let state = GovernorStateProvider::new(provider.clone(), config.upgrade_governor);
    let chain_id = Layer::L1.chain_id(config);

    match command {
        GovernorCommand::Params => {
            let params = state.parameters().await?;
            println!("name:                {} v{}", params.name, params.version);
            println!("counting mode:       {}", params.counting_mode);
            println!("voting delay:        {}", params.voting_delay);
            println!("voting period:       {}", params.voting_period);
            println!("proposal threshold:  {}", params.proposal_threshold);
            println!(
                "quorum:              {}/{}",
                params.quorum_numerator, params.quorum_denominator
            );
            println!("timelock:            {}", params.timelock);
            println!("token:               {}", params.token);
        }
        GovernorCommand::Proposal { id } => {
            let info = state.proposal_info(id).await?;
            println!("id:        {}", info.id);
            println!("state:     {}", info.state);
            println!("proposer:  {}", info.proposer);
            println!("snapshot:  {}", info.snapshot);
            println!("deadline:  {}", info.deadline);
            if !info.eta.is_zero() {
                println!("eta:       {}", info.eta);
            }
            println!(
                "votes:     for {} / against {} / abstain {}",
                info.tally.for_votes, info.tally.against, info.tally.abstain
            );
            match (info.quorum, info.quorum_reached()) {
                (Some(quorum), Some(reached)) => println!("quorum:    {quorum} (reached: {reached})"),
                _ => println!("quorum:    unknown until snapshot"),
            }
        }
        GovernorCommand::Proposals { range } => {
            let (from, to) = resolve_range(&provider, &range, config.lookback_blocks).await?;
            for record in state.get_proposals(from, to).await? {
                let current = state.state(record.id).await?;
                let title = record
                    .proposal
                    .description
                    .lines()
                    .next()
                    .unwrap_or_default();
                println!("{}\t{}\t{}\t{}", record.block_number, record.id, current, title);
            }
        }
        GovernorCommand::Propose { proposal } => {
            let proposal = proposal.into_proposal()?;
            let (signer, from) = create_signer(config, private_key, chain_id, provider.clone())?;
            let mut action = ProposeAction::new(
                provider,
                signer,
                Propose {
                    governor: config.upgrade_governor,
                    proposer: from,
                    proposal,
                },
            );
            println!("proposal id: {}", action.proposal_id());
            run_action(&mut action, config.dry_run).await?;
        }
        GovernorCommand::Vote {
            id,
            support,
            reason,
        } => {
            let (signer, from) = create_signer(config, private_key, chain_id, provider.clone())?;
            let mut action = VoteAction::new(
                provider,
                signer,
                Vote {
                    governor: config.upgrade_governor,
                    voter: from,
                    proposal_id: id,
                    support,
                    reason,
                },
            );
            run_action(&mut action, config.dry_run).await?;
        }
        GovernorCommand::Queue { id, range } => {
            let record = find_proposal(&state, &provider, id, &range, config.lookback_blocks).await?;
            let (signer, from) = create_signer(config, private_key, chain_id, provider.clone())?;
            let mut action = QueueAction::new(
                provider,
                signer,
                Queue {
                    governor: config.upgrade_governor,
                    from,
                    proposal: record.proposal,
                },
            );
            run_action(&mut action, config.dry_run).await?;
        }
        GovernorCommand::Execute { id, range } => {
            let record = find_proposal(&state, &provider, id, &range, config.lookback_blocks).await?;
            let (signer, from) = create_signer(config, private_key, chain_id, provider.clone())?;
            let mut action = ExecuteAction::new(
                provider,
                signer,
                Execute {
                    governor: config.upgrade_governor,
                    from,
                    proposal: record.proposal,
                },
            );
            run_action(&mut action, config.dry_run).await?;
        }
    }

    Ok(())
}

async fn council(
    command: CouncilCommand,
    config: &Config,
    private_key: Option<&str>,
) -> eyre::Result<()> {
    let provider = client::create_provider(&config.l1_rpc_url)?;
    let state = CouncilStateProvider::new(provider.clone(), config.security_council);
    let chain_id = Layer::L1.chain_id(config);

    match command {
        CouncilCommand::Tx { id } => {
            let tx = state.transaction(id).await?;
            if !tx.exists() {
                eyre::bail!("Council transaction {} does not exist", id);
            }
            let quorum = state.quorum().await?;
            println!("id:             {}", tx.id);
            println!("target:         {}", tx.target);
            println!("value:          {}", tx.value);
            println!("data:           {}", tx.data);
            println!("executed:       {}", tx.executed);
            println!("confirmations:  {}/{}", tx.confirmations, quorum);
            println!(
                "still needed:   {}",
                confirmations_needed(quorum, tx.confirmations)
            );
        }
        CouncilCommand::Pending { range } => {
            let (from, to) = resolve_range(&provider, &range, config.lookback_blocks).await?;
            let quorum = state.quorum().await?;
            for tx in state.pending_transactions(from, to).await? {
                println!(
                    "{}\t{}\t{}/{}\texecutable: {}",
                    tx.id,
                    tx.target,
                    tx.confirmations,
                    quorum,
                    tx.is_executable(quorum)
                );
            }
        }
        CouncilCommand::Requests { range } => {
            let (from, to) = resolve_range(&provider, &range, config.lookback_blocks).await?;
            for request in state.requests(from, to).await? {
                println!("{}\t{}", request.block_number(), request);
            }
        }
        CouncilCommand::Confirm { id } => {
            let (signer, member) = create_signer(config, private_key, chain_id, provider.clone())?;
            let mut action = ConfirmAction::new(
                provider,
                signer,
                CouncilCall {
                    council: config.security_council,
                    member,
                    transaction_id: id,
                },
            );
            run_action(&mut action, config.dry_run).await?;
        }
        CouncilCommand::Execute { id } => {
            let (signer, member) = create_signer(config, private_key, chain_id, provider.clone())?;
            let mut action = CouncilExecuteAction::new(
                provider,
                signer,
                CouncilCall {
                    council: config.security_council,
                    member,
                    transaction_id: id,
                },
            );
            run_action(&mut action, config.dry_run).await?;
        }
    }

    Ok(())
}

async fn vault(
    command: VaultCommand,
    config: &Config,
    private_key: Option<&str>,
) -> eyre::Result<()> {
    let provider = client::create_provider(&config.l2_rpc_url)?;
    let vault = config.network_config().l2.protocol_vault;

    match command {
        VaultCommand::Status => {
            let status = vault_status(&provider, vault).await?;
            println!("vault:            {}", vault);
            println!("recipient:        {}", status.recipient);
            println!("balance:          {} ETH", format_ether(status.balance));
            println!(
                "min withdrawal:   {} ETH",
                format_ether(status.min_withdrawal_amount)
            );
            println!("total processed:  {} ETH", format_ether(status.total_processed));
            println!("withdrawable:     {}", status.can_withdraw());
        }
        VaultCommand::Withdraw { to_l2 } => {
            let chain_id = Layer::L2.chain_id(config);
            let (signer, from) = create_signer(config, private_key, chain_id, provider.clone())?;
            let mut action = VaultWithdrawAction::new(
                provider,
                signer,
                VaultWithdraw {
                    vault,
                    from,
                    destination: if to_l2 { Destination::L2 } else { Destination::L1 },
                    tx_hash: None,
                },
            );
            run_action(&mut action, config.dry_run).await?;
        }
    }

    Ok(())
}

async fn factory(
    command: FactoryCommand,
    config: &Config,
    private_key: Option<&str>,
) -> eyre::Result<()> {
    let provider = client::create_provider(&config.l2_rpc_url)?;
    let chain_id = Layer::L2.chain_id(config);

    match command {
        FactoryCommand::Create {
            remote_token,
            name,
            symbol,
        } => {
            let (signer, from) = create_signer(config, private_key, chain_id, provider.clone())?;
            let mut action = CreateTokenAction::new(
                provider,
                signer,
                CreateToken {
                    factory: config.network_config().l2.token_factory,
                    from,
                    remote_token,
                    name,
                    symbol,
                },
            );
            run_action(&mut action, config.dry_run).await?;
            if let Some(local_token) = action.local_token() {
                println!("local token: {local_token}");
            }
        }
    }

    Ok(())
}

async fn watch(config: &Config) -> eyre::Result<()> {
    let metrics = Metrics::new();
    if let Some(port) = config.metrics_port {
        install_prometheus_exporter(port)?;
        info!(port, "Serving Prometheus metrics");
    }

    let l1_provider = client::create_provider(&config.l1_rpc_url)?;
    let l2_provider = client::create_provider(&config.l2_rpc_url)?;

    let mut interval = time::interval(Duration::from_secs(config.watch_interval_secs));
    info!(interval_secs = config.watch_interval_secs, "Starting watch loop");

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                return Ok(());
            }
        }

        let started = Instant::now();
        match watch_cycle(&l1_provider, &l2_provider, config, &metrics).await {
            Ok(snapshot) => {
                metrics.record_cycle(true, started.elapsed());
                if snapshot.council_executable > 0 {
                    warn!(
                        count = snapshot.council_executable,
                        "Council transactions reached quorum and await execution"
                    );
                }
                if snapshot.vault_withdrawable {
                    info!(balance = %format_ether(snapshot.vault_balance), "Vault can be withdrawn");
                }
            }
            Err(e) => {
                metrics.record_cycle(false, started.elapsed());
                error!(error = %e, "Watch cycle failed");
            }
        }
    }
}
