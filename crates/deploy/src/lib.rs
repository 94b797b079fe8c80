//! Contract deployment from the embedded creation bytecode.
//!
//! A deployment is a CREATE transaction whose input is the artifact's
//! creation code followed by its ABI-encoded constructor arguments. The
//! transaction is filled against the provider, signed through a
//! [`SignerFn`] and broadcast as raw bytes.

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, TxHash};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolConstructor;
use binding::{Artifact, KromaMintableERC20Factory, ProtocolVault, SecurityCouncil};
use client::{fill_transaction, SignerFn};
use tracing::info;

/// A contract created on-chain.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub artifact: Artifact,
    pub address: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

/// ABI-encoded constructor arguments of `SecurityCouncil`.
pub fn security_council_args(colosseum: Address, governor: Address) -> Vec<u8> {
    SecurityCouncil::constructorCall {
        _colosseum: colosseum,
        _governor: governor,
    }
    .abi_encode()
}

/// ABI-encoded constructor arguments of `KromaMintableERC20Factory`.
pub fn token_factory_args(bridge: Address) -> Vec<u8> {
    KromaMintableERC20Factory::constructorCall { _bridge: bridge }.abi_encode()
}

/// ABI-encoded constructor arguments of `ProtocolVault`.
pub fn protocol_vault_args(recipient: Address) -> Vec<u8> {
    ProtocolVault::constructorCall {
        _recipient: recipient,
    }
    .abi_encode()
}

/// Unsigned CREATE transaction for `artifact`.
pub fn build_deploy_transaction(
    artifact: Artifact,
    constructor_args: &[u8],
) -> eyre::Result<TransactionRequest> {
    let code = artifact.deploy_code(constructor_args)?;
    Ok(TransactionRequest::default().with_deploy_code(code))
}

/// Deploy `artifact` and wait for the contract to exist.
pub async fn deploy<P>(
    provider: &P,
    signer: &SignerFn,
    from: Address,
    artifact: Artifact,
    constructor_args: &[u8],
) -> eyre::Result<Deployment>
where
    P: Provider,
{
    let tx = build_deploy_transaction(artifact, constructor_args)?;

    let chain_id = provider.get_chain_id().await?;
    let filled_tx = fill_transaction(tx, provider, from, chain_id).await?;
    let signed_tx = signer(filled_tx).await?;

    let pending = provider.send_raw_transaction(&signed_tx).await?;
    info!(
        artifact = %artifact,
        tx_hash = %pending.tx_hash(),
        "Deployment transaction sent"
    );

    let receipt = pending.get_receipt().await?;
    if !receipt.status() {
        eyre::bail!("Deployment of {} reverted", artifact);
    }

    let address = receipt
        .contract_address
        .ok_or_else(|| eyre::eyre!("Receipt of {} has no contract address", artifact))?;

    info!(
        artifact = %artifact,
        address = %address,
        block_number = receipt.block_number,
        gas_used = receipt.gas_used,
        "Contract deployed"
    );

    Ok(Deployment {
        artifact,
        address,
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
    })
}

/// Deploy the governor implementation. It is initialized separately.
pub async fn deploy_upgrade_governor<P: Provider>(
    provider: &P,
    signer: &SignerFn,
    from: Address,
) -> eyre::Result<Deployment> {
    deploy(provider, signer, from, Artifact::UpgradeGovernor, &[]).await
}

pub async fn deploy_security_council<P: Provider>(
    provider: &P,
    signer: &SignerFn,
    from: Address,
    colosseum: Address,
    governor: Address,
) -> eyre::Result<Deployment> {
    let args = security_council_args(colosseum, governor);
    deploy(provider, signer, from, Artifact::SecurityCouncil, &args).await
}

pub async fn deploy_token_factory<P: Provider>(
    provider: &P,
    signer: &SignerFn,
    from: Address,
    bridge: Address,
) -> eyre::Result<Deployment> {
    let args = token_factory_args(bridge);
    deploy(provider, signer, from, Artifact::KromaMintableERC20Factory, &args).await
}

pub async fn deploy_protocol_vault<P: Provider>(
    provider: &P,
    signer: &SignerFn,
    from: Address,
    recipient: Address,
) -> eyre::Result<Deployment> {
    let args = protocol_vault_args(recipient);
    deploy(provider, signer, from, Artifact::ProtocolVault, &args).await
}
