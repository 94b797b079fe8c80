//! Withdraw accumulated fees from a ProtocolVault on L2.

use crate::{find_event, send_transaction, Action, SignerFn};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::Provider;
use binding::ProtocolVault;
use tracing::{debug, info};

/// Where the vault sends its balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// `withdraw()`: bridged to `RECIPIENT` on L1
    L1,
    /// `withdrawToL2()`: transferred to `RECIPIENT` on L2
    L2,
}

/// Input for a vault withdrawal.
#[derive(Debug, Clone)]
pub struct VaultWithdraw {
    /// ProtocolVault predeploy address
    pub vault: Address,
    /// Sender, must match the signer
    pub from: Address,
    pub destination: Destination,
    /// Set once the withdrawal transaction was sent
    pub tx_hash: Option<TxHash>,
}

/// Current accounting of a vault.
#[derive(Debug, Clone)]
pub struct VaultStatus {
    pub balance: U256,
    pub min_withdrawal_amount: U256,
    pub total_processed: U256,
    pub recipient: Address,
}

impl VaultStatus {
    pub fn can_withdraw(&self) -> bool {
        self.balance >= self.min_withdrawal_amount
    }
}

/// Read the vault's balance and accounting.
pub async fn vault_status<P: Provider>(provider: &P, vault: Address) -> eyre::Result<VaultStatus> {
    let contract = ProtocolVault::new(vault, provider);

    let status = VaultStatus {
        balance: provider.get_balance(vault).await?,
        min_withdrawal_amount: contract.MIN_WITHDRAWAL_AMOUNT().call().await?,
        total_processed: contract.totalProcessed().call().await?,
        recipient: contract.RECIPIENT().call().await?,
    };

    debug!(%vault, balance = %status.balance, "Queried vault status");

    Ok(status)
}

pub struct VaultWithdrawAction<P> {
    provider: P,
    signer: SignerFn,
    action: VaultWithdraw,
}

impl<P> VaultWithdrawAction<P>
where
    P: Provider + Clone,
{
    pub fn new(provider: P, signer: SignerFn, action: VaultWithdraw) -> Self {
        Self {
            provider,
            signer,
            action,
        }
    }

    pub const fn tx_hash(&self) -> Option<TxHash> {
        self.action.tx_hash
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.action.vault == Address::ZERO {
            eyre::bail!("Vault must not be zero");
        }

        if self.action.from == Address::ZERO {
            eyre::bail!("Sender must not be zero");
        }

        Ok(())
    }
}

impl<P> Action for VaultWithdrawAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        let status = vault_status(&self.provider, self.action.vault).await?;
        Ok(status.can_withdraw())
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        let Some(tx_hash) = self.action.tx_hash else {
            return Ok(false);
        };

        let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? else {
            return Ok(false);
        };

        Ok(receipt.status()
            && find_event::<ProtocolVault::Withdrawal>(&receipt, self.action.vault).is_some())
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.validate()?;

        if self.is_completed().await? {
            eyre::bail!("Vault withdrawal already sent");
        }

        let status = vault_status(&self.provider, self.action.vault).await?;
        if !status.can_withdraw() {
            eyre::bail!(
                "Vault balance {} below minimum withdrawal amount {}",
                status.balance,
                status.min_withdrawal_amount
            );
        }

        let contract = ProtocolVault::new(self.action.vault, &self.provider);
        let tx_request = match self.action.destination {
            Destination::L1 => contract.withdraw().into_transaction_request(),
            Destination::L2 => contract.withdrawToL2().into_transaction_request(),
        };

        let receipt =
            send_transaction(&self.provider, &self.signer, tx_request, self.action.from).await?;
        self.action.tx_hash = Some(receipt.transaction_hash);

        let withdrawal: ProtocolVault::Withdrawal = find_event(&receipt, self.action.vault)
            .ok_or_else(|| eyre::eyre!("Withdrawal event not found in receipt"))?;

        info!(
            tx_hash = %receipt.transaction_hash,
            value = %withdrawal.value,
            to = %withdrawal.to,
            destination = ?self.action.destination,
            "Vault withdrawal sent"
        );

        Ok(crate::Result::from_receipt(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Withdraw ProtocolVault {} to {:?}",
            self.action.vault, self.action.destination
        )
    }
}
