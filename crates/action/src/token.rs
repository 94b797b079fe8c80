//! Create a KromaMintableERC20 through the L2 token factory.

use crate::{find_event, send_transaction, Action, SignerFn};
use alloy_primitives::Address;
use alloy_provider::Provider;
use binding::{factory::mintable_erc20_address, KromaMintableERC20Factory};
use tracing::{info, warn};

/// Input for creating an L2 representation of an L1 token.
#[derive(Debug, Clone)]
pub struct CreateToken {
    /// KromaMintableERC20Factory address
    pub factory: Address,
    /// Sender, must match the signer
    pub from: Address,
    /// Token on L1
    pub remote_token: Address,
    pub name: String,
    pub symbol: String,
}

pub struct CreateTokenAction<P> {
    provider: P,
    signer: SignerFn,
    action: CreateToken,
    local_token: Option<Address>,
}

impl<P> CreateTokenAction<P>
where
    P: Provider + Clone,
{
    pub fn new(provider: P, signer: SignerFn, action: CreateToken) -> Self {
        Self {
            provider,
            signer,
            action,
            local_token: None,
        }
    }

    /// L2 token address, known after a successful execution.
    pub const fn local_token(&self) -> Option<Address> {
        self.local_token
    }

    /// CREATE2 address the factory deploys this token to.
    pub async fn predicted_token(&self) -> eyre::Result<Address> {
        let contract = KromaMintableERC20Factory::new(self.action.factory, &self.provider);
        let bridge = contract.BRIDGE().call().await?;

        Ok(mintable_erc20_address(
            self.action.factory,
            bridge,
            self.action.remote_token,
            &self.action.name,
            &self.action.symbol,
        )?)
    }

    fn validate(&self) -> eyre::Result<()> {
        if self.action.factory == Address::ZERO {
            eyre::bail!("Factory must not be zero");
        }

        if self.action.remote_token == Address::ZERO {
            eyre::bail!("Remote token must not be zero");
        }

        if self.action.name.trim().is_empty() {
            eyre::bail!("Token name must not be empty");
        }

        if self.action.symbol.trim().is_empty() {
            eyre::bail!("Token symbol must not be empty");
        }

        Ok(())
    }
}

impl<P> Action for CreateTokenAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        self.validate()?;
        Ok(!self.is_completed().await?)
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        if self.local_token.is_some() {
            return Ok(true);
        }

        let predicted = self.predicted_token().await?;
        let code = self.provider.get_code_at(predicted).await?;
        Ok(!code.is_empty())
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.validate()?;

        if let Some(local_token) = self.local_token {
            eyre::bail!("Token already created at {}", local_token);
        }

        let predicted = self.predicted_token().await?;
        if !self.provider.get_code_at(predicted).await?.is_empty() {
            eyre::bail!("Token already created at {}", predicted);
        }

        let contract = KromaMintableERC20Factory::new(self.action.factory, &self.provider);
        let tx_request = contract
            .createKromaMintableERC20(
                self.action.remote_token,
                self.action.name.clone(),
                self.action.symbol.clone(),
            )
            .into_transaction_request();

        let receipt =
            send_transaction(&self.provider, &self.signer, tx_request, self.action.from).await?;

        let created: KromaMintableERC20Factory::KromaMintableERC20Created =
            find_event(&receipt, self.action.factory)
                .ok_or_else(|| eyre::eyre!("KromaMintableERC20Created event not found in receipt"))?;
        self.local_token = Some(created.localToken);

        if created.localToken != predicted {
            warn!(
                predicted = %predicted,
                local_token = %created.localToken,
                "Factory deployed a different token contract than expected"
            );
        }

        info!(
            tx_hash = %receipt.transaction_hash,
            local_token = %created.localToken,
            remote_token = %created.remoteToken,
            deployer = %created.deployer,
            "Mintable token created"
        );

        Ok(crate::Result::from_receipt(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Create {} ({}) for remote token {}",
            self.action.name, self.action.symbol, self.action.remote_token
        )
    }
}
