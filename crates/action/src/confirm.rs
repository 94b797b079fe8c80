//! SecurityCouncil multisig actions: confirm and execute a council transaction.

use crate::{send_transaction, Action, SignerFn};
use alloy_primitives::Address;
use alloy_provider::Provider;
use binding::SecurityCouncil;
use council::{CouncilStateProvider, TransactionId};
use tracing::info;

/// Input for council actions.
#[derive(Debug, Clone)]
pub struct CouncilCall {
    /// SecurityCouncil contract address
    pub council: Address,
    /// Council member sending the transaction, must match the signer
    pub member: Address,
    pub transaction_id: TransactionId,
}

impl CouncilCall {
    fn validate(&self) -> eyre::Result<()> {
        if self.council == Address::ZERO {
            eyre::bail!("Council must not be zero");
        }

        if self.member == Address::ZERO {
            eyre::bail!("Member must not be zero");
        }

        Ok(())
    }
}

/// Confirm a council transaction as `member`.
pub struct ConfirmAction<P> {
    provider: P,
    signer: SignerFn,
    action: CouncilCall,
}

impl<P> ConfirmAction<P>
where
    P: Provider + Clone,
{
    pub fn new(provider: P, signer: SignerFn, action: CouncilCall) -> Self {
        Self {
            provider,
            signer,
            action,
        }
    }

    fn state(&self) -> CouncilStateProvider<P> {
        CouncilStateProvider::new(self.provider.clone(), self.action.council)
    }
}

impl<P> Action for ConfirmAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        let tx = self.state().transaction(self.action.transaction_id).await?;
        if !tx.exists() || tx.executed {
            return Ok(false);
        }

        Ok(!self.is_completed().await?)
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        self.state()
            .is_confirmed_by(self.action.transaction_id, self.action.member)
            .await
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.action.validate()?;

        if self.is_completed().await? {
            eyre::bail!(
                "Transaction {} already confirmed by {}",
                self.action.transaction_id,
                self.action.member
            );
        }

        if !self.is_ready().await? {
            eyre::bail!(
                "Transaction {} does not exist or was executed",
                self.action.transaction_id
            );
        }

        let contract = SecurityCouncil::new(self.action.council, &self.provider);
        let tx_request = contract
            .confirmTransaction(self.action.transaction_id)
            .into_transaction_request();

        let receipt =
            send_transaction(&self.provider, &self.signer, tx_request, self.action.member).await?;

        let confirmations = self
            .state()
            .confirmation_count(self.action.transaction_id)
            .await?;

        info!(
            tx_hash = %receipt.transaction_hash,
            transaction_id = %self.action.transaction_id,
            confirmations = %confirmations,
            "Council transaction confirmed"
        );

        Ok(crate::Result::from_receipt(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Confirm council transaction {} as {}",
            self.action.transaction_id, self.action.member
        )
    }
}

/// Execute a council transaction that reached quorum.
pub struct CouncilExecuteAction<P> {
    provider: P,
    signer: SignerFn,
    action: CouncilCall,
}

impl<P> CouncilExecuteAction<P>
where
    P: Provider + Clone,
{
    pub fn new(provider: P, signer: SignerFn, action: CouncilCall) -> Self {
        Self {
            provider,
            signer,
            action,
        }
    }

    fn state(&self) -> CouncilStateProvider<P> {
        CouncilStateProvider::new(self.provider.clone(), self.action.council)
    }
}

impl<P> Action for CouncilExecuteAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        let state = self.state();
        let tx = state.transaction(self.action.transaction_id).await?;
        if !tx.exists() || tx.executed {
            return Ok(false);
        }

        state.is_confirmed(self.action.transaction_id).await
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        let tx = self.state().transaction(self.action.transaction_id).await?;
        Ok(tx.executed)
    }

    async fn execute(&mut self) -> eyre::Result<crate::Result> {
        self.action.validate()?;

        if self.is_completed().await? {
            eyre::bail!("Transaction {} already executed", self.action.transaction_id);
        }

        if !self.is_ready().await? {
            eyre::bail!(
                "Transaction {} has not reached quorum",
                self.action.transaction_id
            );
        }

        let contract = SecurityCouncil::new(self.action.council, &self.provider);
        let tx_request = contract
            .executeTransaction(self.action.transaction_id)
            .into_transaction_request();

        let receipt =
            send_transaction(&self.provider, &self.signer, tx_request, self.action.member).await?;

        info!(
            tx_hash = %receipt.transaction_hash,
            transaction_id = %self.action.transaction_id,
            "Council transaction executed"
        );

        Ok(crate::Result::from_receipt(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Execute council transaction {} on {}",
            self.action.transaction_id, self.action.council
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_signer, mocked, push_return, MockProvider};
    use alloy_primitives::{Bytes, U256};
    use alloy_transport::mock::Asserter;

    fn call() -> CouncilCall {
        CouncilCall {
            council: Address::repeat_byte(1),
            member: Address::repeat_byte(2),
            transaction_id: U256::from(7),
        }
    }

    /// Queue `transactions(id)` and `getConfirmationCount(id)` answers.
    fn push_transaction(asserter: &Asserter, target: Address, executed: bool) {
        push_return(asserter, (target, executed, U256::ZERO, Bytes::new()));
        push_return(asserter, (U256::from(1),));
    }

    #[tokio::test]
    async fn test_confirm_ready_until_member_confirmed() {
        let (asserter, provider) = mocked();
        push_transaction(&asserter, Address::repeat_byte(0x11), false);
        // isConfirmedBy
        push_return(&asserter, (false,));

        let action = ConfirmAction::new(provider, mock_signer(), call());
        assert!(action.is_ready().await.unwrap());

        push_transaction(&asserter, Address::repeat_byte(0x11), false);
        push_return(&asserter, (true,));
        assert!(!action.is_ready().await.unwrap());
    }

    #[tokio::test]
    async fn test_confirm_not_ready_for_unknown_or_executed() {
        let (asserter, provider) = mocked();
        let action = ConfirmAction::new(provider, mock_signer(), call());

        push_transaction(&asserter, Address::ZERO, false);
        assert!(!action.is_ready().await.unwrap());

        push_transaction(&asserter, Address::repeat_byte(0x11), true);
        assert!(!action.is_ready().await.unwrap());
    }

    #[tokio::test]
    async fn test_council_execute_ready_at_quorum() {
        let (asserter, provider) = mocked();
        let action = CouncilExecuteAction::new(provider, mock_signer(), call());

        push_transaction(&asserter, Address::repeat_byte(0x11), false);
        // isConfirmed
        push_return(&asserter, (true,));
        assert!(action.is_ready().await.unwrap());

        push_transaction(&asserter, Address::repeat_byte(0x11), false);
        push_return(&asserter, (false,));
        assert!(!action.is_ready().await.unwrap());

        push_transaction(&asserter, Address::repeat_byte(0x11), true);
        assert!(!action.is_ready().await.unwrap());
    }

    #[tokio::test]
    async fn test_council_execute_completed_once_executed() {
        let (asserter, provider) = mocked();
        let action = CouncilExecuteAction::new(provider, mock_signer(), call());

        push_transaction(&asserter, Address::repeat_byte(0x11), true);
        assert!(action.is_completed().await.unwrap());

        push_transaction(&asserter, Address::repeat_byte(0x11), false);
        assert!(!action.is_completed().await.unwrap());
    }

    #[test]
    fn test_council_call_validation() {
        assert!(call().validate().is_ok());

        let mut input = call();
        input.council = Address::ZERO;
        assert!(input.validate().unwrap_err().to_string().contains("Council"));

        let mut input = call();
        input.member = Address::ZERO;
        assert!(input.validate().unwrap_err().to_string().contains("Member"));
    }

    #[test]
    fn test_descriptions() {
        let confirm = ConfirmAction::new(MockProvider, mock_signer(), call());
        assert!(confirm
            .description()
            .contains("Confirm council transaction 7"));

        let execute = CouncilExecuteAction::new(MockProvider, mock_signer(), call());
        assert!(execute
            .description()
            .contains("Execute council transaction 7"));
    }
}
