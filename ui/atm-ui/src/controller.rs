//! View-model controller: maps (snapshot, user event) to the next snapshot,
//! calling the wallet and contract along the way.

use std::sync::Arc;

use alloy_primitives::U256;
use tracing::{info, warn};

use crate::config::{AtmConfig, FIXED_ACTION_AMOUNT};
use crate::contract::{ContractInterface, PendingTransaction};
use crate::error::AtmError;
use crate::provider::WalletProvider;
use crate::state::{AtmState, WalletHandle};
use crate::units;

/// Balance-affecting buttons on the account panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Deposit,
    Withdraw,
    IncreaseBalance,
    DecreaseBalance,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Deposit,
        Action::Withdraw,
        Action::IncreaseBalance,
        Action::DecreaseBalance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::Deposit => "Deposit 1 ETH",
            Action::Withdraw => "Withdraw 1 ETH",
            Action::IncreaseBalance => "Increase Balance",
            Action::DecreaseBalance => "Decrease Balance",
        }
    }

    /// Whether the amount comes from the amount form rather than being fixed.
    pub fn takes_amount(self) -> bool {
        matches!(self, Action::IncreaseBalance | Action::DecreaseBalance)
    }
}

#[derive(Clone, Debug)]
pub struct Controller {
    config: AtmConfig,
    interface: Arc<ContractInterface>,
}

impl Controller {
    pub fn new(config: AtmConfig, interface: ContractInterface) -> Self {
        Self {
            config,
            interface: Arc::new(interface),
        }
    }

    pub fn config(&self) -> &AtmConfig {
        &self.config
    }

    /// Records the injected provider, if any, then silently asks it for
    /// already-authorized accounts. A failed silent query is not an error.
    pub async fn detect_wallet(
        &self,
        state: AtmState,
        provider: Option<Arc<dyn WalletProvider>>,
    ) -> AtmState {
        let Some(provider) = provider else {
            info!("no wallet provider, showing install prompt");
            return state;
        };
        let state = state.with_wallet(WalletHandle::new(provider.clone()));

        match provider.list_accounts().await {
            Ok(accounts) => match accounts.first() {
                Some(&account) => {
                    info!(%account, "account already authorized");
                    let connected = state.with_account(account);
                    match self.bind_contract(connected.clone()) {
                        Ok(bound) => bound,
                        Err(e) => {
                            warn!(error = %e, "could not bind contract");
                            connected
                        }
                    }
                }
                None => {
                    info!("no account found");
                    state
                }
            },
            Err(e) => {
                warn!(error = %e, "silent account query failed");
                state
            }
        }
    }

    /// Requests account access (one authorization prompt) and binds the
    /// contract to the first returned account.
    pub async fn connect(&self, state: AtmState) -> Result<AtmState, AtmError> {
        let provider = state.wallet().ok_or(AtmError::WalletMissing)?.provider().clone();

        let accounts = provider.request_accounts().await?;
        let account = *accounts.first().ok_or(AtmError::NoAccounts)?;
        info!(%account, "account connected");

        self.bind_contract(state.with_account(account))
    }

    pub fn bind_contract(&self, state: AtmState) -> Result<AtmState, AtmError> {
        state.bind_contract(
            self.config.contract_address,
            Arc::clone(&self.interface),
            self.config.receipt_poll_interval,
        )
    }

    /// Re-reads the contract balance. Does nothing until a contract is bound.
    pub async fn refresh_balance(&self, state: AtmState) -> Result<AtmState, AtmError> {
        match self.read_balance(&state).await? {
            Some(balance) => Ok(state.with_balance(balance)),
            None => Ok(state),
        }
    }

    /// Reads the balance without producing a snapshot, so the caller can
    /// apply it to whatever snapshot is current when the read returns.
    pub async fn read_balance(&self, state: &AtmState) -> Result<Option<U256>, AtmError> {
        match state.contract() {
            Some(contract) => Ok(Some(contract.get_balance().await?)),
            None => Ok(None),
        }
    }

    pub async fn deposit(&self, state: AtmState) -> Result<AtmState, AtmError> {
        let Some(contract) = state.contract() else {
            return Ok(state);
        };
        let pending = contract.deposit(fixed_amount()?).await?;
        self.settle(state, pending).await
    }

    pub async fn withdraw(&self, state: AtmState) -> Result<AtmState, AtmError> {
        let Some(contract) = state.contract() else {
            return Ok(state);
        };
        let pending = contract.withdraw(fixed_amount()?).await?;
        self.settle(state, pending).await
    }

    /// `input` is in display units; blank input submits nothing.
    pub async fn increase_balance(&self, state: AtmState, input: &str) -> Result<AtmState, AtmError> {
        let Some(contract) = state.contract() else {
            return Ok(state);
        };
        let Some(amount) = units::parse_display(input)? else {
            return Ok(state);
        };
        let pending = contract.increase_balance(amount).await?;
        self.settle(state, pending).await
    }

    /// `input` is in display units; blank input submits nothing.
    pub async fn decrease_balance(&self, state: AtmState, input: &str) -> Result<AtmState, AtmError> {
        let Some(contract) = state.contract() else {
            return Ok(state);
        };
        let Some(amount) = units::parse_display(input)? else {
            return Ok(state);
        };
        let pending = contract.decrease_balance(amount).await?;
        self.settle(state, pending).await
    }

    pub async fn perform(
        &self,
        state: AtmState,
        action: Action,
        input: &str,
    ) -> Result<AtmState, AtmError> {
        match action {
            Action::Deposit => self.deposit(state).await,
            Action::Withdraw => self.withdraw(state).await,
            Action::IncreaseBalance => self.increase_balance(state, input).await,
            Action::DecreaseBalance => self.decrease_balance(state, input).await,
        }
    }

    async fn settle(
        &self,
        state: AtmState,
        pending: PendingTransaction,
    ) -> Result<AtmState, AtmError> {
        let hash = pending.hash();
        let receipt = pending.confirmed().await?;
        info!(%hash, block = ?receipt.block_number, "refreshing balance after confirmation");
        self.refresh_balance(state).await
    }
}

fn fixed_amount() -> Result<U256, AtmError> {
    units::parse_display(FIXED_ACTION_AMOUNT)?
        .ok_or_else(|| AtmError::InvalidAmount("fixed amount is blank".into()))
}
