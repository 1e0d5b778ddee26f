//! Session state for the ATM window.
//!
//! `AtmState` is an immutable snapshot. Every change goes through one of the
//! transition methods, which consume the old snapshot and return the next one;
//! the UI stores the current snapshot in a Dioxus `Signal`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, U256};

use crate::contract::{ContractHandle, ContractInterface};
use crate::error::AtmError;
use crate::provider::WalletProvider;

/// Where the session is. Derived from the snapshot, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    NoWallet,
    WalletDetected,
    AccountConnected,
    ContractBound,
}

/// The injected wallet provider.
#[derive(Clone)]
pub struct WalletHandle(Arc<dyn WalletProvider>);

impl WalletHandle {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self(provider)
    }

    pub fn provider(&self) -> &Arc<dyn WalletProvider> {
        &self.0
    }
}

impl fmt::Debug for WalletHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WalletHandle")
    }
}

#[derive(Clone, Debug, Default)]
pub struct AtmState {
    wallet: Option<WalletHandle>,
    account: Option<Address>,
    contract: Option<ContractHandle>,
    balance: Option<U256>,
}

impl AtmState {
    pub fn phase(&self) -> Phase {
        match (&self.wallet, &self.account, &self.contract) {
            (None, _, _) => Phase::NoWallet,
            (Some(_), None, _) => Phase::WalletDetected,
            (Some(_), Some(_), None) => Phase::AccountConnected,
            (Some(_), Some(_), Some(_)) => Phase::ContractBound,
        }
    }

    pub fn wallet(&self) -> Option<&WalletHandle> {
        self.wallet.as_ref()
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn contract(&self) -> Option<&ContractHandle> {
        self.contract.as_ref()
    }

    /// Cached balance in base units. Only reported while a contract is bound.
    pub fn balance(&self) -> Option<U256> {
        self.contract.as_ref().and(self.balance)
    }

    /// Stores the detected wallet. A wallet already present is kept.
    pub fn with_wallet(mut self, wallet: WalletHandle) -> Self {
        if self.wallet.is_none() {
            self.wallet = Some(wallet);
        }
        self
    }

    /// Sets (or, on reconnect, replaces) the active account.
    pub fn with_account(mut self, account: Address) -> Self {
        self.account = Some(account);
        self
    }

    /// Builds the contract handle for the active account. The existing handle
    /// is kept if one is already bound.
    pub fn bind_contract(
        mut self,
        address: Address,
        interface: Arc<ContractInterface>,
        poll_interval: Duration,
    ) -> Result<Self, AtmError> {
        if self.contract.is_some() {
            return Ok(self);
        }
        let provider = self.wallet.as_ref().ok_or(AtmError::WalletMissing)?.provider().clone();
        let signer = self.account.ok_or(AtmError::NoAccount)?;
        self.contract = Some(ContractHandle::new(
            provider,
            signer,
            address,
            interface,
            poll_interval,
        ));
        Ok(self)
    }

    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = Some(balance);
        self
    }
}
