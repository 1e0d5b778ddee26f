//! What the window shows for a given snapshot. Pure; components render it.

use crate::state::{AtmState, Phase};
use crate::units;

#[derive(Clone, Debug, PartialEq)]
pub enum View {
    InstallPrompt,
    ConnectPrompt,
    AccountPanel {
        account: String,
        /// Display units; `None` until the first read completes.
        balance: Option<String>,
    },
}

pub fn project(state: &AtmState) -> View {
    match (state.phase(), state.account()) {
        (Phase::NoWallet, _) => View::InstallPrompt,
        (_, None) => View::ConnectPrompt,
        (_, Some(account)) => View::AccountPanel {
            account: account.to_string(),
            balance: state.balance().map(units::format_display),
        },
    }
}

/// True when the panel is up but has nothing to show yet, so a read is due.
pub fn needs_balance(state: &AtmState) -> bool {
    state.contract().is_some() && state.balance().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::state::WalletHandle;
    use crate::testing::FakeWallet;
    use alloy_primitives::{address, Address};

    const ALICE: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

    #[test]
    fn test_account_without_contract_shows_panel_without_balance() {
        let state = AtmState::default()
            .with_wallet(WalletHandle::new(Arc::new(FakeWallet::default())))
            .with_account(ALICE);
        assert_eq!(
            project(&state),
            View::AccountPanel {
                account: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".into(),
                balance: None,
            }
        );
        assert!(!needs_balance(&state));
    }

    #[test]
    fn test_empty_state_is_install_prompt() {
        assert_eq!(project(&AtmState::default()), View::InstallPrompt);
    }
}
