use dioxus::prelude::*;

use super::account_panel::AccountPanel;
use super::connect::ConnectButton;
use crate::state::AtmState;
use crate::view::{project, View};

#[component]
pub fn Header() -> Element {
    rsx! {
        header { class: "header",
            h1 { "Welcome to the ATM!" }
        }
    }
}

/// Picks the install prompt, the connect button or the account panel.
#[component]
pub fn Body() -> Element {
    let session = use_context::<Signal<AtmState>>();
    let view = project(&session.read());

    match view {
        View::InstallPrompt => rsx! {
            p { class: "hint", "Please install a wallet provider in order to use this ATM." }
        },
        View::ConnectPrompt => rsx! { ConnectButton {} },
        View::AccountPanel { account, balance } => rsx! {
            AccountPanel { account: account, balance: balance.unwrap_or_default() }
        },
    }
}
