#![allow(non_snake_case)]

mod components;
mod config;
mod contract;
mod controller;
mod error;
mod provider;
mod state;
#[cfg(test)]
mod testing;
mod units;
mod view;

use std::sync::Arc;

use dioxus::prelude::*;
use tracing::{error, info};

use components::notice::Notice;
use config::AtmConfig;
use contract::ContractInterface;
use controller::Controller;
use error::AtmError;
use provider::{RpcWallet, WalletProvider};
use state::AtmState;

const STYLE: &str = include_str!("../assets/style.css");

fn build_controller() -> Result<Controller, AtmError> {
    let config = AtmConfig::bundled()?;
    let interface = ContractInterface::bundled()?;
    info!(
        rpc_url = %config.rpc_url,
        contract = %config.contract_address,
        name = interface.name(),
        "configuration loaded"
    );
    Ok(Controller::new(config, interface))
}

fn main() {
    if let Err(e) = dioxus::logger::init(tracing::Level::INFO) {
        eprintln!("logger already initialized: {e}");
    }

    let controller = match build_controller() {
        Ok(controller) => controller,
        Err(e) => {
            error!(error = %e, "cannot start");
            std::process::exit(1);
        }
    };

    dioxus::LaunchBuilder::new().with_context(controller).launch(App);
}

#[component]
fn App() -> Element {
    let controller = use_context::<Controller>();
    let mut session = use_context_provider(|| Signal::new(AtmState::default()));
    use_context_provider(|| Signal::new(None::<Notice>));

    // Probe for a wallet once, on mount.
    use_hook(move || {
        spawn(async move {
            let provider = RpcWallet::detect(&controller.config().rpc_url)
                .await
                .map(|wallet| Arc::new(wallet) as Arc<dyn WalletProvider>);
            let current = session.read().clone();
            let next = controller.detect_wallet(current, provider).await;
            session.set(next);
        })
    });

    rsx! {
        document::Style { {STYLE} }
        main { class: "container",
            components::layout::Header {}
            components::layout::Body {}
            components::notice::NoticeModal {}
        }
    }
}
