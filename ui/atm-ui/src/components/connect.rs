use dioxus::prelude::*;
use tracing::error;

use super::notice::Notice;
use crate::controller::Controller;
use crate::error::AtmError;
use crate::state::AtmState;

#[component]
pub fn ConnectButton() -> Element {
    let mut session = use_context::<Signal<AtmState>>();
    let mut notice = use_context::<Signal<Option<Notice>>>();
    let controller = use_context::<Controller>();

    let mut busy = use_signal(|| false);
    let mut error_msg = use_signal(|| None::<String>);

    let connect = move |_| {
        let controller = controller.clone();
        busy.set(true);
        error_msg.set(None);

        spawn(async move {
            let current = session.read().clone();
            let result = controller.connect(current).await;
            busy.set(false);

            match result {
                Ok(next) => session.set(next),
                Err(AtmError::WalletMissing) => {
                    notice.set(Some(Notice(AtmError::WalletMissing.to_string())));
                }
                Err(e) => {
                    error!(error = %e, "connect failed");
                    error_msg.set(Some(e.to_string()));
                }
            }
        });
    };

    rsx! {
        div { class: "connect",
            button {
                class: "action-button",
                disabled: *busy.read(),
                onclick: connect,
                if *busy.read() { "Waiting for wallet..." } else { "Please connect your wallet" }
            }
            if let Some(msg) = error_msg.read().as_ref() {
                p { class: "error-text", "{msg}" }
            }
        }
    }
}
