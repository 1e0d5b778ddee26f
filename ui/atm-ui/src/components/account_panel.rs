use dioxus::prelude::*;
use tracing::error;

use super::amount_form::{amount_is_valid, AmountForm};
use crate::controller::{Action, Controller};
use crate::state::AtmState;
use crate::view::needs_balance;

/// Reads the balance and applies it to the snapshot current when the read
/// returns, so a read that finishes after an action cannot roll it back.
fn fetch_balance(
    controller: Controller,
    mut session: Signal<AtmState>,
    mut reading: Signal<bool>,
    mut error_msg: Signal<Option<String>>,
) {
    reading.set(true);
    error_msg.set(None);

    spawn(async move {
        let current = session.peek().clone();
        let result = controller.read_balance(&current).await;
        reading.set(false);

        match result {
            Ok(Some(balance)) => {
                let updated = session.peek().clone().with_balance(balance);
                session.set(updated);
            }
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, "balance read failed");
                error_msg.set(Some(e.to_string()));
            }
        }
    });
}

fn run_action(
    controller: Controller,
    action: Action,
    mut session: Signal<AtmState>,
    mut busy: Signal<Option<Action>>,
    mut error_msg: Signal<Option<String>>,
    mut amount: Signal<String>,
) {
    let input = amount.read().clone();
    busy.set(Some(action));
    error_msg.set(None);

    spawn(async move {
        let current = session.read().clone();
        let result = controller.perform(current, action, &input).await;
        busy.set(None);

        match result {
            Ok(next) => {
                session.set(next);
                if action.takes_amount() {
                    amount.set(String::new());
                }
            }
            Err(e) => {
                error!(?action, error = %e, "action failed");
                error_msg.set(Some(e.to_string()));
            }
        }
    });
}

#[component]
pub fn AccountPanel(account: String, balance: String) -> Element {
    let session = use_context::<Signal<AtmState>>();
    let controller = use_context::<Controller>();

    let busy = use_signal(|| None::<Action>);
    let reading = use_signal(|| false);
    let error_msg = use_signal(|| None::<String>);
    let amount = use_signal(String::new);

    // First read once the contract is bound.
    {
        let controller = controller.clone();
        use_effect(move || {
            if needs_balance(&session.read()) && !*reading.peek() {
                fetch_balance(controller.clone(), session, reading, error_msg);
            }
        });
    }

    let in_flight = *busy.read();
    let is_reading = *reading.read();
    let refresh_controller = controller.clone();
    let amount_ok = amount_is_valid(&amount.read());

    rsx! {
        div { class: "account-info",
            p { "Your Account: " span { class: "mono", "{account}" } }
            p { "Your Balance: {balance} ETH" }
            button {
                class: "refresh-button",
                disabled: is_reading || in_flight.is_some(),
                onclick: move |_| fetch_balance(refresh_controller.clone(), session, reading, error_msg),
                if is_reading { "Fetching..." } else { "Refresh" }
            }

            AmountForm { amount: amount }

            div { class: "actions",
                for action in Action::ALL {
                    {
                        let controller = controller.clone();
                        let disabled = in_flight.is_some() || is_reading || (action.takes_amount() && !amount_ok);
                        rsx! {
                            button {
                                key: "{action.label()}",
                                class: "action-button",
                                disabled: disabled,
                                onclick: move |_| {
                                    run_action(controller.clone(), action, session, busy, error_msg, amount);
                                },
                                if in_flight == Some(action) { "Waiting..." } else { "{action.label()}" }
                            }
                        }
                    }
                }
            }

            if let Some(msg) = error_msg.read().as_ref() {
                p { class: "error-text", "{msg}" }
            }
        }
    }
}
