use dioxus::prelude::*;

use crate::units;

/// Blank counts as valid: submitting it is a no-op.
pub fn amount_is_valid(input: &str) -> bool {
    units::parse_display(input).is_ok()
}

/// Amount used by Increase Balance / Decrease Balance, in ETH.
#[component]
pub fn AmountForm(mut amount: Signal<String>) -> Element {
    let validation = units::parse_display(&amount.read()).err();

    rsx! {
        div { class: "form-group",
            label { "Amount (ETH)" }
            input {
                class: "input",
                r#type: "text",
                placeholder: "0.5",
                value: "{amount}",
                oninput: move |e| amount.set(e.value()),
            }
            if let Some(e) = validation {
                p { class: "error-text", "{e}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_validation() {
        assert!(amount_is_valid(""));
        assert!(amount_is_valid("1.25"));
        assert!(!amount_is_valid("1,25"));
        assert!(!amount_is_valid("-3"));
    }
}
