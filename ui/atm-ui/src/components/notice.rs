use dioxus::prelude::*;

/// Blocking message; the rest of the window is covered until it is dismissed.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice(pub String);

#[component]
pub fn NoticeModal() -> Element {
    let mut notice = use_context::<Signal<Option<Notice>>>();
    let current = notice.read().clone();

    rsx! {
        if let Some(Notice(message)) = current {
            div { class: "modal-backdrop",
                div { class: "modal",
                    p { "{message}" }
                    button {
                        class: "action-button",
                        onclick: move |_| notice.set(None),
                        "OK"
                    }
                }
            }
        }
    }
}
