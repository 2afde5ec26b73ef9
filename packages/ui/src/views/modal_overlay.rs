use dioxus::prelude::*;

use crate::icons::FaXmark;
use crate::Icon;

/// A full-screen overlay that centers its children in a modal card.
/// Clicking outside the card or the close button triggers `on_close`.
#[component]
pub fn ModalOverlay(title: String, on_close: EventHandler<()>, children: Element) -> Element {
    rsx! {
        div {
            class: "fixed inset-0 flex items-center justify-center bg-black/30",
            style: "z-index: 2000",
            onclick: move |_| on_close.call(()),
            div {
                class: "bg-white rounded-lg shadow-lg max-w-md w-full mx-4 max-h-[90vh] overflow-y-auto",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                div {
                    class: "flex items-center justify-between px-6 pt-5",
                    h2 { class: "m-0 text-lg font-semibold text-neutral-800", "{title}" }
                    button {
                        class: "p-1 text-neutral-400 hover:text-neutral-700 cursor-pointer",
                        "aria-label": "Close",
                        onclick: move |_| on_close.call(()),
                        Icon { icon: FaXmark, width: 16, height: 16 }
                    }
                }
                {children}
            }
        }
    }
}
