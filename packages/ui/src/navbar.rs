use dioxus::prelude::*;

use crate::icons::{FaArrowRight, FaLocationDot, FaUser};
use crate::session::use_session;
use crate::Icon;

/// Top bar: delivery area on the left, order tracking and profile on the right.
#[component]
pub fn Navbar(
    selected_area: String,
    on_location_click: EventHandler<()>,
    on_profile_click: EventHandler<()>,
    on_track_order: EventHandler<()>,
) -> Element {
    let session = use_session();
    let state = session.read();
    let customer = state.client.customer.as_ref();
    let initial = customer.and_then(|c| c.initial()).map(|c| c.to_string());
    let tracking = customer.is_some_and(|c| c.has_preparing_order());

    rsx! {
        div {
            class: "flex items-center justify-between px-4 py-4",
            button {
                class: "flex items-center gap-1 w-3/5 min-w-0 cursor-pointer text-left",
                onclick: move |_| on_location_click.call(()),
                span {
                    class: "p-1.5 bg-white rounded-full flex items-center justify-center shadow-sm text-neutral-900",
                    Icon { icon: FaLocationDot, width: 16, height: 16 }
                }
                span { class: "font-medium truncate text-sm md:text-base", "{selected_area}" }
            }

            div {
                class: "flex items-center gap-1 w-1/2 justify-end",
                if tracking {
                    button {
                        class: "bg-orange-500 text-white px-2 py-1 rounded-full flex items-center gap-1 cursor-pointer hover:bg-orange-600 transition-colors",
                        onclick: move |_| on_track_order.call(()),
                        span { class: "text-[10px] font-medium whitespace-nowrap", "Track order" }
                        Icon { icon: FaArrowRight, width: 10, height: 10 }
                    }
                }
                button {
                    class: "w-12 h-12 bg-orange-500 rounded-full flex items-center justify-center text-white font-semibold cursor-pointer",
                    "aria-label": "Profile",
                    onclick: move |_| on_profile_click.call(()),
                    if let Some(letter) = initial {
                        span { class: "text-xl font-semibold", "{letter}" }
                    } else {
                        Icon { icon: FaUser, width: 18, height: 18 }
                    }
                }
            }
        }
    }
}
