use dioxus::prelude::*;

use store::catalog;
use store::{OrderStatus, Restaurant};

use crate::components::{Button, ButtonVariant, Input};
use crate::icons::FaMagnifyingGlass;
use crate::restaurant_grid::{use_catalog, RestaurantGrid};
use crate::session::{commit, use_session};
use crate::views::ModalOverlay;
use crate::{Icon, LocationDialog, LoginDialog, Navbar, SignupDialog};

const ALL_AREAS: &str = "All";

#[derive(Clone, Debug, PartialEq)]
enum Dialog {
    Login,
    Signup,
    Location,
    Profile,
    Orders,
    Restaurant(Restaurant),
}

fn status_label(status: &OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Pending",
        OrderStatus::Accepted => "Accepted",
        OrderStatus::Preparing => "Preparing",
        OrderStatus::Ready => "Ready",
        OrderStatus::OutForDelivery => "Out for delivery",
        OrderStatus::Delivered => "Delivered",
        OrderStatus::Cancelled => "Cancelled",
        OrderStatus::Unknown => "Unknown",
    }
}

#[component]
fn CategoryBar(categories: Vec<String>, selected: Option<String>, on_select: EventHandler<Option<String>>) -> Element {
    let chip = |active: bool| {
        if active {
            "shrink-0 px-3 py-1.5 rounded-full text-sm bg-orange-500 text-white cursor-pointer"
        } else {
            "shrink-0 px-3 py-1.5 rounded-full text-sm bg-white text-neutral-700 border border-neutral-200 cursor-pointer"
        }
    };
    let options = categories.into_iter().map(|name| {
        let active = selected
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(&name));
        let value = name.clone();
        rsx! {
            button {
                key: "{name}",
                class: chip(active),
                onclick: move |_| on_select.call(if active { None } else { Some(value.clone()) }),
                "{name}"
            }
        }
    });

    rsx! {
        div {
            class: "category-bar flex gap-2 overflow-x-auto px-4 pb-3",
            button {
                class: chip(selected.is_none()),
                onclick: move |_| on_select.call(None),
                "All"
            }
            {options}
        }
    }
}

/// The storefront landing page.
#[component]
pub fn HomeView() -> Element {
    let session = use_session();
    let restaurants = use_catalog();

    let mut area_override = use_signal(|| None::<String>);
    let mut category = use_signal(|| None::<String>);
    let mut search = use_signal(String::new);
    let mut dialog = use_signal(|| None::<Dialog>);

    let state = session.read().clone();
    let customer = state.client.customer.clone();

    // Unresolved (None) until the stored state has loaded.
    let selected_area = area_override().or_else(|| {
        if state.loading {
            None
        } else {
            Some(
                customer
                    .as_ref()
                    .and_then(|c| c.delivery_area(&state.client.areas))
                    .unwrap_or_else(|| ALL_AREAS.to_string()),
            )
        }
    });
    let area_label = match selected_area.as_deref() {
        None => "Locating...".to_string(),
        Some(area) if area.eq_ignore_ascii_case(ALL_AREAS) => "All areas".to_string(),
        Some(area) => area.to_string(),
    };

    let catalog_value = restaurants.read().clone();
    let categories = match &catalog_value {
        Some(Ok(entries)) => catalog::categories(entries),
        _ => Vec::new(),
    };
    let signed_in = state.signed_in();

    rsx! {
        div {
            class: "min-h-screen bg-neutral-100",
            Navbar {
                selected_area: area_label,
                on_location_click: move |_| dialog.set(Some(Dialog::Location)),
                on_profile_click: move |_| {
                    dialog.set(Some(if signed_in { Dialog::Profile } else { Dialog::Login }))
                },
                on_track_order: move |_| dialog.set(Some(Dialog::Orders)),
            }

            div {
                class: "px-4 pb-3",
                div {
                    class: "flex items-center gap-2 bg-white rounded-full px-4 border border-neutral-200",
                    Icon { icon: FaMagnifyingGlass, width: 14, height: 14 }
                    Input {
                        class: "flex-1 border-0 focus:shadow-none",
                        r#type: "search",
                        placeholder: "Search restaurants or cuisines",
                        value: search(),
                        oninput: move |evt: FormEvent| search.set(evt.value()),
                    }
                }
            }

            CategoryBar {
                categories,
                selected: category(),
                on_select: move |c: Option<String>| category.set(c),
            }

            RestaurantGrid {
                restaurants: catalog_value,
                selected_area,
                category: category(),
                search: search(),
                on_restaurant_click: move |r: Restaurant| dialog.set(Some(Dialog::Restaurant(r))),
            }
        }

        {match dialog() {
            Some(Dialog::Login) => rsx! {
                LoginDialog {
                    on_close: move |_| dialog.set(None),
                    on_signup: move |_| dialog.set(Some(Dialog::Signup)),
                }
            },
            Some(Dialog::Signup) => rsx! {
                SignupDialog {
                    on_close: move |_| dialog.set(None),
                    on_login: move |_| dialog.set(Some(Dialog::Login)),
                }
            },
            Some(Dialog::Location) => rsx! {
                LocationDialog {
                    on_close: move |_| dialog.set(None),
                    on_area_change: move |area: String| area_override.set(Some(area)),
                }
            },
            Some(Dialog::Profile) => rsx! {
                ModalOverlay {
                    title: "Profile",
                    on_close: move |_| dialog.set(None),
                    div {
                        class: "p-6 flex flex-col gap-2",
                        if let Some(c) = customer.as_ref() {
                            p { class: "m-0 font-medium text-neutral-800", "{c.name}" }
                            p { class: "m-0 text-sm text-neutral-500", "{c.phone}" }
                            p { class: "m-0 text-sm text-neutral-500", "{c.email}" }
                        }
                        Button {
                            variant: ButtonVariant::Outline,
                            class: "mt-3",
                            onclick: move |_| {
                                spawn(async move {
                                    commit(session, |s| s.sign_out()).await;
                                    area_override.set(None);
                                    dialog.set(None);
                                });
                            },
                            "Sign out"
                        }
                    }
                }
            },
            Some(Dialog::Orders) => rsx! {
                ModalOverlay {
                    title: "Your orders",
                    on_close: move |_| dialog.set(None),
                    ul {
                        class: "list-none m-0 p-6 flex flex-col gap-2",
                        for order in customer.as_ref().map(|c| c.orders.clone()).unwrap_or_default() {
                            li {
                                key: "{order.id}",
                                class: "flex justify-between text-sm",
                                span { class: "text-neutral-700", "#{order.id}" }
                                span { class: "font-medium text-orange-600", {status_label(&order.status)} }
                            }
                        }
                    }
                }
            },
            Some(Dialog::Restaurant(restaurant)) => {
                let area = restaurant.area_name().to_string();
                let cuisines = restaurant.cuisines.clone().unwrap_or_default();
                rsx! {
                    ModalOverlay {
                        title: restaurant.name.clone(),
                        on_close: move |_| dialog.set(None),
                        div {
                            class: "p-6 flex flex-col gap-2 text-sm text-neutral-600",
                            p { class: "m-0", "{cuisines}" }
                            if let Some(address) = restaurant.address.as_ref() {
                                p { class: "m-0", "{address.street}" }
                                if !address.city.is_empty() {
                                    p { class: "m-0", "{address.city}, {address.state} {address.pincode}" }
                                }
                            }
                            p { class: "m-0 text-neutral-400", "{area}" }
                        }
                    }
                }
            }
            None => rsx! {},
        }}
    }
}
