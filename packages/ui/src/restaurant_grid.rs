use dioxus::prelude::*;

use store::catalog::{self, CatalogEntry, CatalogFilter};
use store::Restaurant;

use crate::icons::{FaLocationDot, FaUtensils};
use crate::session::{api_client, refresh_customer, use_config, use_session};
use crate::Icon;

/// Fetch and normalize the restaurant catalogue.
pub fn use_catalog() -> Resource<Result<Vec<CatalogEntry>, String>> {
    let session = use_session();
    let config = use_config();
    use_resource(move || {
        let config = config.clone();
        async move {
            let client = api_client(&config, &session.peek());
            match client.restaurants().await {
                Ok(restaurants) => Ok(catalog::normalize(restaurants)),
                Err(e) => {
                    tracing::error!("Error fetching restaurants: {e}");
                    Err(e.to_string())
                }
            }
        }
    })
}

#[component]
fn RestaurantCard(entry: CatalogEntry, on_click: EventHandler<Restaurant>) -> Element {
    let restaurant = entry.restaurant.clone();
    let cuisines = restaurant.cuisines.clone().unwrap_or_default();
    let street = restaurant
        .address
        .as_ref()
        .map(|a| a.street.clone())
        .unwrap_or_default();
    let area = restaurant.area_name().to_string();
    let closed_class = if entry.is_currently_open {
        ""
    } else {
        "restaurant-card--closed"
    };

    rsx! {
        button {
            class: "text-left flex flex-col gap-2 p-4 rounded-2xl bg-white shadow-sm border border-neutral-100 cursor-pointer hover:shadow-md transition-shadow {closed_class}",
            onclick: move |_| on_click.call(restaurant.clone()),
            div {
                class: "flex items-center justify-between gap-2",
                h3 { class: "m-0 text-base font-semibold text-neutral-800 truncate", "{entry.restaurant.name}" }
                if entry.is_currently_open {
                    span { class: "text-xs font-medium text-green-600", "Open" }
                } else {
                    span { class: "text-xs font-medium text-neutral-500", "Closed" }
                }
            }
            p {
                class: "m-0 flex items-center gap-1.5 text-sm text-neutral-600",
                Icon { icon: FaUtensils, width: 12, height: 12 }
                "{cuisines}"
            }
            p {
                class: "m-0 flex items-center gap-1.5 text-xs text-neutral-400 truncate",
                Icon { icon: FaLocationDot, width: 12, height: 12 }
                "{street}, {area}"
            }
        }
    }
}

/// The filtered catalogue: open restaurants, a divider, then closed ones.
///
/// `restaurants` is `None` while loading. `selected_area` is `None` while the
/// customer's area is still being resolved.
#[component]
pub fn RestaurantGrid(
    restaurants: Option<Result<Vec<CatalogEntry>, String>>,
    selected_area: Option<String>,
    category: Option<String>,
    search: String,
    on_restaurant_click: EventHandler<Restaurant>,
) -> Element {
    let session = use_session();
    let config = use_config();

    // Refresh the stored profile once, after the stored state has loaded.
    let mut refreshed = use_signal(|| false);
    use_effect(move || {
        if session.read().loading || *refreshed.peek() {
            return;
        }
        refreshed.set(true);
        spawn(refresh_customer(config.clone(), session));
    });

    let entries = match &restaurants {
        None => {
            return rsx! {
                div {
                    class: "grid grid-cols-1 sm:grid-cols-2 gap-4 px-4 pb-8",
                    for index in 0..4 {
                        div { key: "{index}", class: "aspect-[1.8/1] rounded-2xl skeleton" }
                    }
                }
            };
        }
        Some(Err(message)) => {
            return rsx! {
                div {
                    class: "text-center py-8",
                    p { class: "text-red-500", "{message}" }
                }
            };
        }
        Some(Ok(entries)) => entries,
    };

    let Some(area) = selected_area else {
        return rsx! {
            div { class: "text-center py-8 text-neutral-500", "Fetching restaurants in your area..." }
        };
    };

    let mut filter = CatalogFilter::new(area).with_search(search);
    if let Some(category) = category {
        filter = filter.with_category(category);
    }
    let listing = catalog::filter(entries, &filter);

    if listing.is_empty() {
        let message = catalog::empty_message(&filter);
        return rsx! {
            div { class: "text-center py-8 text-neutral-500", "{message}" }
        };
    }

    let show_divider = listing.show_divider();
    let card = move |entry: CatalogEntry| {
        let key = entry.restaurant.id.clone();
        rsx! {
            RestaurantCard {
                key: "{key}",
                entry,
                on_click: move |r: Restaurant| on_restaurant_click.call(r),
            }
        }
    };

    rsx! {
        div {
            class: "grid grid-cols-1 sm:grid-cols-2 gap-4 px-4 pb-8",
            {listing.open.into_iter().map(card)}
            if show_divider {
                div { class: "col-span-full mt-4 border-t border-neutral-300 pt-4" }
            }
            {listing.closed.into_iter().map(card)}
        }
    }
}
