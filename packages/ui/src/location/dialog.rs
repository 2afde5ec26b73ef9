use dioxus::prelude::*;

use api::ReverseGeocoder;
use store::{AddressFailurePolicy, AddressForm, LatLng, MapLocation, StorefrontConfig};

use super::MapPicker;
use crate::components::{Button, ButtonVariant, Input, Label};
use crate::geolocation;
use crate::icons::{FaLocationCrosshairs, FaMapLocationDot};
use crate::session::{api_client, commit, use_config, use_session};
use crate::views::ModalOverlay;
use crate::Icon;

/// Reverse-geocode `point` into the form. On failure the pin is still placed
/// so the customer can finish the fields by hand.
async fn locate(
    config: &StorefrontConfig,
    mut form: Signal<AddressForm>,
    mut error: Signal<Option<String>>,
    point: LatLng,
) {
    let geocoder = ReverseGeocoder::new(config.geocoding.reverse_url.clone());
    match geocoder.reverse(point.lat, point.lng).await {
        Ok(result) => form.with_mut(|f| f.apply_geocode(&result, point.lat, point.lng)),
        Err(e) => {
            tracing::warn!("Reverse geocoding failed: {e}");
            error.set(Some("Failed to fetch address from location.".to_string()));
            form.with_mut(|f| {
                f.map_location = Some(MapLocation {
                    lat: point.lat,
                    lng: point.lng,
                    address: String::new(),
                });
                f.map_center = point;
            });
        }
    }
}

#[component]
fn AddressField(
    id: String,
    label: String,
    value: String,
    disabled: bool,
    on_input: EventHandler<String>,
) -> Element {
    rsx! {
        div {
            Label { html_for: "{id}", "{label}" }
            Input {
                id: "{id}",
                class: "w-full mt-1.5",
                placeholder: "{label}",
                value,
                disabled,
                oninput: move |evt: FormEvent| on_input.call(evt.value()),
            }
        }
    }
}

/// Delivery address editor.
///
/// `on_area_change` receives the area the customer now delivers to.
#[component]
pub fn LocationDialog(on_close: EventHandler<()>, on_area_change: EventHandler<String>) -> Element {
    let session = use_session();
    let config = use_config();

    let default_center = config.address.default_center();
    let mut form = use_signal(|| {
        let state = session.peek();
        AddressForm::hydrate(state.client.customer.as_ref(), &state.client.areas, default_center)
    });
    let mut dropdown_open = use_signal(|| false);
    let mut locating = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let current_config = config.clone();
    let handle_current_location = move |_| {
        let config = current_config.clone();
        spawn(async move {
            error.set(None);
            locating.set(true);
            match geolocation::current_position().await {
                Ok(point) => {
                    locate(&config, form, error, point).await;
                    form.with_mut(|f| f.show_map = false);
                }
                Err(_) => error.set(Some("Unable to retrieve your location.".to_string())),
            }
            locating.set(false);
        });
    };

    let pick_config = config.clone();
    let handle_pick = move |point: LatLng| {
        let config = pick_config.clone();
        spawn(async move {
            error.set(None);
            form.with_mut(|f| f.show_map = true);
            locate(&config, form, error, point).await;
        });
    };

    let submit_config = config.clone();
    let handle_submit = move |_| {
        let config = submit_config.clone();
        spawn(async move {
            if !form.peek().is_submittable() {
                return;
            }
            error.set(None);
            form.with_mut(|f| f.submitting = true);

            let state = session.peek().clone();
            let typed_area = form.peek().area.trim().to_string();
            let Some(customer_id) = state.client.customer_id().map(str::to_string) else {
                tracing::info!("No signed-in customer; keeping the address on this device");
                form.with_mut(|f| f.submitting = false);
                on_area_change.call(typed_area);
                on_close.call(());
                return;
            };

            let payload = form.peek().payload(&state.client.areas);
            let result = api_client(&config, &state)
                .update_address(&customer_id, &payload)
                .await;
            form.with_mut(|f| f.submitting = false);

            match result {
                Ok(customer) => {
                    let area = customer
                        .area
                        .as_ref()
                        .map(|a| a.area_name.trim().to_string())
                        .filter(|name| !name.is_empty())
                        .unwrap_or(typed_area);
                    commit(session, |s| s.customer = Some(customer)).await;
                    on_area_change.call(area);
                    on_close.call(());
                }
                Err(e) => {
                    tracing::warn!("Address update failed: {e}");
                    match config.address.on_update_failure {
                        AddressFailurePolicy::FallBackToTypedArea => {
                            on_area_change.call(typed_area);
                            on_close.call(());
                        }
                        AddressFailurePolicy::SurfaceError => error.set(Some(e.to_string())),
                    }
                }
            }
        });
    };

    let current = form();
    let areas = session.read().client.areas.clone();
    let matches: Vec<_> = current
        .matching_areas(&areas, dropdown_open())
        .into_iter()
        .cloned()
        .collect();
    let has_matches = !matches.is_empty();
    let options = matches.into_iter().map(move |area| {
        let selected = area.clone();
        rsx! {
            li {
                key: "{area.id}",
                class: "px-3 py-2 text-sm cursor-pointer hover:bg-orange-50",
                onclick: move |_| {
                    form.with_mut(|f| f.select_area(&selected));
                    dropdown_open.set(false);
                },
                span { class: "text-neutral-800", "{area.area_name}" }
                span { class: "ml-2 text-xs text-neutral-400", "{area.city_name}" }
            }
        }
    });
    let busy = current.submitting;
    let picker_key = match &current.map_location {
        Some(l) => format!("{},{}:{},{}", current.map_center.lat, current.map_center.lng, l.lat, l.lng),
        None => format!("{},{}", current.map_center.lat, current.map_center.lng),
    };
    let pinned = current.map_location.as_ref().map(|l| {
        if l.address.is_empty() {
            format!("Pinned at {:.5}, {:.5}", l.lat, l.lng)
        } else {
            l.address.clone()
        }
    });

    rsx! {
        ModalOverlay {
            title: "Delivery address",
            on_close: move |_| on_close.call(()),
            div {
                class: "p-6 flex flex-col gap-4",

                AddressField {
                    id: "address-house",
                    label: "House/Flat Number",
                    value: current.house_number.clone(),
                    disabled: busy,
                    on_input: move |v: String| form.with_mut(|f| f.house_number = v),
                }
                AddressField {
                    id: "address-street",
                    label: "Street",
                    value: current.street.clone(),
                    disabled: busy,
                    on_input: move |v: String| form.with_mut(|f| f.street = v),
                }
                AddressField {
                    id: "address-landmark",
                    label: "Landmark (optional)",
                    value: current.landmark.clone(),
                    disabled: busy,
                    on_input: move |v: String| form.with_mut(|f| f.landmark = v),
                }

                div {
                    class: "relative",
                    Label { html_for: "address-area", "Area" }
                    Input {
                        id: "address-area",
                        class: "w-full mt-1.5",
                        placeholder: "Search area",
                        value: current.area.clone(),
                        disabled: busy,
                        onfocus: move |_| dropdown_open.set(true),
                        oninput: move |evt: FormEvent| {
                            form.with_mut(|f| f.set_area_text(evt.value()));
                            dropdown_open.set(true);
                        },
                    }
                    if dropdown_open() && has_matches {
                        ul {
                            class: "absolute left-0 right-0 z-10 mt-1 max-h-48 overflow-y-auto bg-white border border-neutral-200 rounded shadow-md list-none p-0 m-0",
                            {options}
                        }
                    }
                }

                div {
                    class: "grid grid-cols-2 gap-2",
                    AddressField {
                        id: "address-city",
                        label: "City",
                        value: current.city.clone(),
                        disabled: busy,
                        on_input: move |v: String| form.with_mut(|f| f.city = v),
                    }
                    AddressField {
                        id: "address-state",
                        label: "State",
                        value: current.state.clone(),
                        disabled: busy,
                        on_input: move |v: String| form.with_mut(|f| f.state = v),
                    }
                }

                div {
                    class: "flex gap-2",
                    Button {
                        variant: ButtonVariant::Outline,
                        class: "flex-1",
                        disabled: busy || locating(),
                        onclick: handle_current_location,
                        Icon { icon: FaLocationCrosshairs, width: 14, height: 14 }
                        if locating() { "Locating..." } else { "Get Current Location" }
                    }
                    Button {
                        variant: ButtonVariant::Outline,
                        class: "flex-1",
                        disabled: busy,
                        onclick: move |_| form.with_mut(|f| f.show_map = !f.show_map),
                        Icon { icon: FaMapLocationDot, width: 14, height: 14 }
                        if current.show_map { "Hide map" } else { "Pick on map" }
                    }
                }

                if current.show_map {
                    MapPicker {
                        key: "{picker_key}",
                        center: current.map_center,
                        location: current.map_location.clone(),
                        zoom: config.address.map_zoom,
                        disabled: busy,
                        on_pick: handle_pick,
                    }
                } else if let Some(pinned) = pinned {
                    p { class: "m-0 text-xs text-neutral-500", "{pinned}" }
                }

                if let Some(message) = error() {
                    p { class: "m-0 text-sm text-red-600", "{message}" }
                }

                Button {
                    class: "w-full",
                    disabled: !current.is_submittable(),
                    onclick: handle_submit,
                    if busy { "Saving..." } else { "Save address" }
                }
            }
        }
    }
}
