use dioxus::prelude::*;
use store::{LatLng, MapLocation};

use crate::components::{Button, ButtonVariant, Input, Label};

const OSM_EMBED_URL: &str = "https://www.openstreetmap.org/export/embed.html";

/// OpenStreetMap embed URL centred on `center`, optionally with a marker.
pub fn embed_url(center: LatLng, marker: Option<LatLng>, zoom: u8) -> String {
    let lng_span = 360.0 / 2f64.powi(i32::from(zoom.min(19)));
    let lat_span = lng_span / 2.0;
    let mut url = format!(
        "{OSM_EMBED_URL}?bbox={:.6},{:.6},{:.6},{:.6}&layer=mapnik",
        center.lng - lng_span / 2.0,
        center.lat - lat_span / 2.0,
        center.lng + lng_span / 2.0,
        center.lat + lat_span / 2.0,
    );
    if let Some(marker) = marker {
        url.push_str(&format!("&marker={:.6},{:.6}", marker.lat, marker.lng));
    }
    url
}

/// Map preview with coordinate fields. `on_pick` receives the chosen point.
///
/// The fields start at the marker (or `center`); key the picker on both to
/// reset them when the form moves.
#[component]
pub fn MapPicker(
    center: LatLng,
    location: Option<MapLocation>,
    zoom: u8,
    #[props(default)] disabled: bool,
    on_pick: EventHandler<LatLng>,
) -> Element {
    let marker = location.as_ref().map(|l| LatLng::new(l.lat, l.lng));
    let start = marker.unwrap_or(center);
    let mut lat = use_signal(|| format!("{:.6}", start.lat));
    let mut lng = use_signal(|| format!("{:.6}", start.lng));

    let parsed = match (lat().trim().parse::<f64>(), lng().trim().parse::<f64>()) {
        (Ok(la), Ok(ln)) if (-90.0..=90.0).contains(&la) && (-180.0..=180.0).contains(&ln) => {
            Some(LatLng::new(la, ln))
        }
        _ => None,
    };
    let src = embed_url(parsed.unwrap_or(center), marker, zoom);

    rsx! {
        div {
            class: "flex flex-col gap-3",
            iframe {
                class: "map-frame",
                src: "{src}",
                title: "Map",
            }
            if let Some(location) = &location {
                if !location.address.is_empty() {
                    p { class: "m-0 text-xs text-neutral-500", "{location.address}" }
                }
            }
            div {
                class: "grid grid-cols-2 gap-2",
                div {
                    Label { html_for: "map-lat", "Latitude" }
                    Input {
                        id: "map-lat",
                        class: "w-full mt-1",
                        inputmode: "decimal",
                        value: lat(),
                        disabled,
                        oninput: move |evt: FormEvent| lat.set(evt.value()),
                    }
                }
                div {
                    Label { html_for: "map-lng", "Longitude" }
                    Input {
                        id: "map-lng",
                        class: "w-full mt-1",
                        inputmode: "decimal",
                        value: lng(),
                        disabled,
                        oninput: move |evt: FormEvent| lng.set(evt.value()),
                    }
                }
            }
            Button {
                variant: ButtonVariant::Outline,
                disabled: disabled || parsed.is_none(),
                onclick: move |_| {
                    if let Some(point) = parsed {
                        on_pick.call(point);
                    }
                },
                "Pin this location"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_url_centres_bbox() {
        let url = embed_url(LatLng::new(23.0, 72.5), None, 8);
        // 360 / 2^8 = 1.40625 degrees of longitude
        assert!(url.starts_with(OSM_EMBED_URL));
        assert!(url.contains("bbox=71.796875,"));
        assert!(url.contains(",73.203125,"));
        assert!(!url.contains("marker"));
    }

    #[test]
    fn test_embed_url_marker() {
        let url = embed_url(LatLng::new(23.0, 72.5), Some(LatLng::new(23.1, 72.6)), 15);
        assert!(url.ends_with("&marker=23.100000,72.600000"));
    }
}
