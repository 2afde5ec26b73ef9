//! Browser geolocation through `navigator.geolocation`.
//!
//! Inside the native shell the same call is routed to the host by the
//! bridge's setup script.

use dioxus::prelude::*;
use serde::Deserialize;
use store::LatLng;

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum PositionReply {
    Fix { latitude: f64, longitude: f64 },
    Error { message: String },
}

pub async fn current_position() -> Result<LatLng, String> {
    let mut eval = document::eval(
        r#"(function() {
            if (!navigator.geolocation) {
                dioxus.send({ kind: 'error', message: 'Geolocation is not supported by this browser.' });
                return;
            }
            navigator.geolocation.getCurrentPosition(
                function(position) {
                    dioxus.send({
                        kind: 'fix',
                        latitude: position.coords.latitude,
                        longitude: position.coords.longitude
                    });
                },
                function(error) {
                    dioxus.send({ kind: 'error', message: error.message || 'Unable to get your location.' });
                }
            );
        })();"#,
    );
    match eval.recv::<PositionReply>().await {
        Ok(PositionReply::Fix {
            latitude,
            longitude,
        }) => Ok(LatLng::new(latitude, longitude)),
        Ok(PositionReply::Error { message }) => {
            tracing::warn!("Geolocation failed: {message}");
            Err(message)
        }
        Err(e) => Err(format!("Unable to get your location: {e:?}")),
    }
}
