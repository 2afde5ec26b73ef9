//! # Shell crate: the native host around the storefront page
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`message`] | [`WebMessage`], posted by the page to the host |
//! | [`script`] | Scripts the host evaluates in the page |
//! | [`bridge`] | [`NativeBridge`]: permission tracking, location relay, back handling |
//! | [`push`] | [`PushPairing`]: one-shot push-token registration |
//! | [`navigation`] | Hardware back decision |

pub mod bridge;
pub mod error;
pub mod message;
pub mod navigation;
pub mod push;
pub mod script;

pub use bridge::{LocationService, NativeBridge, PermissionStatus, ScriptSink};
pub use error::BridgeError;
pub use message::{LocationFix, WebMessage};
pub use navigation::BackAction;
pub use push::{PushPairing, PushService, PushTokenSink};
