//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

pub mod components;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod config;
pub use config::load_config;

mod storage;
pub use storage::make_state_store;

mod session;
pub use session::{
    api_client, commit, refresh_customer, use_config, use_session, SessionProvider, SessionState,
};

pub mod challenge;
pub mod geolocation;

mod cookie_import;
pub use cookie_import::{import_cookie_session, EmbeddedSessionImport};

mod login_dialog;
pub use login_dialog::LoginDialog;

mod signup_dialog;
pub use signup_dialog::SignupDialog;

pub mod location;
pub use location::LocationDialog;

mod restaurant_grid;
pub use restaurant_grid::{use_catalog, RestaurantGrid};

mod navbar;
pub use navbar::Navbar;

pub mod views;

pub const STOREFRONT_CSS: Asset = asset!("/assets/storefront.css");
