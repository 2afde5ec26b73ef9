pub mod address;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geocode;
pub mod legacy;
pub mod models;
pub mod state;

mod memory;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod idb;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use idb::IdbStore;

pub use address::{AddressForm, MapLocation, UpdateAddressPayload};
pub use catalog::{CatalogEntry, CatalogFilter, Listing};
pub use config::{AddressFailurePolicy, StorefrontConfig, UnknownPhonePolicy};
pub use error::StoreError;
pub use geocode::GeocodeResult;
pub use models::{Area, Customer, CustomerAddress, LatLng, Order, OrderStatus, Restaurant, Session};
pub use state::{ClientState, KeyValueStore, StateStore};
