//! Storefront backend: catalog, cart, checkout and admin management exposed
//! as a REST API, plus the typed client used to mirror server state.

pub mod client;
pub mod core;
pub mod features;
pub mod shared;
pub mod storage;
