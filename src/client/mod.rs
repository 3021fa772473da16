//! Typed client for the storefront API.
//!
//! Mirrors server state on the client side: a session service holding the
//! authenticated user and bearer token, and a cart service that refetches
//! the server's cart after every mutation. Both are explicit handles with
//! a lifecycle (created at session start, cleared at logout) rather than
//! process-wide globals.

pub mod api;
pub mod cart;
pub mod session;

pub use api::{ApiClient, ClientError};
pub use cart::CartStore;
pub use session::SessionStore;
