//! HTTP surface of the wavswap audio converter.
//!
//! Exposed as a library so integration tests can build the router
//! without binding a socket.

pub mod api;
pub mod metrics;
pub mod state;

pub use api::create_router;
pub use state::AppState;
