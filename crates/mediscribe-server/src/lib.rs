//! HTTP surface for the visit assistant.
//!
//! Handlers hold no global state: every remote handle is injected through
//! [`AppState`], so concurrent sessions cannot share hidden mutables.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod types;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
