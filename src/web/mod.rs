//! Web server module
//!
//! Local HTTP API a thin browser extension calls to detect search pages,
//! switch queries and manage engines.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
