//! Query switching module
//!
//! Ties the URL query codec to the engine registry: reports what a page
//! is, lists the engines it can be switched to, and builds the switched
//! search URL.

mod executor;
mod models;

pub use executor::Switcher;
pub use models::*;
