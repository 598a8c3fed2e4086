//! Search engine module
//!
//! Defines engine types, the built-in engine table and the ordered
//! registry merging built-in and custom engines.

mod builtin;
mod loader;
mod registry;
mod types;

pub use builtin::{builtin_definitions, builtin_engines, is_builtin};
pub use loader::EngineLoader;
pub use registry::EngineRegistry;
pub use types::*;
