//! Context menu and keyboard command model
//!
//! Builds the context menu offered on search pages and maps menu item
//! ids, command names and key presses back to engine switches.

mod menu;
mod shortcuts;

pub use menu::*;
pub use shortcuts::*;
