//! Platform abstraction layer
//!
//! Browser bindings for the pieces the page owns:
//! - Signed-in user (auth lives in page script)
//! - Score sink (the page's database client)
//! - Storage (LocalStorage on web)
//!
//! Native builds have none of these; they use the fallbacks in `report` and
//! the default settings.

#[cfg(target_arch = "wasm32")]
pub mod web;
