//! Platform abstraction layer
//!
//! Browser-only code that applies rendered output to the page. Everything
//! it draws comes from the pure `renderer` module.

#[cfg(target_arch = "wasm32")]
pub mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::DomTargets;
