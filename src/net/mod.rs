//! State synchronisation with the authoritative game server
//!
//! Every operation is a single HTTP round trip that yields either a fresh
//! snapshot or a [`SyncError`]. Request shapes and reply decoding are pure
//! and live in `api`; the browser transport lives in `fetch`.

pub mod api;
pub mod error;
#[cfg(target_arch = "wasm32")]
pub mod fetch;

pub use api::{ApiCall, Method, decode_reply};
pub use error::SyncError;
#[cfg(target_arch = "wasm32")]
pub use fetch::StateSync;
