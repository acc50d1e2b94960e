//! Client module - talks to the chatbot backend from both WASM and no-WASM builds
//!
//! `request` uses reqwest for native builds, `gloo` uses gloo_net (the browser's
//! fetch API) for WASM builds. Both implement [`crate::interface::ChatApi`].

#[cfg(feature = "no-wasm")]
pub mod request;

#[cfg(feature = "wasm")]
pub mod gloo;
