pub mod app;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod interface;
pub mod model;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(feature = "no-wasm")]
pub use client::request::NoWasmClient;
#[cfg(feature = "wasm")]
pub use client::gloo::WasmClient;
#[cfg(feature = "no-wasm")]
pub use tokio;
