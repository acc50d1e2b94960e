//! Application module - the page behaviours
//!
//! The three controllers (navigation toggle, course modal, chatbot widget) are
//! platform independent and talk to the page through the traits in
//! [`crate::interface`]. Platform-specific front ends live next to them:
//! DOM bindings for WASM and a terminal renderer for no-WASM.

pub mod chatbot;
pub mod course_modal;
pub mod drag;
pub mod history;
pub mod nav_toggle;
pub mod redirect;

// Platform-specific modules
#[cfg(feature = "no-wasm")]
pub mod terminal;

#[cfg(feature = "wasm")]
pub mod gloo;

pub use chatbot::{ChatbotWidget, PopupState, UiEvent};
pub use course_modal::{CourseModal, ModalEvent};
pub use nav_toggle::NavToggle;
