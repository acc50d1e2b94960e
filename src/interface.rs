#![allow(async_fn_in_trait)] // 允许在内部 trait 中使用 async fn

use crate::catalog::CourseDetail;
use crate::config::Endpoints;
use crate::error::Result;
use crate::model::dtos::{AskBotParams, VoiceQueryParams};
use crate::model::structs::{BotReply, ChatMessage, Point};

/// Common trait for HTTP client functionality
pub trait HttpClient {
    /// Create a new HTTP client instance
    async fn new(endpoints: Endpoints) -> Result<Self>
    where
        Self: Sized;
}

/// Backend calls made by the chatbot widget
pub trait ChatApi {
    /// Fetch the popup HTML fragment
    async fn fetch_popup_markup(&self) -> Result<String>;

    /// Send a text query
    async fn ask_bot(&self, params: AskBotParams<'_>) -> Result<BotReply>;

    /// Upload recorded audio for transcription and answering
    async fn record_and_transcribe(&self, params: VoiceQueryParams<'_>) -> Result<BotReply>;

    /// Where the audio named in a reply can be fetched from
    fn audio_url(&self, audio_file: &str) -> String;
}

/// Microphone capture
pub trait Recorder {
    /// Ask for device access and begin capturing
    async fn start(&self) -> Result<()>;

    /// Stop capturing and return everything recorded as one blob
    async fn stop(&self) -> Result<Vec<u8>>;
}

/// Handle to a transient bubble ("Typing...", "Transcribing...")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaceholderId(pub u32);

/// The chatbot's slice of the page
pub trait WidgetView {
    /// Create the floating button and its style if they are not there yet
    fn ensure_button(&self);

    /// Insert the popup markup, attach its stylesheet once and wire its controls
    fn attach_popup(&self, markup: &str) -> Result<()>;

    fn set_popup_visible(&self, visible: bool);

    fn append_bubble(&self, message: &ChatMessage);

    fn show_placeholder(&self, text: &str) -> PlaceholderId;

    fn remove_placeholder(&self, id: PlaceholderId);

    fn clear_bubbles(&self);

    fn read_input(&self) -> String;

    fn clear_input(&self);

    fn set_voice_nav_checkbox(&self, enabled: bool);

    fn set_listening(&self, listening: bool);

    /// Short-lived toast
    fn notify(&self, text: &str);

    fn play_audio(&self, url: &str);

    fn redirect(&self, path: &str);

    fn move_popup(&self, top_left: Point);
}

pub trait NavView {
    /// Reflect the menu state in `aria-expanded` and the menu's `active` class
    fn set_expanded(&self, expanded: bool);
}

pub trait ModalView {
    fn fill(&self, title: &str, detail: &CourseDetail);

    fn set_visible(&self, visible: bool);
}
