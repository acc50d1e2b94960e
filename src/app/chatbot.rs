//! Chatbot widget controller
//!
//! One [`ChatbotWidget`] owns the floating button, the lazily loaded popup and
//! the query/response cycle. Collaborators are injected: the backend
//! ([`ChatApi`]), the page ([`WidgetView`]), the microphone ([`Recorder`]) and
//! two storage namespaces (session and durable).
//!
//! Popup lifecycle:
//!
//! ```text
//!  Unloaded --click, fetch ok--> Visible <--click / close--> Hidden
//!     |
//!     +--click, fetch fails--> Unloaded
//! ```
//!
//! Nothing here returns an error to the page. Failures are logged and turned
//! into a chat bubble or a notification.

use std::cell::RefCell;
use std::rc::Rc;

use crate::app::drag::DragTracker;
use crate::app::history::ChatHistory;
use crate::app::redirect::resolve_redirect;
use crate::config::WidgetConfig;
use crate::error::{Error, Result};
use crate::interface::{ChatApi, Recorder, WidgetView};
use crate::model::dtos::{AskBotParams, VoiceQueryParams};
use crate::model::structs::{BotReply, ChatMessage, Point};
use crate::storage::{KeyValueStore, OPEN_FLAG_KEY, VOICE_NAV_KEY, read_json, write_json};

pub const POPUP_ROOT_ID: &str = "chatbot-popup";

pub const LOADING_TEXT: &str = "Typing...";
pub const TRANSCRIBING_TEXT: &str = "Transcribing...";
pub const NO_ANSWER_TEXT: &str = "Sorry, I couldn't find an answer to that.";
pub const NETWORK_ERROR_TEXT: &str = "Sorry, something went wrong. Please try again.";
pub const POPUP_LOAD_FAILED_TEXT: &str = "Could not load the chat assistant. Please try again.";
pub const NO_AUDIO_TEXT: &str = "No audio was captured.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState {
    Unloaded,
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MicState {
    Idle,
    /// Waiting for the device; further clicks are ignored
    Starting,
    Listening,
}

/// Everything the page can ask the widget to do
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    ButtonClicked,
    Close,
    OutsideClick,
    Send,
    MicToggled,
    VoiceNavChanged(bool),
    ClearHistory,
    PointerDown { pointer: Point, origin: Point },
    PointerMove(Point),
    PointerUp,
}

struct WidgetState {
    popup: PopupState,
    fetching: bool,
    mic: MicState,
    drag: DragTracker,
}

pub struct ChatbotWidget<A, V, R> {
    api: A,
    view: V,
    recorder: R,
    session: Rc<dyn KeyValueStore>,
    durable: Rc<dyn KeyValueStore>,
    config: WidgetConfig,
    // Never borrowed across an await: overlapping queries must not panic
    state: RefCell<WidgetState>,
}

impl<A: ChatApi, V: WidgetView, R: Recorder> ChatbotWidget<A, V, R> {
    pub fn new(
        api: A,
        view: V,
        recorder: R,
        session: Rc<dyn KeyValueStore>,
        durable: Rc<dyn KeyValueStore>,
        config: WidgetConfig,
    ) -> Self {
        Self {
            api,
            view,
            recorder,
            session,
            durable,
            config,
            state: RefCell::new(WidgetState {
                popup: PopupState::Unloaded,
                fetching: false,
                mic: MicState::Idle,
                drag: DragTracker::default(),
            }),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn popup_state(&self) -> PopupState {
        self.state.borrow().popup
    }

    pub fn is_listening(&self) -> bool {
        self.state.borrow().mic == MicState::Listening
    }

    /// Page load: make sure the button exists and bring the popup back if it was open
    pub async fn mount(&self) {
        self.view.ensure_button();

        let was_open = read_json::<bool>(&*self.session, OPEN_FLAG_KEY).unwrap_or(false);
        if self.config.restore_open_state && was_open {
            log::debug!("Popup was open before this page load, reopening");
            if self.load_popup().await {
                self.show();
            }
        }
    }

    pub async fn handle(&self, event: UiEvent) {
        match event {
            UiEvent::ButtonClicked => self.toggle_popup().await,
            UiEvent::Close | UiEvent::OutsideClick => self.close(),
            UiEvent::Send => self.send_text_query().await,
            UiEvent::MicToggled => self.toggle_recording().await,
            UiEvent::VoiceNavChanged(enabled) => self.set_voice_navigation(enabled),
            UiEvent::ClearHistory => self.clear_history(),
            UiEvent::PointerDown { pointer, origin } => self.pointer_down(pointer, origin),
            UiEvent::PointerMove(pointer) => self.pointer_move(pointer),
            UiEvent::PointerUp => self.pointer_up(),
        }
    }

    pub async fn toggle_popup(&self) {
        let popup = self.popup_state();
        match popup {
            PopupState::Unloaded => {
                if self.load_popup().await {
                    self.show();
                }
            }
            PopupState::Hidden => self.show(),
            PopupState::Visible => self.close(),
        }
    }

    /// Fetch and attach the popup; `true` once it is on the page
    async fn load_popup(&self) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if state.popup != PopupState::Unloaded {
                return true;
            }
            if state.fetching {
                log::debug!("Popup fetch already in flight");
                return false;
            }
            state.fetching = true;
        }

        let result = self.fetch_and_attach().await;

        {
            let mut state = self.state.borrow_mut();
            state.fetching = false;
            if result.is_ok() {
                state.popup = PopupState::Hidden;
            }
        }

        if let Err(e) = result {
            log::error!("Failed to load chatbot popup: {e:?}");
            self.view.notify(POPUP_LOAD_FAILED_TEXT);
            return false;
        }

        self.view
            .set_voice_nav_checkbox(self.voice_navigation_enabled());

        if self.config.persist_history {
            let history = ChatHistory::load(&*self.session);
            log::debug!("Restoring {} chat messages", history.len());
            for message in &history {
                self.view.append_bubble(message);
            }
        }

        true
    }

    /// The view rejects markup without a `#chatbot-popup` root
    async fn fetch_and_attach(&self) -> Result<()> {
        let markup = self.api.fetch_popup_markup().await?;
        self.view.attach_popup(&markup)
    }

    fn show(&self) {
        self.view.set_popup_visible(true);
        self.state.borrow_mut().popup = PopupState::Visible;
        self.persist_open_flag(true);
    }

    /// Hide the popup; a no-op unless it is visible
    pub fn close(&self) {
        if self.popup_state() != PopupState::Visible {
            return;
        }
        self.view.set_popup_visible(false);
        self.state.borrow_mut().popup = PopupState::Hidden;
        self.persist_open_flag(false);
    }

    fn persist_open_flag(&self, open: bool) {
        if let Err(e) = write_json(&*self.session, OPEN_FLAG_KEY, &open) {
            log::warn!("Failed to store popup state: {e}");
        }
    }

    pub async fn send_text_query(&self) {
        let query = self.view.read_input().trim().to_string();
        if query.is_empty() {
            return;
        }

        self.view.clear_input();
        self.append_message(ChatMessage::user(query.as_str()));
        let placeholder = self.view.show_placeholder(LOADING_TEXT);

        match self.api.ask_bot(AskBotParams { query: &query }).await {
            Ok(reply) => {
                self.view.remove_placeholder(placeholder);
                self.render_reply(&reply, &query);
            }
            Err(e) => {
                log::error!("Query failed: {e:?}");
                self.view.remove_placeholder(placeholder);
                self.append_message(ChatMessage::bot(NETWORK_ERROR_TEXT));
            }
        }
    }

    /// First call starts capturing, second stops and uploads
    pub async fn toggle_recording(&self) {
        let mic = self.state.borrow().mic;
        match mic {
            MicState::Starting => log::debug!("Microphone still starting, ignoring click"),
            MicState::Idle => self.start_recording().await,
            MicState::Listening => self.finish_recording().await,
        }
    }

    async fn start_recording(&self) {
        self.state.borrow_mut().mic = MicState::Starting;

        match self.recorder.start().await {
            Ok(()) => {
                self.state.borrow_mut().mic = MicState::Listening;
                self.view.set_listening(true);
            }
            Err(e) => self.microphone_failed(&e),
        }
    }

    async fn finish_recording(&self) {
        self.state.borrow_mut().mic = MicState::Idle;
        self.view.set_listening(false);

        let audio = match self.recorder.stop().await {
            Ok(audio) => audio,
            Err(e) => {
                self.microphone_failed(&e);
                return;
            }
        };

        if audio.is_empty() {
            self.view.notify(NO_AUDIO_TEXT);
            return;
        }

        let placeholder = self.view.show_placeholder(TRANSCRIBING_TEXT);

        match self
            .api
            .record_and_transcribe(VoiceQueryParams::wav(&audio))
            .await
        {
            Ok(reply) => {
                self.view.remove_placeholder(placeholder);
                let transcript = reply.transcript().unwrap_or_default().to_string();
                if !transcript.is_empty() {
                    self.append_message(ChatMessage::user(transcript.as_str()));
                }
                self.render_reply(&reply, &transcript);
            }
            Err(e) => {
                log::error!("Voice query failed: {e:?}");
                self.view.remove_placeholder(placeholder);
                self.append_message(ChatMessage::bot(NETWORK_ERROR_TEXT));
            }
        }
    }

    fn microphone_failed(&self, e: &Error) {
        log::error!("Microphone capture failed: {e:?}");
        self.state.borrow_mut().mic = MicState::Idle;
        self.view.set_listening(false);
        self.append_message(ChatMessage::bot(format!("Microphone error: {e}")));
        self.view.notify(&format!("Microphone unavailable: {e}"));
    }

    /// One bot bubble, then optional audio and redirect
    fn render_reply(&self, reply: &BotReply, query: &str) {
        let text = match (reply.answer(), reply.error()) {
            (Some(answer), _) => answer.to_string(),
            (None, Some(error)) => format!("Error: {error}"),
            (None, None) => NO_ANSWER_TEXT.to_string(),
        };
        self.append_message(ChatMessage::bot(text));

        if let Some(audio_file) = reply.audio_file() {
            self.view.play_audio(&self.api.audio_url(audio_file));
        }

        let redirect = resolve_redirect(reply.redirect(), query, self.voice_navigation_enabled());
        if let Some(path) = redirect {
            log::info!("Voice navigation to {path}");
            self.view.redirect(&path);
        }
    }

    fn append_message(&self, message: ChatMessage) {
        self.view.append_bubble(&message);
        if self.config.persist_history {
            if let Err(e) = ChatHistory::push(&*self.session, &message) {
                log::warn!("Failed to store chat message: {e}");
            }
        }
    }

    pub fn clear_history(&self) {
        ChatHistory::clear(&*self.session);
        self.view.clear_bubbles();
    }

    pub fn voice_navigation_enabled(&self) -> bool {
        read_json(&*self.durable, VOICE_NAV_KEY).unwrap_or(self.config.voice_nav_default)
    }

    pub fn set_voice_navigation(&self, enabled: bool) {
        match write_json(&*self.durable, VOICE_NAV_KEY, &enabled) {
            Ok(()) => log::debug!("Voice navigation {}", if enabled { "on" } else { "off" }),
            Err(e) => log::warn!("Failed to store voice navigation preference: {e}"),
        }
    }

    pub fn pointer_down(&self, pointer: Point, origin: Point) {
        if self.config.draggable {
            self.state.borrow_mut().drag.begin(pointer, origin);
        }
    }

    pub fn pointer_move(&self, pointer: Point) {
        let target = self.state.borrow().drag.update(pointer);
        if let Some(top_left) = target {
            self.view.move_popup(top_left);
        }
    }

    pub fn pointer_up(&self) {
        self.state.borrow_mut().drag.end();
    }
}
