//! Test doubles for the widget collaborators

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::app::chatbot::POPUP_ROOT_ID;
use crate::catalog::CourseDetail;
use crate::error::{ErrorKind, Result};
use crate::interface::{ChatApi, ModalView, NavView, PlaceholderId, Recorder, WidgetView};
use crate::model::dtos::{AskBotParams, VoiceQueryParams};
use crate::model::structs::{BotReply, ChatMessage, Point};

pub const POPUP_MARKUP: &str = r#"<div id="chatbot-popup"><div id="chatbot-messages"></div></div>"#;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    EnsureButton,
    AttachPopup,
    Visible(bool),
    Bubble(ChatMessage),
    Placeholder(PlaceholderId, String),
    RemovePlaceholder(PlaceholderId),
    ClearBubbles,
    ClearInput,
    VoiceNavCheckbox(bool),
    Listening(bool),
    Notify(String),
    PlayAudio(String),
    Redirect(String),
    Move(Point),
}

/// Records every call so tests can assert on what the page would show
#[derive(Default)]
pub struct RecordingView {
    pub calls: RefCell<Vec<ViewCall>>,
    pub input: RefCell<String>,
    next_placeholder: Cell<u32>,
}

impl RecordingView {
    pub fn type_input(&self, text: &str) {
        *self.input.borrow_mut() = text.to_string();
    }

    fn record(&self, call: ViewCall) {
        self.calls.borrow_mut().push(call);
    }

    /// Bubbles currently on screen, placeholders excluded
    pub fn bubbles(&self) -> Vec<ChatMessage> {
        let mut bubbles = Vec::new();
        for call in self.calls.borrow().iter() {
            match call {
                ViewCall::Bubble(message) => bubbles.push(message.clone()),
                ViewCall::ClearBubbles => bubbles.clear(),
                _ => {}
            }
        }
        bubbles
    }

    pub fn open_placeholders(&self) -> usize {
        let calls = self.calls.borrow();
        let shown = calls
            .iter()
            .filter(|c| matches!(c, ViewCall::Placeholder(..)))
            .count();
        let removed = calls
            .iter()
            .filter(|c| matches!(c, ViewCall::RemovePlaceholder(_)))
            .count();
        shown - removed
    }

    pub fn redirects(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                ViewCall::Redirect(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                ViewCall::Notify(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &ViewCall) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    pub fn last_visibility(&self) -> Option<bool> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            ViewCall::Visible(v) => Some(*v),
            _ => None,
        })
    }
}

impl WidgetView for RecordingView {
    fn ensure_button(&self) {
        self.record(ViewCall::EnsureButton);
    }

    fn attach_popup(&self, markup: &str) -> Result<()> {
        if !markup.contains(POPUP_ROOT_ID) {
            return Err(ErrorKind::PopupLoadError("no popup root".to_string()).into());
        }
        self.record(ViewCall::AttachPopup);
        Ok(())
    }

    fn set_popup_visible(&self, visible: bool) {
        self.record(ViewCall::Visible(visible));
    }

    fn append_bubble(&self, message: &ChatMessage) {
        self.record(ViewCall::Bubble(message.clone()));
    }

    fn show_placeholder(&self, text: &str) -> PlaceholderId {
        let id = PlaceholderId(self.next_placeholder.get());
        self.next_placeholder.set(id.0 + 1);
        self.record(ViewCall::Placeholder(id, text.to_string()));
        id
    }

    fn remove_placeholder(&self, id: PlaceholderId) {
        self.record(ViewCall::RemovePlaceholder(id));
    }

    fn clear_bubbles(&self) {
        self.record(ViewCall::ClearBubbles);
    }

    fn read_input(&self) -> String {
        self.input.borrow().clone()
    }

    fn clear_input(&self) {
        self.input.borrow_mut().clear();
        self.record(ViewCall::ClearInput);
    }

    fn set_voice_nav_checkbox(&self, enabled: bool) {
        self.record(ViewCall::VoiceNavCheckbox(enabled));
    }

    fn set_listening(&self, listening: bool) {
        self.record(ViewCall::Listening(listening));
    }

    fn notify(&self, text: &str) {
        self.record(ViewCall::Notify(text.to_string()));
    }

    fn play_audio(&self, url: &str) {
        self.record(ViewCall::PlayAudio(url.to_string()));
    }

    fn redirect(&self, path: &str) {
        self.record(ViewCall::Redirect(path.to_string()));
    }

    fn move_popup(&self, top_left: Point) {
        self.record(ViewCall::Move(top_left));
    }
}

pub enum Scripted {
    Reply(BotReply),
    NetworkDown,
}

/// Backend with canned answers
#[derive(Default)]
pub struct StubApi {
    /// `None` makes the markup fetch fail with 404
    pub markup: RefCell<Option<String>>,
    pub replies: RefCell<VecDeque<Scripted>>,
    pub markup_fetches: Cell<usize>,
    pub queries: RefCell<Vec<String>>,
    pub uploads: RefCell<Vec<(usize, String, String)>>,
    /// Every call yields to the runtime once before answering
    pub slow: Cell<bool>,
    /// Unscripted queries are answered with `a:{query}`
    pub echo: Cell<bool>,
}

impl StubApi {
    pub fn with_markup() -> Self {
        let api = Self::default();
        *api.markup.borrow_mut() = Some(POPUP_MARKUP.to_string());
        api
    }

    pub fn reply(&self, reply: BotReply) {
        self.replies.borrow_mut().push_back(Scripted::Reply(reply));
    }

    pub fn fail_next(&self) {
        self.replies.borrow_mut().push_back(Scripted::NetworkDown);
    }

    async fn latency(&self) {
        if self.slow.get() {
            tokio::task::yield_now().await;
        }
    }

    fn next_reply(&self) -> Result<BotReply> {
        match self.replies.borrow_mut().pop_front() {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::NetworkDown) => {
                Err(ErrorKind::HttpStatus(503, "unavailable".to_string()).into())
            }
            None => Ok(BotReply::default()),
        }
    }
}

impl ChatApi for StubApi {
    async fn fetch_popup_markup(&self) -> Result<String> {
        self.markup_fetches.set(self.markup_fetches.get() + 1);
        self.latency().await;
        self.markup
            .borrow()
            .clone()
            .ok_or_else(|| ErrorKind::HttpStatus(404, "not found".to_string()).into())
    }

    async fn ask_bot(&self, params: AskBotParams<'_>) -> Result<BotReply> {
        self.queries.borrow_mut().push(params.query.to_string());
        self.latency().await;
        if self.echo.get() && self.replies.borrow().is_empty() {
            return Ok(BotReply {
                answer: Some(format!("a:{}", params.query)),
                ..BotReply::default()
            });
        }
        self.next_reply()
    }

    async fn record_and_transcribe(&self, params: VoiceQueryParams<'_>) -> Result<BotReply> {
        self.uploads.borrow_mut().push((
            params.audio.len(),
            params.file_name.to_string(),
            params.mime_type.to_string(),
        ));
        self.latency().await;
        self.next_reply()
    }

    fn audio_url(&self, audio_file: &str) -> String {
        format!("/download_audio/{audio_file}")
    }
}

/// Microphone with scripted outcomes
#[derive(Default)]
pub struct StubRecorder {
    pub deny_access: Cell<bool>,
    pub fail_stop: Cell<bool>,
    pub audio: RefCell<Vec<u8>>,
    pub starts: Cell<usize>,
}

impl StubRecorder {
    pub fn capturing(audio: &[u8]) -> Self {
        let recorder = Self::default();
        *recorder.audio.borrow_mut() = audio.to_vec();
        recorder
    }
}

impl Recorder for StubRecorder {
    async fn start(&self) -> Result<()> {
        self.starts.set(self.starts.get() + 1);
        if self.deny_access.get() {
            return Err(ErrorKind::MicrophoneError("Permission denied".to_string()).into());
        }
        Ok(())
    }

    async fn stop(&self) -> Result<Vec<u8>> {
        if self.fail_stop.get() {
            return Err(ErrorKind::MicrophoneError("Recorder stopped unexpectedly".to_string()).into());
        }
        Ok(self.audio.borrow().clone())
    }
}

#[derive(Default)]
pub struct RecordingNavView {
    pub states: RefCell<Vec<bool>>,
}

impl NavView for RecordingNavView {
    fn set_expanded(&self, expanded: bool) {
        self.states.borrow_mut().push(expanded);
    }
}

#[derive(Default)]
pub struct RecordingModalView {
    pub filled: RefCell<Option<(String, CourseDetail)>>,
    pub visible: Cell<bool>,
    pub fills: Cell<usize>,
}

impl ModalView for RecordingModalView {
    fn fill(&self, title: &str, detail: &CourseDetail) {
        self.fills.set(self.fills.get() + 1);
        *self.filled.borrow_mut() = Some((title.to_string(), *detail));
    }

    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }
}
