//! WASM front end
//!
//! Binds the three controllers to the live page with web_sys. DOM callbacks
//! never call into a controller directly; they emit a [`UiEvent`] (or
//! [`ModalEvent`]) and the controller runs it on the browser's event loop via
//! `spawn_local`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::oneshot;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Blob, BlobEvent, BlobPropertyBag, Document, Element, Event, EventTarget, HtmlAudioElement,
    HtmlElement, HtmlInputElement, KeyboardEvent, MediaRecorder, MediaStream,
    MediaStreamConstraints, MediaStreamTrack, MouseEvent, Node,
};

use crate::app::chatbot::{ChatbotWidget, POPUP_ROOT_ID, UiEvent};
use crate::app::course_modal::{CourseModal, ModalEvent};
use crate::app::nav_toggle::NavToggle;
use crate::catalog::CourseDetail;
use crate::client::gloo::WasmClient;
use crate::config::WidgetConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::interface::{HttpClient, ModalView, NavView, PlaceholderId, Recorder, WidgetView};
use crate::model::structs::{ChatMessage, Point, Sender};
use crate::storage::{self, WebStorage};

const BUTTON_ID: &str = "chatbot-button";
const BUTTON_STYLE_ID: &str = "chatbot-button-style";
const STYLESHEET_ID: &str = "chatbot-popup-css";
const STYLESHEET_HREF: &str = "/css/chatbot.css";
const CONFIG_SCRIPT_ID: &str = "chatbot-config";
const TOAST_MS: i32 = 3000;

const BUTTON_CSS: &str = "\
#chatbot-button{position:fixed;bottom:24px;right:24px;width:60px;height:60px;border-radius:50%;\
border:none;background:#1e3a8a;color:#fff;font-size:28px;cursor:pointer;z-index:9999;\
box-shadow:0 4px 12px rgba(0,0,0,.25)}\
#chatbot-popup{position:fixed;resize:both;overflow:auto;z-index:9998}\
.chatbot-toast{position:fixed;bottom:96px;right:24px;padding:8px 14px;border-radius:6px;\
background:#333;color:#fff;z-index:10000}\
#chatbot-mic.listening{background:#dc2626;color:#fff}";

type PageWidget = ChatbotWidget<WasmClient, DomWidgetView, MediaRecorderCapture>;

thread_local! {
    static CHATBOT: RefCell<Option<Rc<PageWidget>>> = const { RefCell::new(None) };
}

// ── Logging ──

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!(
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        ));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            log::Level::Info => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn init_logging() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
}

// ── Helpers ──

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

fn js_message(e: &JsValue) -> String {
    js_sys::Reflect::get(e, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{e:?}"))
}

fn mic_error(e: JsValue) -> Error {
    ErrorKind::MicrophoneError(js_message(&e)).into()
}

/// Attach a listener that lives as long as the page
fn listen_forever(target: &EventTarget, kind: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if let Err(e) = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
    {
        log::warn!("Failed to listen for {kind}: {}", js_message(&e));
    }
    closure.forget();
}

fn pointer_of(event: &Event) -> Option<Point> {
    event
        .dyn_ref::<MouseEvent>()
        .map(|m| Point::new(f64::from(m.client_x()), f64::from(m.client_y())))
}

// ── Chatbot view ──

type EventSink = Rc<dyn Fn(UiEvent)>;

pub struct DomWidgetView {
    document: Document,
    sink: RefCell<Option<EventSink>>,
    popup: RefCell<Option<HtmlElement>>,
    button_bound: Cell<bool>,
    next_placeholder: Cell<u32>,
}

impl DomWidgetView {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            sink: RefCell::new(None),
            popup: RefCell::new(None),
            button_bound: Cell::new(false),
            next_placeholder: Cell::new(0),
        }
    }

    /// Where DOM callbacks send their events
    pub fn set_event_sink(&self, sink: EventSink) {
        *self.sink.borrow_mut() = Some(sink);
    }

    fn emitter(&self) -> impl Fn(UiEvent) + 'static {
        let sink = self.sink.borrow().clone();
        move |event| match &sink {
            Some(sink) => sink(event),
            None => log::warn!("Dropping {event:?}: widget not connected"),
        }
    }

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn input(&self) -> Option<HtmlInputElement> {
        self.by_id("chatbot-input")?.dyn_into().ok()
    }

    fn messages(&self) -> Option<Element> {
        self.by_id("chatbot-messages")
    }

    fn try_ensure_button(&self) -> Result<()> {
        if self.by_id(BUTTON_STYLE_ID).is_none() {
            let style = self.document.create_element("style")?;
            style.set_id(BUTTON_STYLE_ID);
            style.set_text_content(Some(BUTTON_CSS));
            if let Some(head) = self.document.head() {
                head.append_child(&style)?;
            }
        }

        let button = match self.by_id(BUTTON_ID) {
            Some(button) => button,
            None => {
                let button = self.document.create_element("button")?;
                button.set_id(BUTTON_ID);
                button.set_attribute("aria-label", "Open chat assistant")?;
                button.set_text_content(Some("💬"));
                let body = self
                    .document
                    .body()
                    .ok_or_else(|| ErrorKind::JsError("document has no body".to_string()))?;
                body.append_child(&button)?;
                button
            }
        };

        if !self.button_bound.replace(true) {
            let emit = self.emitter();
            listen_forever(&button, "click", move |event: Event| {
                event.stop_propagation();
                emit(UiEvent::ButtonClicked);
            });
        }
        Ok(())
    }

    fn attach_stylesheet_once(&self) -> Result<()> {
        if self.by_id(STYLESHEET_ID).is_some() {
            return Ok(());
        }
        let link = self.document.create_element("link")?;
        link.set_id(STYLESHEET_ID);
        link.set_attribute("rel", "stylesheet")?;
        link.set_attribute("href", STYLESHEET_HREF)?;
        if let Some(head) = self.document.head() {
            head.append_child(&link)?;
        }
        Ok(())
    }

    fn on_click(&self, id: &str, event: UiEvent) {
        if let Some(element) = self.by_id(id) {
            let emit = self.emitter();
            listen_forever(&element, "click", move |_| emit(event.clone()));
        }
    }

    fn wire_controls(&self, popup: &HtmlElement) {
        self.on_click("chatbot-close", UiEvent::Close);
        self.on_click("chatbot-send", UiEvent::Send);
        self.on_click("chatbot-mic", UiEvent::MicToggled);
        self.on_click("chatbot-clear", UiEvent::ClearHistory);

        if let Some(input) = self.input() {
            let emit = self.emitter();
            listen_forever(&input, "keydown", move |event: Event| {
                let enter = event
                    .dyn_ref::<KeyboardEvent>()
                    .is_some_and(|k| k.key() == "Enter");
                if enter {
                    event.prevent_default();
                    emit(UiEvent::Send);
                }
            });
        }

        if let Some(toggle) = self.by_id("voice-nav-toggle") {
            let emit = self.emitter();
            listen_forever(&toggle, "change", move |event: Event| {
                let checked = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some_and(|input| input.checked());
                emit(UiEvent::VoiceNavChanged(checked));
            });
        }

        // Drag from the header, or the whole popup when there is none
        let handle: Element = self
            .by_id("chatbot-header")
            .unwrap_or_else(|| popup.clone().into());
        {
            let emit = self.emitter();
            let popup = popup.clone();
            listen_forever(&handle, "mousedown", move |event: Event| {
                if let Some(pointer) = pointer_of(&event) {
                    let origin = Point::new(
                        f64::from(popup.offset_left()),
                        f64::from(popup.offset_top()),
                    );
                    emit(UiEvent::PointerDown { pointer, origin });
                }
            });
        }
        {
            let emit = self.emitter();
            listen_forever(&self.document, "mousemove", move |event: Event| {
                if let Some(pointer) = pointer_of(&event) {
                    emit(UiEvent::PointerMove(pointer));
                }
            });
        }
        {
            let emit = self.emitter();
            listen_forever(&self.document, "mouseup", move |_| emit(UiEvent::PointerUp));
        }

        // Clicks that land outside both the popup and the button close it
        {
            let emit = self.emitter();
            let popup: Node = popup.clone().into();
            let document = self.document.clone();
            listen_forever(&self.document, "click", move |event: Event| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Node>().ok()) else {
                    return;
                };
                let on_button = document
                    .get_element_by_id(BUTTON_ID)
                    .is_some_and(|b| b.contains(Some(&target)));
                if !popup.contains(Some(&target)) && !on_button {
                    emit(UiEvent::OutsideClick);
                }
            });
        }
    }

    fn style(&self, property: &str, value: &str) {
        if let Some(popup) = self.popup.borrow().as_ref() {
            if let Err(e) = popup.style().set_property(property, value) {
                log::warn!("Failed to set {property}: {}", js_message(&e));
            }
        }
    }
}

impl WidgetView for DomWidgetView {
    fn ensure_button(&self) {
        if let Err(e) = self.try_ensure_button() {
            log::error!("Failed to create chat button: {e}");
        }
    }

    fn attach_popup(&self, markup: &str) -> Result<()> {
        let container = self.document.create_element("div")?;
        container.set_inner_html(markup);

        let popup: HtmlElement = container
            .query_selector(&format!("#{POPUP_ROOT_ID}"))?
            .ok_or_else(|| ErrorKind::PopupLoadError(format!("no #{POPUP_ROOT_ID} in markup")))?
            .dyn_into()
            .map_err(|_| ErrorKind::PopupLoadError("popup root is not an HTML element".into()))?;

        popup.style().set_property("display", "none")?;
        let body = self
            .document
            .body()
            .ok_or_else(|| ErrorKind::JsError("document has no body".to_string()))?;
        body.append_child(&popup)?;
        self.attach_stylesheet_once()?;

        *self.popup.borrow_mut() = Some(popup.clone());
        self.wire_controls(&popup);
        Ok(())
    }

    fn set_popup_visible(&self, visible: bool) {
        self.style("display", if visible { "flex" } else { "none" });
    }

    fn append_bubble(&self, message: &ChatMessage) {
        let Some(messages) = self.messages() else {
            return;
        };
        let Ok(bubble) = self.document.create_element("div") else {
            return;
        };
        let class = match message.sender {
            Sender::User => "message user-message",
            Sender::Bot => "message bot-message",
        };
        bubble.set_class_name(class);
        bubble.set_text_content(Some(&message.text));
        if messages.append_child(&bubble).is_ok() {
            messages.set_scroll_top(messages.scroll_height());
        }
    }

    fn show_placeholder(&self, text: &str) -> PlaceholderId {
        let id = PlaceholderId(self.next_placeholder.get());
        self.next_placeholder.set(id.0 + 1);

        if let (Some(messages), Ok(bubble)) =
            (self.messages(), self.document.create_element("div"))
        {
            bubble.set_class_name("message bot-message loading");
            bubble.set_text_content(Some(text));
            let _ = bubble.set_attribute("data-placeholder", &id.0.to_string());
            if messages.append_child(&bubble).is_ok() {
                messages.set_scroll_top(messages.scroll_height());
            }
        }
        id
    }

    fn remove_placeholder(&self, id: PlaceholderId) {
        let selector = format!("[data-placeholder=\"{}\"]", id.0);
        if let Ok(Some(bubble)) = self.document.query_selector(&selector) {
            bubble.remove();
        }
    }

    fn clear_bubbles(&self) {
        if let Some(messages) = self.messages() {
            messages.set_inner_html("");
        }
    }

    fn read_input(&self) -> String {
        self.input().map(|i| i.value()).unwrap_or_default()
    }

    fn clear_input(&self) {
        if let Some(input) = self.input() {
            input.set_value("");
        }
    }

    fn set_voice_nav_checkbox(&self, enabled: bool) {
        if let Some(toggle) = self
            .by_id("voice-nav-toggle")
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        {
            toggle.set_checked(enabled);
        }
    }

    fn set_listening(&self, listening: bool) {
        if let Some(mic) = self.by_id("chatbot-mic") {
            let _ = mic.class_list().toggle_with_force("listening", listening);
        }
        if let Some(indicator) = self
            .by_id("chatbot-listening")
            .and_then(|i| i.dyn_into::<HtmlElement>().ok())
        {
            let display = if listening { "block" } else { "none" };
            let _ = indicator.style().set_property("display", display);
        }
    }

    fn notify(&self, text: &str) {
        let (Some(window), Some(body)) = (web_sys::window(), self.document.body()) else {
            return;
        };
        let Ok(toast) = self.document.create_element("div") else {
            return;
        };
        toast.set_class_name("chatbot-toast");
        toast.set_text_content(Some(text));
        if body.append_child(&toast).is_err() {
            return;
        }

        let dismiss = Closure::once_into_js(move || toast.remove());
        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            dismiss.unchecked_ref(),
            TOAST_MS,
        ) {
            log::warn!("Failed to schedule toast removal: {}", js_message(&e));
        }
    }

    fn play_audio(&self, url: &str) {
        match HtmlAudioElement::new_with_src(url) {
            Ok(audio) => {
                if let Err(e) = audio.play() {
                    log::warn!("Audio playback refused: {}", js_message(&e));
                }
            }
            Err(e) => log::warn!("Failed to create audio element: {}", js_message(&e)),
        }
    }

    fn redirect(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(path) {
                log::error!("Navigation to {path} failed: {}", js_message(&e));
            }
        }
    }

    fn move_popup(&self, top_left: Point) {
        self.style("left", &format!("{}px", top_left.x));
        self.style("top", &format!("{}px", top_left.y));
        self.style("right", "auto");
        self.style("bottom", "auto");
    }
}

// ── Microphone ──

/// Stops every track when dropped, which releases the microphone
struct StreamGuard(MediaStream);

impl Drop for StreamGuard {
    fn drop(&mut self) {
        for track in self.0.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
    }
}

struct Capture {
    recorder: MediaRecorder,
    _stream: StreamGuard,
    chunks: Rc<RefCell<Vec<Blob>>>,
    _on_data: Closure<dyn FnMut(BlobEvent)>,
}

/// Microphone capture through `getUserMedia` and `MediaRecorder`
#[derive(Default)]
pub struct MediaRecorderCapture {
    capture: RefCell<Option<Capture>>,
}

impl Recorder for MediaRecorderCapture {
    async fn start(&self) -> Result<()> {
        let window = web_sys::window()
            .ok_or_else(|| ErrorKind::MicrophoneError("No window".to_string()))?;
        let devices = window.navigator().media_devices().map_err(|_| {
            ErrorKind::MicrophoneError("Microphone is not supported in this browser".to_string())
        })?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::TRUE);
        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(mic_error)?;
        let stream = StreamGuard(
            JsFuture::from(promise)
                .await
                .map_err(mic_error)?
                .dyn_into()
                .map_err(mic_error)?,
        );

        let recorder = MediaRecorder::new_with_media_stream(&stream.0).map_err(mic_error)?;
        let chunks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&chunks);
        let on_data = Closure::<dyn FnMut(BlobEvent)>::new(move |event: BlobEvent| {
            if let Some(blob) = event.data() {
                sink.borrow_mut().push(blob);
            }
        });
        recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
        recorder.start().map_err(mic_error)?;

        log::debug!("Microphone capture started");
        *self.capture.borrow_mut() = Some(Capture {
            recorder,
            _stream: stream,
            chunks,
            _on_data: on_data,
        });
        Ok(())
    }

    async fn stop(&self) -> Result<Vec<u8>> {
        let capture = self
            .capture
            .borrow_mut()
            .take()
            .ok_or_else(|| ErrorKind::MicrophoneError("Not recording".to_string()))?;

        let (tx, rx) = oneshot::channel::<()>();
        let mut tx = Some(tx);
        let on_stop = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            if let Some(tx) = tx.take() {
                let _ = tx.send(());
            }
        });
        capture
            .recorder
            .set_onstop(Some(on_stop.as_ref().unchecked_ref()));
        capture.recorder.stop().map_err(mic_error)?;
        rx.await.map_err(|_| {
            ErrorKind::MicrophoneError("Recorder stopped unexpectedly".to_string())
        })?;

        let parts = js_sys::Array::new();
        for blob in capture.chunks.borrow().iter() {
            parts.push(blob);
        }
        drop(capture);

        let options = BlobPropertyBag::new();
        options.set_type("audio/wav");
        let blob = Blob::new_with_blob_sequence_and_options(&parts, &options)?;
        let buffer = JsFuture::from(blob.array_buffer()).await?;

        log::debug!("Microphone capture stopped, {} chunks", parts.length());
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}

// ── Navigation ──

pub struct DomNavView {
    toggle: Element,
    menu: Element,
}

impl NavView for DomNavView {
    fn set_expanded(&self, expanded: bool) {
        let value = if expanded { "true" } else { "false" };
        let _ = self.toggle.set_attribute("aria-expanded", value);
        let _ = self.menu.class_list().toggle_with_force("active", expanded);
    }
}

fn bind_navigation(document: &Document) {
    let toggle = document.query_selector(".hamburger").ok().flatten();
    let menu = document
        .get_element_by_id("nav-menu")
        .or_else(|| document.query_selector(".nav-menu").ok().flatten());
    let (Some(toggle), Some(menu)) = (toggle, menu) else {
        log::debug!("No navigation toggle on this page");
        return;
    };

    let expanded = toggle.get_attribute("aria-expanded").as_deref() == Some("true");
    let nav = NavToggle::new(
        DomNavView {
            toggle: toggle.clone(),
            menu,
        },
        expanded,
    );
    listen_forever(&toggle, "click", move |_| nav.toggle());
}

// ── Course modal ──

pub struct DomModalView {
    document: Document,
    modal: HtmlElement,
}

impl DomModalView {
    fn set_text(&self, id: &str, text: &str) {
        if let Some(element) = self.document.get_element_by_id(id) {
            element.set_text_content(Some(text));
        }
    }
}

impl ModalView for DomModalView {
    fn fill(&self, title: &str, detail: &CourseDetail) {
        self.set_text("modal-title", title);
        self.set_text("modal-description", detail.description);
        self.set_text("modal-eligibility", detail.eligibility);
        self.set_text("modal-duration", detail.duration);
        self.set_text("modal-admission", detail.admission_process);
        self.set_text("modal-fees", detail.fees);
    }

    fn set_visible(&self, visible: bool) {
        let display = if visible { "block" } else { "none" };
        let _ = self.modal.style().set_property("display", display);
    }
}

fn bind_course_modal(document: &Document) {
    let Some(modal) = document
        .get_element_by_id("course-modal")
        .and_then(|m| m.dyn_into::<HtmlElement>().ok())
    else {
        log::debug!("No course modal on this page");
        return;
    };

    let controller = Rc::new(CourseModal::new(DomModalView {
        document: document.clone(),
        modal: modal.clone(),
    }));

    if let Ok(buttons) = document.query_selector_all(".know-more-btn") {
        for i in 0..buttons.length() {
            let Some(button) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let controller = Rc::clone(&controller);
            let source = button.clone();
            listen_forever(&button, "click", move |_| {
                let title = source
                    .closest(".course-card")
                    .ok()
                    .flatten()
                    .and_then(|card| card.query_selector("h3").ok().flatten())
                    .and_then(|h| h.text_content())
                    .unwrap_or_default();
                controller.handle(ModalEvent::KnowMore(title));
            });
        }
    }

    if let Ok(Some(close)) = modal.query_selector(".close-btn") {
        let controller = Rc::clone(&controller);
        listen_forever(&close, "click", move |_| {
            controller.handle(ModalEvent::CloseIcon)
        });
    }

    {
        let controller = Rc::clone(&controller);
        let overlay: Node = modal.into();
        listen_forever(document, "click", move |event: Event| {
            let on_overlay = event
                .target()
                .and_then(|t| t.dyn_into::<Node>().ok())
                .is_some_and(|t| t.is_same_node(Some(&overlay)));
            if on_overlay {
                controller.handle(ModalEvent::OutsideClick);
            }
        });
    }

    listen_forever(document, "keydown", move |event: Event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|k| k.key()) {
            controller.handle(ModalEvent::KeyDown(key));
        }
    });
}

// ── Chatbot ──

/// Page config from `<script type="application/json" id="chatbot-config">`, or defaults
fn page_config(document: &Document) -> WidgetConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|s| s.text_content())
    else {
        return WidgetConfig::default();
    };
    WidgetConfig::from_json_str(&text).unwrap_or_else(|e| {
        log::warn!("Ignoring invalid chatbot config: {e}");
        WidgetConfig::default()
    })
}

async fn mount_chatbot(document: Document) -> Result<()> {
    let config = page_config(&document);
    let client = WasmClient::new(config.endpoints.clone()).await?;

    let widget: Rc<PageWidget> = Rc::new(ChatbotWidget::new(
        client,
        DomWidgetView::new(document),
        MediaRecorderCapture::default(),
        storage::or_memory(WebStorage::session(), "session"),
        storage::or_memory(WebStorage::local(), "local"),
        config,
    ));

    let weak = Rc::downgrade(&widget);
    widget.view().set_event_sink(Rc::new(move |event: UiEvent| {
        if let Some(widget) = weak.upgrade() {
            spawn_local(async move { widget.handle(event).await });
        }
    }));

    CHATBOT.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&widget)));
    widget.mount().await;
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() {
    init_logging();

    let Some(document) = document() else {
        return;
    };

    bind_navigation(&document);
    bind_course_modal(&document);

    spawn_local(async move {
        if let Err(e) = mount_chatbot(document).await {
            log::error!("Chatbot widget unavailable: {e}");
        }
    });
}
