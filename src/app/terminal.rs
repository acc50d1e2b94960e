//! Terminal front end for no-WASM builds
//!
//! Renders the widget, menu and modal as plain lines on stdout so the same
//! controllers can be driven from a shell.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;

use crate::app::chatbot::POPUP_ROOT_ID;
use crate::catalog::CourseDetail;
use crate::error::{ErrorKind, Result};
use crate::interface::{ModalView, NavView, PlaceholderId, Recorder, WidgetView};
use crate::model::structs::{ChatMessage, Point, Sender};

#[derive(Default)]
pub struct TerminalView {
    input: RefCell<String>,
    button_ready: Cell<bool>,
    next_placeholder: Cell<u32>,
}

impl TerminalView {
    pub fn set_input(&self, text: &str) {
        *self.input.borrow_mut() = text.to_string();
    }
}

impl WidgetView for TerminalView {
    fn ensure_button(&self) {
        if !self.button_ready.replace(true) {
            println!("💬 Chat assistant available, type /open");
        }
    }

    /// Nothing is rendered from the markup, only its root is checked for
    fn attach_popup(&self, markup: &str) -> Result<()> {
        if !markup.contains(POPUP_ROOT_ID) {
            return Err(ErrorKind::PopupLoadError(format!("no #{POPUP_ROOT_ID} in markup")).into());
        }
        log::debug!("Popup markup: {} bytes", markup.len());
        Ok(())
    }

    fn set_popup_visible(&self, visible: bool) {
        if visible {
            println!("── chat opened ──");
        } else {
            println!("── chat closed ──");
        }
    }

    fn append_bubble(&self, message: &ChatMessage) {
        match message.sender {
            Sender::User => println!("you> {}", message.text),
            Sender::Bot => println!("bot> {}", message.text),
        }
    }

    fn show_placeholder(&self, text: &str) -> PlaceholderId {
        let id = PlaceholderId(self.next_placeholder.get());
        self.next_placeholder.set(id.0 + 1);
        println!("bot> {text}");
        id
    }

    fn remove_placeholder(&self, _id: PlaceholderId) {}

    fn clear_bubbles(&self) {
        println!("── history cleared ──");
    }

    fn read_input(&self) -> String {
        self.input.borrow().clone()
    }

    fn clear_input(&self) {
        self.input.borrow_mut().clear();
    }

    fn set_voice_nav_checkbox(&self, enabled: bool) {
        println!("[voice navigation: {}]", if enabled { "on" } else { "off" });
    }

    fn set_listening(&self, listening: bool) {
        if listening {
            println!("🎤 Listening... (/mic again to stop)");
        }
    }

    fn notify(&self, text: &str) {
        eprintln!("! {text}");
    }

    fn play_audio(&self, url: &str) {
        println!("🔊 {url}");
    }

    fn redirect(&self, path: &str) {
        println!("→ navigating to {path}");
    }

    fn move_popup(&self, top_left: Point) {
        log::debug!("Popup moved to ({}, {})", top_left.x, top_left.y);
    }
}

pub struct TerminalNavView;

impl NavView for TerminalNavView {
    fn set_expanded(&self, expanded: bool) {
        if expanded {
            println!("☰ Home | Courses | Admissions | Placements | Contact");
        } else {
            println!("☰ (menu collapsed)");
        }
    }
}

pub struct TerminalModalView;

impl ModalView for TerminalModalView {
    fn fill(&self, title: &str, detail: &CourseDetail) {
        println!("==================={title}===================");
        println!("Description: {}", detail.description);
        println!("Eligibility: {}", detail.eligibility);
        println!("Duration: {}", detail.duration);
        println!("Admission Process: {}", detail.admission_process);
        println!("Fees: {}", detail.fees);
        println!("================================================");
    }

    fn set_visible(&self, visible: bool) {
        if !visible {
            println!("(course details closed)");
        }
    }
}

/// "Captures" audio by reading a WAV file picked with `/mic <path>`
#[derive(Default)]
pub struct FileRecorder {
    selected: RefCell<Option<PathBuf>>,
    active: RefCell<Option<PathBuf>>,
}

impl FileRecorder {
    pub fn select(&self, path: PathBuf) {
        *self.selected.borrow_mut() = Some(path);
    }
}

impl Recorder for FileRecorder {
    async fn start(&self) -> Result<()> {
        let path = self.selected.borrow_mut().take().ok_or_else(|| {
            ErrorKind::MicrophoneError("No recording selected, use /mic <file.wav>".to_string())
        })?;

        if !path.is_file() {
            return Err(ErrorKind::MicrophoneError(format!(
                "Recording device unavailable: {}",
                path.display()
            ))
            .into());
        }

        *self.active.borrow_mut() = Some(path);
        Ok(())
    }

    async fn stop(&self) -> Result<Vec<u8>> {
        let path = self
            .active
            .borrow_mut()
            .take()
            .ok_or_else(|| ErrorKind::MicrophoneError("Not recording".to_string()))?;

        Ok(tokio::fs::read(&path).await?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Open,
    Close,
    Mic(Option<PathBuf>),
    VoiceNav(bool),
    Clear,
    Course(String),
    Courses,
    Escape,
    Menu,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// `None` for blank lines
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let Some(rest) = line.strip_prefix('/') else {
            return Some(Command::Say(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        let command = match (name, arg) {
            ("open", _) => Command::Open,
            ("close", _) => Command::Close,
            ("mic", "") => Command::Mic(None),
            ("mic", path) => Command::Mic(Some(PathBuf::from(path))),
            ("voicenav", "on") => Command::VoiceNav(true),
            ("voicenav", "off") => Command::VoiceNav(false),
            ("clear", _) => Command::Clear,
            ("course", name) if !name.is_empty() => Command::Course(name.to_string()),
            ("courses", _) => Command::Courses,
            ("esc", _) => Command::Escape,
            ("menu", _) => Command::Menu,
            ("help", _) => Command::Help,
            ("quit" | "exit", _) => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        };
        Some(command)
    }
}

pub const HELP: &str = "\
Commands:
  <text>              ask the assistant
  /open, /close       show or hide the chat popup
  /mic [file.wav]     start (with a recording) or stop voice input
  /voicenav on|off    allow the assistant to navigate pages
  /clear              forget the conversation
  /courses            list courses
  /course <name>      show course details, /esc to close
  /menu               toggle the navigation menu
  /quit";
