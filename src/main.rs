use std::rc::Rc;

use campus_portal_core::app::terminal::{
    Command, FileRecorder, HELP, TerminalModalView, TerminalNavView, TerminalView,
};
use campus_portal_core::app::{ChatbotWidget, CourseModal, ModalEvent, NavToggle, UiEvent};
use campus_portal_core::catalog::COURSES;
use campus_portal_core::config::WidgetConfig;
use campus_portal_core::error::Result;
use campus_portal_core::interface::HttpClient;
use campus_portal_core::storage::{JsonFileStore, MemoryStore};
use campus_portal_core::NoWasmClient;
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const STATE_FILE: &str = "campus_portal_state.json";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("Usage: {} [backend-url] [config.json]", args[0]);
        println!("{HELP}");
        return Ok(());
    }

    let mut config = match args.get(2) {
        Some(path) => WidgetConfig::from_json_file(path)?,
        None => WidgetConfig::default(),
    };

    let base_url = args
        .get(1)
        .cloned()
        .or_else(|| std::env::var("CAMPUS_PORTAL_BASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    config.endpoints.base_url = base_url;

    log::info!("Backend: {}", config.endpoints.base_url);

    let client = NoWasmClient::new(config.endpoints.clone()).await?;
    let session = Rc::new(MemoryStore::new());
    let durable = Rc::new(JsonFileStore::open(STATE_FILE)?);

    let widget = ChatbotWidget::new(
        client,
        TerminalView::default(),
        FileRecorder::default(),
        session,
        durable,
        config,
    );
    let modal = CourseModal::new(TerminalModalView);
    let nav = NavToggle::new(TerminalNavView, false);

    widget.mount().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            continue;
        };

        match command {
            Command::Say(text) => {
                widget.view().set_input(&text);
                widget.handle(UiEvent::Send).await;
            }
            Command::Open => widget.handle(UiEvent::ButtonClicked).await,
            Command::Close => widget.handle(UiEvent::Close).await,
            Command::Mic(path) => {
                if let Some(path) = path {
                    widget.recorder().select(path);
                }
                widget.handle(UiEvent::MicToggled).await;
            }
            Command::VoiceNav(enabled) => {
                widget.handle(UiEvent::VoiceNavChanged(enabled)).await;
                println!("[voice navigation: {}]", if enabled { "on" } else { "off" });
            }
            Command::Clear => widget.handle(UiEvent::ClearHistory).await,
            Command::Course(name) => modal.handle(ModalEvent::KnowMore(name)),
            Command::Courses => {
                for (name, detail) in COURSES {
                    println!("{:<8}{}", name, detail.duration);
                }
            }
            Command::Escape => modal.handle(ModalEvent::KeyDown("Escape".to_string())),
            Command::Menu => nav.toggle(),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(input) => println!("Unknown command: {input} (try /help)"),
        }
    }

    Ok(())
}
