//! Widget configuration
//!
//! Everything here has a default so a page can ship an empty `{}` (or no
//! config at all) and still get the full widget.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Backend locations used by the chatbot widget
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Endpoints {
    /// Prefix for every path below; empty means "same origin" in the browser
    pub base_url: String,
    pub popup_markup: String,
    pub ask_bot: String,
    pub transcribe: String,
    pub audio: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            popup_markup: "/html/chatbot_popup.html".to_string(),
            ask_bot: "/ask_bot/".to_string(),
            transcribe: "/record_and_transcribe/".to_string(),
            audio: "/download_audio/".to_string(),
        }
    }
}

impl Endpoints {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Join `base_url` and `path` with exactly one slash between them
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.is_empty() {
            return path.to_string();
        }
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    pub fn popup_markup_url(&self) -> String {
        self.url(&self.popup_markup)
    }

    pub fn ask_bot_url(&self) -> String {
        self.url(&self.ask_bot)
    }

    pub fn transcribe_url(&self) -> String {
        self.url(&self.transcribe)
    }

    pub fn audio_url(&self, audio_file: &str) -> String {
        let prefix = self.url(&self.audio);
        format!(
            "{}/{}",
            prefix.trim_end_matches('/'),
            urlencoding::encode(audio_file)
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Keep the conversation in session storage and replay it on popup load
    pub persist_history: bool,
    /// Voice navigation state when durable storage has no preference yet
    pub voice_nav_default: bool,
    pub draggable: bool,
    /// Reopen the popup on page load when it was open before navigating
    pub restore_open_state: bool,
    pub endpoints: Endpoints,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            persist_history: true,
            voice_nav_default: false,
            draggable: true,
            restore_open_state: true,
            endpoints: Endpoints::default(),
        }
    }
}

impl WidgetConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(feature = "no-wasm")]
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_doubling_slashes() {
        let endpoints = Endpoints::with_base_url("http://127.0.0.1:8000/");
        assert_eq!(endpoints.ask_bot_url(), "http://127.0.0.1:8000/ask_bot/");
        assert_eq!(
            endpoints.transcribe_url(),
            "http://127.0.0.1:8000/record_and_transcribe/"
        );
    }

    #[test]
    fn empty_base_keeps_paths_relative() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.popup_markup_url(), "/html/chatbot_popup.html");
        assert_eq!(endpoints.audio_url("answer.mp3"), "/download_audio/answer.mp3");
    }

    #[test]
    fn audio_file_names_are_percent_encoded() {
        let endpoints = Endpoints::with_base_url("http://host");
        assert_eq!(
            endpoints.audio_url("my answer.mp3"),
            "http://host/download_audio/my%20answer.mp3"
        );
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = WidgetConfig::from_json_str(
            r#"{"voiceNavDefault": true, "endpoints": {"baseUrl": "http://x"}}"#,
        )
        .unwrap();
        assert!(config.voice_nav_default);
        assert!(config.persist_history);
        assert!(config.draggable);
        assert_eq!(config.endpoints.base_url, "http://x");
        assert_eq!(config.endpoints.ask_bot, "/ask_bot/");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(WidgetConfig::from_json_str("{not json").is_err());
    }
}
