use serde::{Deserialize, Serialize};

/// Reply shared by the text and voice endpoints; every field is optional
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct BotReply {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub audio_file: Option<String>,
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub detected_language: Option<String>,
}

impl BotReply {
    pub fn answer(&self) -> Option<&str> {
        non_blank(&self.answer)
    }

    pub fn error(&self) -> Option<&str> {
        non_blank(&self.error)
    }

    pub fn audio_file(&self) -> Option<&str> {
        non_blank(&self.audio_file)
    }

    pub fn redirect(&self) -> Option<&str> {
        non_blank(&self.redirect)
    }

    pub fn transcript(&self) -> Option<&str> {
        non_blank(&self.transcript)
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
        }
    }
}

/// Page coordinates in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
