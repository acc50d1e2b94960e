/// Form body for the text query endpoint
#[derive(Debug, Clone)]
pub struct AskBotParams<'a> {
    pub query: &'a str,
}

/// Multipart body for the voice query endpoint
#[derive(Debug, Clone)]
pub struct VoiceQueryParams<'a> {
    pub audio: &'a [u8],
    pub file_name: &'a str,
    pub mime_type: &'a str,
}

impl<'a> VoiceQueryParams<'a> {
    /// Form field the backend reads the upload from
    pub const FIELD_NAME: &'static str = "file";

    pub fn wav(audio: &'a [u8]) -> Self {
        Self {
            audio,
            file_name: "recording.wav",
            mime_type: "audio/wav",
        }
    }
}
