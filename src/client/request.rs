//! No-WASM chatbot client implementation using reqwest

use std::time::Duration;

use reqwest::{
    Client,
    multipart::{Form, Part},
};

use crate::config::Endpoints;
use crate::error::{ErrorKind, Result};
use crate::interface::{ChatApi, HttpClient};
use crate::model::dtos::{AskBotParams, VoiceQueryParams};
use crate::model::structs::BotReply;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for no-WASM environments using reqwest
#[derive(Debug, Clone)]
pub struct NoWasmClient {
    client: Client,
    endpoints: Endpoints,
}

impl HttpClient for NoWasmClient {
    async fn new(endpoints: Endpoints) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self { client, endpoints })
    }
}

impl NoWasmClient {
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Read the body, failing on non-success status or non-JSON content
    async fn handle_json_response(resp: reqwest::Response) -> Result<BotReply> {
        let status = resp.status();
        let text = resp.text().await?;

        log::debug!("Response status: {status}, length: {}", text.len());

        if !status.is_success() {
            return Err(ErrorKind::HttpStatus(status.as_u16(), text).into());
        }

        match serde_json::from_str::<BotReply>(&text) {
            Ok(reply) => Ok(reply),
            Err(_) => Err(ErrorKind::ParseError(format!("Invalid JSON response: {text}")).into()),
        }
    }
}

impl ChatApi for NoWasmClient {
    async fn fetch_popup_markup(&self) -> Result<String> {
        let url = self.endpoints.popup_markup_url();
        log::debug!("Fetching popup markup from {url}");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        let html = resp.text().await?;

        if !status.is_success() {
            return Err(ErrorKind::HttpStatus(status.as_u16(), html).into());
        }

        Ok(html)
    }

    async fn ask_bot(&self, params: AskBotParams<'_>) -> Result<BotReply> {
        let url = self.endpoints.ask_bot_url();
        log::debug!("Sending query to {url}");

        let resp = self
            .client
            .post(&url)
            .form(&[("query", params.query)])
            .send()
            .await?;

        Self::handle_json_response(resp).await
    }

    async fn record_and_transcribe(&self, params: VoiceQueryParams<'_>) -> Result<BotReply> {
        let url = self.endpoints.transcribe_url();
        log::debug!("Uploading {} bytes of audio to {url}", params.audio.len());

        let part = Part::bytes(params.audio.to_vec())
            .file_name(params.file_name.to_string())
            .mime_str(params.mime_type)?;
        let form = Form::new().part(VoiceQueryParams::FIELD_NAME, part);

        let resp = self.client.post(&url).multipart(form).send().await?;

        Self::handle_json_response(resp).await
    }

    fn audio_url(&self, audio_file: &str) -> String {
        self.endpoints.audio_url(audio_file)
    }
}
