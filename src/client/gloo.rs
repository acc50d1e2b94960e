//! WASM chatbot client implementation using gloo_net
//!
//! Requests go through the browser's fetch API. Form bodies are built with
//! `FormData` so the backend sees the same shape a plain HTML form would send.

use gloo_net::http::{Request, Response};
use web_sys::{Blob, BlobPropertyBag, FormData, RequestCredentials};

use crate::config::Endpoints;
use crate::error::{ErrorKind, Result};
use crate::interface::{ChatApi, HttpClient};
use crate::model::dtos::{AskBotParams, VoiceQueryParams};
use crate::model::structs::BotReply;

/// HTTP client for WASM environments using gloo_net
#[derive(Debug, Clone)]
pub struct WasmClient {
    endpoints: Endpoints,
}

impl HttpClient for WasmClient {
    async fn new(endpoints: Endpoints) -> Result<Self> {
        Ok(Self { endpoints })
    }
}

impl WasmClient {
    /// Handle JSON response with status checking
    async fn handle_json_response(resp: Response) -> Result<BotReply> {
        let status = resp.status();
        let text = resp.text().await?;

        log::debug!("Response status: {status}, length: {}", text.len());

        if !resp.ok() {
            return Err(ErrorKind::HttpStatus(status, text).into());
        }

        match serde_json::from_str::<BotReply>(&text) {
            Ok(reply) => Ok(reply),
            Err(_) => Err(ErrorKind::ParseError(format!("Invalid JSON response: {text}")).into()),
        }
    }

    fn audio_blob(params: &VoiceQueryParams<'_>) -> Result<Blob> {
        let bytes = js_sys::Uint8Array::from(params.audio);
        let parts = js_sys::Array::new();
        parts.push(&bytes);

        let options = BlobPropertyBag::new();
        options.set_type(params.mime_type);

        Ok(Blob::new_with_u8_array_sequence_and_options(
            &parts, &options,
        )?)
    }
}

impl ChatApi for WasmClient {
    async fn fetch_popup_markup(&self) -> Result<String> {
        let url = self.endpoints.popup_markup_url();
        log::debug!("Fetching popup markup from {url}");

        let resp = Request::get(&url)
            .credentials(RequestCredentials::SameOrigin)
            .send()
            .await?;
        let html = resp.text().await?;

        if !resp.ok() {
            return Err(ErrorKind::HttpStatus(resp.status(), html).into());
        }

        Ok(html)
    }

    async fn ask_bot(&self, params: AskBotParams<'_>) -> Result<BotReply> {
        let url = self.endpoints.ask_bot_url();
        log::debug!("Sending query to {url}");

        let form = FormData::new()?;
        form.append_with_str("query", params.query)?;

        let resp = Request::post(&url)
            .credentials(RequestCredentials::SameOrigin)
            .body(form)?
            .send()
            .await?;

        Self::handle_json_response(resp).await
    }

    async fn record_and_transcribe(&self, params: VoiceQueryParams<'_>) -> Result<BotReply> {
        let url = self.endpoints.transcribe_url();
        log::debug!("Uploading {} bytes of audio to {url}", params.audio.len());

        let blob = Self::audio_blob(&params)?;
        let form = FormData::new()?;
        form.append_with_blob_and_filename(VoiceQueryParams::FIELD_NAME, &blob, params.file_name)?;

        let resp = Request::post(&url)
            .credentials(RequestCredentials::SameOrigin)
            .body(form)?
            .send()
            .await?;

        Self::handle_json_response(resp).await
    }

    fn audio_url(&self, audio_file: &str) -> String {
        self.endpoints.audio_url(audio_file)
    }
}
