//! TTS (Text-to-Speech) client.

use super::audio::decode_audio_content;
use super::script::{PauseMode, ScriptLine, ScriptStitcher, Speaker};
use super::stream::decode_audio_stream;
use super::types::SpeakOptions;
use super::validation::{validate, SpeechRequest};
use crate::transport::{HttpTransport, TransportOptions};
use crate::{BoxStream, Error, ErrorContext, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.inworld.ai/tts/v1/voice";

/// Anything that can turn one line of text into audio.
///
/// [`TtsClient`] is the production implementation; the script stitcher only
/// depends on this trait.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, options: &SpeakOptions) -> Result<Vec<u8>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

/// Client for text-to-speech synthesis.
pub struct TtsClient {
    transport: HttpTransport,
    base_url: String,
    stream_url: String,
}

impl TtsClient {
    /// Client for the default endpoint. Fails when `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    pub fn builder() -> TtsClientBuilder {
        TtsClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Synthesize `text` and return the decoded audio.
    ///
    /// Issues exactly one request. Nothing is retried or cached.
    pub async fn synthesize(&self, text: &str, options: &SpeakOptions) -> Result<Vec<u8>> {
        let request = validate(text, options)?;
        log_request(&request, &self.base_url);

        let body = self.transport.post_json(&self.base_url, &request).await?;
        let response: SynthesizeResponse = serde_json::from_slice(&body).map_err(|e| {
            Error::protocol_with_context(
                format!("malformed tts response: {}", e),
                ErrorContext::new().with_source("tts"),
            )
        })?;
        let encoded = response
            .audio_content
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::protocol_with_context(
                    "no audio content in response",
                    ErrorContext::new()
                        .with_field_path("audioContent")
                        .with_source("tts"),
                )
            })?;
        let audio = decode_audio_content(&encoded, "tts")?;
        debug!(bytes = audio.len(), "tts response decoded");
        Ok(audio)
    }

    /// Synthesize `text` and yield audio chunks as they arrive.
    ///
    /// Validation and HTTP status failures are returned before any chunk.
    /// The stream is finite and cannot be restarted.
    pub async fn synthesize_stream(
        &self,
        text: &str,
        options: &SpeakOptions,
    ) -> Result<BoxStream<'static, Bytes>> {
        let request = validate(text, options)?;
        log_request(&request, &self.stream_url);

        let raw = self.transport.post_stream(&self.stream_url, &request).await?;
        Ok(decode_audio_stream(raw))
    }

    /// Render a multi-speaker script, one request per line, in order.
    ///
    /// Pauses are generated silence where the format allows it; see
    /// [`ScriptStitcher`] for the placeholder rules.
    pub async fn synthesize_script(
        &self,
        speakers: &[Speaker],
        script: &[ScriptLine],
        pause_ms: u64,
    ) -> Result<Vec<u8>> {
        ScriptStitcher::new(self)
            .synthesize_script(speakers, script, pause_ms)
            .await
    }

    /// Same as [`TtsClient::synthesize_script`] with an explicit pause mode.
    pub async fn synthesize_script_with(
        &self,
        speakers: &[Speaker],
        script: &[ScriptLine],
        pause_ms: u64,
        pause_mode: PauseMode,
    ) -> Result<Vec<u8>> {
        ScriptStitcher::new(self)
            .pause_mode(pause_mode)
            .synthesize_script(speakers, script, pause_ms)
            .await
    }
}

fn log_request(request: &SpeechRequest, url: &str) {
    debug!(
        url,
        model = request.model_id.as_str(),
        format = request.format.as_str(),
        voice = request.voice_id.map(|v| v.as_str()),
        chars = request.text.chars().count(),
        "sending tts request"
    );
}

#[async_trait]
impl Synthesizer for TtsClient {
    async fn synthesize(&self, text: &str, options: &SpeakOptions) -> Result<Vec<u8>> {
        TtsClient::synthesize(self, text, options).await
    }
}

pub struct TtsClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    transport: TransportOptions,
}

impl TtsClientBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            transport: TransportOptions::default(),
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Whole-request timeout. Unset means no timeout beyond the transport's own.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = Some(timeout);
        self
    }

    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.transport.proxy_url = Some(url.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.transport.user_agent = Some(user_agent.into());
        self
    }

    /// Fill unset fields from `INWORLD_API_KEY` and `INWORLD_TTS_BASE_URL`.
    pub fn from_env(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = std::env::var("INWORLD_API_KEY").ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("INWORLD_TTS_BASE_URL").ok();
        }
        self
    }

    pub fn build(self) -> Result<TtsClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "apiKey is required",
                    ErrorContext::new().with_field_path("apiKey"),
                )
            })?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url
            .strip_suffix('/')
            .unwrap_or(&base_url)
            .to_string();
        url::Url::parse(&base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid base URL '{}': {}", base_url, e),
                ErrorContext::new().with_field_path("baseUrl"),
            )
        })?;
        let stream_url = format!("{}:stream", base_url);

        let transport = HttpTransport::new(api_key, self.transport)?;
        Ok(TtsClient {
            transport,
            base_url,
            stream_url,
        })
    }
}

impl Default for TtsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
