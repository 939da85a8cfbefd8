//! Request validation: resolves caller options into a typed speech request.

use super::types::{AudioFormat, Language, Model, SpeakOptions, Voice};
use crate::{Error, ErrorContext, Result};
use serde::Serialize;

pub const MIN_SAMPLE_RATE_HERTZ: u32 = 8000;
pub const MAX_SAMPLE_RATE_HERTZ: u32 = 48000;

/// A validated request, serialized as the exact body the service expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRequest {
    pub text: String,
    pub model_id: Model,
    pub format: AudioFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<Voice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate_hertz: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_depth: Option<u32>,
}

// An empty voice or language string counts as "not given".
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Validate `text` and `options`, failing on the first violation.
///
/// Checks run in a fixed order: text, voice, language, model, format, sample rate.
pub fn validate(text: &str, options: &SpeakOptions) -> Result<SpeechRequest> {
    if text.is_empty() {
        return Err(Error::validation_with_context(
            "text is required",
            ErrorContext::new()
                .with_field_path("text")
                .with_source("request_validator"),
        ));
    }

    let voice_id = non_empty(&options.voice_id)
        .map(str::parse::<Voice>)
        .transpose()?;
    let language = non_empty(&options.language)
        .map(str::parse::<Language>)
        .transpose()?;
    let model_id = match options.model_id.as_deref() {
        Some(model) => model.parse::<Model>()?,
        None => Model::default(),
    };
    let format = match options.format.as_deref() {
        Some(format) => format.parse::<AudioFormat>()?,
        None => AudioFormat::default(),
    };

    if let Some(rate) = options.sample_rate_hertz {
        if !(MIN_SAMPLE_RATE_HERTZ..=MAX_SAMPLE_RATE_HERTZ).contains(&rate) {
            return Err(Error::validation_with_context(
                format!(
                    "sampleRateHertz must be between {} and {}",
                    MIN_SAMPLE_RATE_HERTZ, MAX_SAMPLE_RATE_HERTZ
                ),
                ErrorContext::new()
                    .with_field_path("sampleRateHertz")
                    .with_details(format!("got {}", rate))
                    .with_source("request_validator"),
            ));
        }
    }

    Ok(SpeechRequest {
        text: text.to_string(),
        model_id,
        format,
        voice_id,
        language,
        temperature: options.temperature,
        speed: options.speed,
        pitch: options.pitch,
        sample_rate_hertz: options.sample_rate_hertz,
        bit_rate: options.bit_rate,
        bit_depth: options.bit_depth,
    })
}
