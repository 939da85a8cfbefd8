//! TTS (Text-to-Speech) types.

use crate::{Error, ErrorContext};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a closed set of wire identifiers as an enum.
///
/// Parsing an unknown identifier fails with a validation error naming the
/// request field, the offending value and every accepted value.
macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted value, in service order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Request field this value is sent under.
            pub const FIELD: &'static str = $field;

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            pub(crate) fn accepted() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(Error::validation_with_context(
                        format!(
                            "Unsupported {} '{}'. Supported: {}",
                            $field,
                            other,
                            Self::accepted()
                        ),
                        ErrorContext::new()
                            .with_field_path($field)
                            .with_source("request_validator"),
                    )),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

closed_set! {
    /// Voices offered by the service.
    Voice, field = "voiceId" {
        Alain => "Alain",
        Alex => "Alex",
        Ashley => "Ashley",
        Asuka => "Asuka",
        Craig => "Craig",
        Deborah => "Deborah",
        Dennis => "Dennis",
        Diego => "Diego",
        Dominus => "Dominus",
        Edward => "Edward",
        Elizabeth => "Elizabeth",
        Erik => "Erik",
        Etienne => "Étienne",
        Gianni => "Gianni",
        Hades => "Hades",
        Heitor => "Heitor",
        Helene => "Hélène",
        Hyunwoo => "Hyunwoo",
        Jing => "Jing",
        Johanna => "Johanna",
        Josef => "Josef",
        Julia => "Julia",
        Katrien => "Katrien",
        Lennart => "Lennart",
        Lore => "Lore",
        Lupita => "Lupita",
        Maite => "Maitê",
        Mark => "Mark",
        Mathieu => "Mathieu",
        Miguel => "Miguel",
        Minji => "Minji",
        Olivia => "Olivia",
        Orietta => "Orietta",
        Pixie => "Pixie",
        Priya => "Priya",
        Rafael => "Rafael",
        Ronald => "Ronald",
        Sarah => "Sarah",
        Satoshi => "Satoshi",
        Seojun => "Seojun",
        Shaun => "Shaun",
        Szymon => "Szymon",
        Theodore => "Theodore",
        Timothy => "Timothy",
        Wendy => "Wendy",
        Wojciech => "Wojciech",
        Xiaoyin => "Xiaoyin",
        Xinyi => "Xinyi",
        Yichen => "Yichen",
        Yoona => "Yoona",
    }
}

closed_set! {
    /// ISO language codes understood by the models.
    Language, field = "language" {
        En => "en",
        Es => "es",
        Fr => "fr",
        Ko => "ko",
        Nl => "nl",
        Zh => "zh",
        De => "de",
        It => "it",
        Ja => "ja",
        Pl => "pl",
        Pt => "pt",
    }
}

closed_set! {
    /// Synthesis models.
    Model, field = "modelId" {
        InworldTts1 => "inworld-tts-1",
        InworldTts1Max => "inworld-tts-1-max",
    }
}

closed_set! {
    /// Supported audio output formats.
    AudioFormat, field = "format" {
        Mp3 => "mp3",
        Wav => "wav",
        Opus => "opus",
        Mulaw => "mulaw",
        Alaw => "alaw",
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::InworldTts1
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        AudioFormat::Mp3
    }
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Opus => "audio/opus",
            Self::Mulaw => "audio/basic",
            Self::Alaw => "audio/x-alaw-basic",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Opus => "opus",
            Self::Mulaw => "ulaw",
            Self::Alaw => "alaw",
        }
    }

    /// Compressed formats cannot carry silence without an encoder.
    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Mp3 | Self::Opus)
    }
}

/// Options for a single synthesis call.
///
/// Identifier fields are plain strings so that any caller input reaches
/// validation; [`crate::tts::validation::validate`] resolves them into the
/// closed sets above. Unset fields are left out of the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakOptions {
    /// Voice identifier, e.g. `Ashley`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    /// ISO language code, e.g. `en`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Model identifier; `inworld-tts-1` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    /// Randomness, 0.6 to 1.0 expected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Speaking rate, 0.5 to 1.5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    /// Pitch adjustment, -5.0 to 5.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,
    /// Output format; `mp3` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Sample rate in Hz, 8000 to 48000
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate_hertz: Option<u32>,
    /// Bit rate in kbps for compressed formats
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<u32>,
    /// Bit depth for WAV output, e.g. 16
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_depth: Option<u32>,
}

impl SpeakOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice_id = Some(voice.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model_id = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn pitch(mut self, pitch: f32) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn sample_rate(mut self, hertz: u32) -> Self {
        self.sample_rate_hertz = Some(hertz);
        self
    }

    pub fn bit_rate(mut self, kbps: u32) -> Self {
        self.bit_rate = Some(kbps);
        self
    }

    pub fn bit_depth(mut self, bits: u32) -> Self {
        self.bit_depth = Some(bits);
        self
    }
}
