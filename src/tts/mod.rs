//! TTS module: validates speak options, calls the Inworld voice endpoint and
//! decodes the returned audio.

pub mod audio;
mod client;
pub mod script;
mod stream;
mod types;
pub mod validation;

pub use client::{Synthesizer, TtsClient, TtsClientBuilder, DEFAULT_BASE_URL};
pub use script::{PauseMode, ScriptDocument, ScriptLine, ScriptStitcher, Speaker, DEFAULT_PAUSE_MS};
pub use types::{AudioFormat, Language, Model, SpeakOptions, Voice};
pub use validation::SpeechRequest;
