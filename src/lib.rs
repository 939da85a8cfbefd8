//! # inworld-tts
//!
//! Client library for the Inworld text-to-speech HTTP API.
//!
//! ## Overview
//!
//! A [`TtsClient`] validates speak options against the closed sets of voices,
//! languages, models and formats the service accepts, posts a single JSON
//! request and hands back the decoded audio. On top of that sits a script
//! stitcher that renders a multi-speaker dialogue line by line.
//!
//! - **Buffered**: [`TtsClient::synthesize`] returns the whole audio buffer.
//! - **Streaming**: [`TtsClient::synthesize_stream`] yields decoded chunks as they arrive.
//! - **Scripts**: [`TtsClient::synthesize_script`] concatenates one call per line.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use inworld_tts::{SpeakOptions, TtsClient, Voice};
//!
//! #[tokio::main]
//! async fn main() -> inworld_tts::Result<()> {
//!     let client = TtsClient::new("your-api-key")?;
//!     let options = SpeakOptions::new().voice(Voice::Ashley).format("wav");
//!     let audio = client.synthesize("Hello there!", &options).await?;
//!     std::fs::write("hello.wav", audio)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`tts`] | Client, option types, validation, streaming and script stitching |
//! | [`transport`] | HTTP plumbing and transport errors |
//! | [`error`] | Unified error type |

pub mod transport;
pub mod tts;

pub use tts::{
    AudioFormat, Language, Model, PauseMode, ScriptDocument, ScriptLine, ScriptStitcher,
    SpeakOptions, Speaker, SpeechRequest, Synthesizer, TtsClient, TtsClientBuilder, Voice,
    DEFAULT_BASE_URL, DEFAULT_PAUSE_MS,
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
