//! Multi-speaker scripts rendered as one concatenated audio buffer.

use super::audio::{check_pause_millis, silence};
use super::client::Synthesizer;
use super::types::{AudioFormat, SpeakOptions};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_PAUSE_MS: u64 = 500;

/// A named voice configuration used by script lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    pub name: String,
    #[serde(default)]
    pub options: SpeakOptions,
}

impl Speaker {
    pub fn new(name: impl Into<String>, options: SpeakOptions) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

/// One line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    pub name: String,
    pub line: String,
}

impl ScriptLine {
    pub fn new(name: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line: line.into(),
        }
    }
}

/// A roster and script loaded from YAML or JSON.
///
/// ```yaml
/// speakers:
///   - name: Host
///     options: { voiceId: Ashley, format: wav }
/// script:
///   - { name: Host, line: "Welcome back." }
/// pauseMs: 300
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptDocument {
    #[serde(default)]
    pub speakers: Vec<Speaker>,
    #[serde(default)]
    pub script: Vec<ScriptLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_ms: Option<u64>,
}

impl ScriptDocument {
    /// Parse a document; JSON is accepted as a subset of YAML.
    pub fn parse(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }
}

/// What goes between stitched lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PauseMode {
    /// Real silence of the requested length for raw formats (wav, mulaw, alaw).
    /// Compressed formats fall back to an empty placeholder.
    #[default]
    Silence,
    /// Always an empty placeholder, whatever the requested length.
    /// Byte-for-byte compatible with earlier releases.
    Empty,
}

/// Drives a [`Synthesizer`] over a script, strictly one line at a time.
pub struct ScriptStitcher<'a, S: Synthesizer + ?Sized> {
    synthesizer: &'a S,
    pause_mode: PauseMode,
}

impl<'a, S: Synthesizer + ?Sized> ScriptStitcher<'a, S> {
    pub fn new(synthesizer: &'a S) -> Self {
        Self {
            synthesizer,
            pause_mode: PauseMode::default(),
        }
    }

    pub fn pause_mode(mut self, mode: PauseMode) -> Self {
        self.pause_mode = mode;
        self
    }

    /// Synthesize every line in order and concatenate the results.
    ///
    /// When a speaker name appears more than once in `speakers`, the last
    /// entry wins. A pause placeholder follows each line when `pause_ms > 0`;
    /// in [`PauseMode::Silence`] it may not exceed
    /// [`MAX_PAUSE_MS`](super::audio::MAX_PAUSE_MS), which is checked before any
    /// request is sent. The first unknown speaker or synthesis failure aborts
    /// the whole call; no partial audio is returned.
    pub async fn synthesize_script(
        &self,
        speakers: &[Speaker],
        script: &[ScriptLine],
        pause_ms: u64,
    ) -> Result<Vec<u8>> {
        if self.pause_mode == PauseMode::Silence {
            check_pause_millis(pause_ms)?;
        }

        let roster: HashMap<&str, &SpeakOptions> = speakers
            .iter()
            .map(|s| (s.name.as_str(), &s.options))
            .collect();

        let mut output = Vec::new();
        let mut warned = false;
        for (index, segment) in script.iter().enumerate() {
            let options = roster
                .get(segment.name.as_str())
                .copied()
                .ok_or_else(|| Error::missing_speaker(&segment.name))?;

            let audio = self.synthesizer.synthesize(&segment.line, options).await?;
            debug!(index, speaker = %segment.name, bytes = audio.len(), "script line rendered");
            output.extend_from_slice(&audio);

            if pause_ms > 0 {
                let pause = self.pause(options, pause_ms)?;
                if pause.is_empty() && self.pause_mode == PauseMode::Silence && !warned {
                    warn!(
                        pause_ms,
                        format = options.format.as_deref().unwrap_or("mp3"),
                        "compressed format: pauses between lines are left empty"
                    );
                    warned = true;
                }
                output.extend_from_slice(&pause);
            }
        }
        Ok(output)
    }

    fn pause(&self, options: &SpeakOptions, pause_ms: u64) -> Result<Vec<u8>> {
        match self.pause_mode {
            PauseMode::Empty => Ok(Vec::new()),
            PauseMode::Silence => {
                // Synthesis already validated the format.
                let format = options
                    .format
                    .as_deref()
                    .and_then(|f| f.parse::<AudioFormat>().ok())
                    .unwrap_or_default();
                Ok(silence(
                    format,
                    options.sample_rate_hertz,
                    options.bit_depth,
                    pause_ms,
                )?
                .unwrap_or_default())
            }
        }
    }
}
