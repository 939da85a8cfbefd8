//! Audio payload helpers: base64 decoding and generated silence.

use super::types::AudioFormat;
use super::validation::{MAX_SAMPLE_RATE_HERTZ, MIN_SAMPLE_RATE_HERTZ};
use crate::{Error, ErrorContext, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Sample rate assumed for WAV output when the request did not pin one.
pub const DEFAULT_WAV_SAMPLE_RATE: u32 = 48000;
/// Sample rate assumed for G.711 output when the request did not pin one.
pub const DEFAULT_G711_SAMPLE_RATE: u32 = 8000;
pub const DEFAULT_BIT_DEPTH: u32 = 16;
/// Longest pause that is generated as silence (one minute).
pub const MAX_PAUSE_MS: u64 = 60_000;
/// Widest PCM sample that is generated as silence.
pub const MAX_SILENCE_BIT_DEPTH: u32 = 32;

const MULAW_SILENCE: u8 = 0xFF;
const ALAW_SILENCE: u8 = 0xD5;
// 8-bit PCM is unsigned with its midpoint at 0x80.
const PCM8_SILENCE: u8 = 0x80;

pub(crate) fn decode_audio_content(encoded: &str, source: &str) -> Result<Vec<u8>> {
    STANDARD.decode(encoded.trim()).map_err(|e| {
        Error::protocol_with_context(
            format!("audioContent is not valid base64: {}", e),
            ErrorContext::new()
                .with_field_path("audioContent")
                .with_source(source.to_string()),
        )
    })
}

fn silence_error(field: &str, message: String, details: String) -> Error {
    Error::validation_with_context(
        message,
        ErrorContext::new()
            .with_field_path(field)
            .with_details(details)
            .with_source("silence"),
    )
}

/// Reject pauses longer than [`MAX_PAUSE_MS`].
pub(crate) fn check_pause_millis(millis: u64) -> Result<()> {
    if millis > MAX_PAUSE_MS {
        return Err(silence_error(
            "pauseMillis",
            format!("pauseMillis must be at most {}", MAX_PAUSE_MS),
            format!("got {}", millis),
        ));
    }
    Ok(())
}

/// Mono silence lasting `millis` in the given raw format.
///
/// Returns `Ok(None)` for compressed formats, which would need an encoder.
/// Pauses above [`MAX_PAUSE_MS`], sample rates outside 8000..=48000 Hz and
/// WAV depths above [`MAX_SILENCE_BIT_DEPTH`] are validation errors.
pub fn silence(
    format: AudioFormat,
    sample_rate_hertz: Option<u32>,
    bit_depth: Option<u32>,
    millis: u64,
) -> Result<Option<Vec<u8>>> {
    let (fill, rate, width) = match format {
        AudioFormat::Mp3 | AudioFormat::Opus => return Ok(None),
        AudioFormat::Mulaw => (
            MULAW_SILENCE,
            sample_rate_hertz.unwrap_or(DEFAULT_G711_SAMPLE_RATE),
            1,
        ),
        AudioFormat::Alaw => (
            ALAW_SILENCE,
            sample_rate_hertz.unwrap_or(DEFAULT_G711_SAMPLE_RATE),
            1,
        ),
        AudioFormat::Wav => {
            let bits = bit_depth.unwrap_or(DEFAULT_BIT_DEPTH);
            if bits > MAX_SILENCE_BIT_DEPTH {
                return Err(silence_error(
                    "bitDepth",
                    format!("bitDepth must be at most {} for generated silence", MAX_SILENCE_BIT_DEPTH),
                    format!("got {}", bits),
                ));
            }
            // Samples are stored in whole bytes; depth 0 means 8-bit.
            let width = bits.div_ceil(8).max(1);
            let fill = if width == 1 { PCM8_SILENCE } else { 0 };
            (fill, sample_rate_hertz.unwrap_or(DEFAULT_WAV_SAMPLE_RATE), width)
        }
    };

    check_pause_millis(millis)?;
    if !(MIN_SAMPLE_RATE_HERTZ..=MAX_SAMPLE_RATE_HERTZ).contains(&rate) {
        return Err(silence_error(
            "sampleRateHertz",
            format!(
                "sampleRateHertz must be between {} and {}",
                MIN_SAMPLE_RATE_HERTZ, MAX_SAMPLE_RATE_HERTZ
            ),
            format!("got {}", rate),
        ));
    }

    let len = u64::from(rate)
        .checked_mul(millis)
        .map(|n| n / 1000)
        .and_then(|samples| samples.checked_mul(u64::from(width)))
        .and_then(|bytes| usize::try_from(bytes).ok())
        .ok_or_else(|| {
            silence_error(
                "pauseMillis",
                "pause is too long to generate".to_string(),
                format!("{} ms at {} Hz", millis, rate),
            )
        })?;
    Ok(Some(vec![fill; len]))
}
