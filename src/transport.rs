//! HTTP transport for the speech endpoints.

pub mod http;

pub use http::{HttpTransport, TransportOptions};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Inworld TTS error {status}: {body}")]
    Status { status: u16, body: String },
}
