//! Mock HTTP server setup for integration tests

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use inworld_tts::TtsClient;
use mockito::{Matcher, Mock, Server, ServerGuard};

pub const TEST_API_KEY: &str = "test-api-key";
pub const VOICE_PATH: &str = "/tts/v1/voice";
pub const STREAM_PATH: &str = "/tts/v1/voice:stream";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = format!("{}{}", server.url(), VOICE_PATH);
        Self { server, base_url }
    }

    /// Create a client pointed at the mock server
    pub fn client(&self) -> TtsClient {
        TtsClient::builder()
            .api_key(TEST_API_KEY)
            .base_url(&self.base_url)
            .build()
            .expect("client should build")
    }

    /// Mock a successful buffered response carrying `audio`, expected `hits` times
    pub async fn mock_audio(&mut self, audio: &[u8], hits: usize) -> Mock {
        let body = serde_json::json!({ "audioContent": STANDARD.encode(audio) });
        self.mock_json(200, &body.to_string(), hits).await
    }

    /// Mock any JSON response on the buffered endpoint
    pub async fn mock_json(&mut self, status: usize, body: &str, hits: usize) -> Mock {
        self.server
            .mock("POST", VOICE_PATH)
            .match_header("authorization", format!("Basic {}", TEST_API_KEY).as_str())
            .match_header("content-type", Matcher::Regex("application/json".into()))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Mock a plain-text error response
    pub async fn mock_error(&mut self, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", path)
            .with_status(status)
            .with_header("content-type", "text/plain")
            .with_body(body)
            .create_async()
            .await
    }

    /// Mock the streaming endpoint with one NDJSON envelope per chunk
    pub async fn mock_stream(&mut self, chunks: &[&[u8]]) -> Mock {
        let body = chunks
            .iter()
            .map(|chunk| {
                format!(
                    "{}\n",
                    serde_json::json!({ "result": { "audioContent": STANDARD.encode(chunk) } })
                )
            })
            .collect::<String>();
        self.mock_stream_body(&body).await
    }

    pub async fn mock_stream_body(&mut self, body: &str) -> Mock {
        self.server
            .mock("POST", STREAM_PATH)
            .match_header("authorization", format!("Basic {}", TEST_API_KEY).as_str())
            .with_status(200)
            .with_header("content-type", "application/x-ndjson")
            .with_body(body)
            .create_async()
            .await
    }
}
