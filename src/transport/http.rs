use super::TransportError;
use crate::{BoxStream, Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Proxy;
use serde::Serialize;
use std::env;
use std::time::Duration;

/// Knobs for the underlying `reqwest::Client`.
///
/// Unset values fall back to the environment:
/// - `INWORLD_HTTP_TIMEOUT_SECS`: whole-request timeout (no timeout when unset)
/// - `INWORLD_PROXY_URL`: proxy for all requests
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    pub timeout: Option<Duration>,
    pub proxy_url: Option<String>,
    pub user_agent: Option<String>,
}

/// Thin wrapper around `reqwest` carrying the credential for every request.
pub struct HttpTransport {
    client: reqwest::Client,
    api_key: String,
}

impl HttpTransport {
    pub fn new(api_key: impl Into<String>, options: TransportOptions) -> Result<Self> {
        let timeout = options.timeout.or_else(|| {
            env::var("INWORLD_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
        });

        let user_agent = options
            .user_agent
            .unwrap_or_else(|| format!("inworld-tts-rust/{}", env!("CARGO_PKG_VERSION")));

        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(proxy_url) = options
            .proxy_url
            .or_else(|| env::var("INWORLD_PROXY_URL").ok())
        {
            let proxy = Proxy::all(&proxy_url)
                .map_err(|e| Error::configuration(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Basic {}", self.api_key)).map_err(|_| {
            Error::configuration("API key contains characters not allowed in an HTTP header")
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn send<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(url)
            .headers(self.headers()?)
            .json(body)
            .send()
            .await
            .map_err(TransportError::Http)?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies are plain text; keep whatever the service sent.
            let body = match response.text().await {
                Ok(text) => text,
                Err(e) => format!("<unreadable body: {}>", e),
            };
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }
        Ok(response)
    }

    /// POST a JSON body and return the full response body.
    pub async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Bytes> {
        let response = self.send(url, body).await?;
        let bytes = response.bytes().await.map_err(TransportError::Http)?;
        Ok(bytes)
    }

    /// POST a JSON body and return the response body as it arrives.
    pub async fn post_stream<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<BoxStream<'static, Bytes>> {
        let response = self.send(url, body).await?;
        let byte_stream = response
            .bytes_stream()
            .map_err(|e| Error::Transport(TransportError::Http(e)));
        Ok(Box::pin(byte_stream))
    }
}
