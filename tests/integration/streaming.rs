//! Streaming synthesis against the mock `:stream` endpoint

use crate::integration::mock_server::{MockServerFixture, STREAM_PATH};
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use inworld_tts::{Error, SpeakOptions};

#[tokio::test]
async fn test_stream_yields_chunks_in_arrival_order() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_stream(&[&b"chunk-1"[..], &b"chunk-2"[..], &b"chunk-3"[..]])
        .await;

    let chunks: Vec<Bytes> = fixture
        .client()
        .synthesize_stream("hello", &SpeakOptions::new().format("wav"))
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(
        chunks,
        vec![
            Bytes::from("chunk-1"),
            Bytes::from("chunk-2"),
            Bytes::from("chunk-3")
        ]
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_stream_status_error_fails_before_chunks() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_error(STREAM_PATH, 503, "overloaded").await;

    let result = fixture
        .client()
        .synthesize_stream("hello", &SpeakOptions::default())
        .await;

    match result {
        Err(err) => {
            assert_eq!(err.status(), Some(503));
            assert!(err.to_string().contains("overloaded"));
        }
        Ok(_) => panic!("expected a transport error"),
    }
}

#[tokio::test]
async fn test_stream_error_envelope_after_partial_audio() {
    let mut fixture = MockServerFixture::new().await;
    let body = concat!(
        "{\"result\":{\"audioContent\":\"cGFydA==\"}}\n",
        "{\"error\":{\"code\":13,\"message\":\"synthesis interrupted\"}}\n",
    );
    let _mock = fixture.mock_stream_body(body).await;

    let results: Vec<_> = fixture
        .client()
        .synthesize_stream("hello", &SpeakOptions::default())
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap(), &Bytes::from("part"));
    assert!(matches!(results[1], Err(Error::Protocol { .. })));
}

#[tokio::test]
async fn test_stream_validates_before_sending() {
    let fixture = MockServerFixture::new().await;

    let result = fixture
        .client()
        .synthesize_stream("hello", &SpeakOptions::new().sample_rate(4000))
        .await;

    assert!(matches!(result, Err(Error::Validation { .. })));
}
