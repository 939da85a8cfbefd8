//! Buffered synthesis against the mock voice endpoint

use crate::integration::mock_server::{MockServerFixture, TEST_API_KEY, VOICE_PATH};
use inworld_tts::transport::TransportError;
use inworld_tts::{Error, SpeakOptions, Voice};
use mockito::Matcher;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[tokio::test]
async fn test_synthesize_decodes_audio_with_one_request() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_audio(b"dummy audio", 1).await;

    let audio = fixture
        .client()
        .synthesize("hello", &SpeakOptions::default())
        .await
        .unwrap();

    assert_eq!(audio, b"dummy audio".to_vec());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_request_body_omits_unset_fields() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", VOICE_PATH)
        .match_header("authorization", format!("Basic {}", TEST_API_KEY).as_str())
        .match_body(Matcher::Json(json!({
            "text": "hello",
            "modelId": "inworld-tts-1-max",
            "format": "wav",
            "voiceId": "Ashley",
            "sampleRateHertz": 16000,
            "bitDepth": 16
        })))
        .with_status(200)
        .with_body(json!({ "audioContent": "UklGRg==" }).to_string())
        .create_async()
        .await;

    let opts = SpeakOptions::new()
        .voice(Voice::Ashley)
        .model("inworld-tts-1-max")
        .format("wav")
        .sample_rate(16000)
        .bit_depth(16);
    let audio = fixture.client().synthesize("hello", &opts).await.unwrap();

    assert_eq!(audio, b"RIFF".to_vec());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_default_body_has_model_and_format() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", VOICE_PATH)
        .match_body(Matcher::Json(json!({
            "text": "hi",
            "modelId": "inworld-tts-1",
            "format": "mp3"
        })))
        .with_status(200)
        .with_body(json!({ "audioContent": "AAEC" }).to_string())
        .create_async()
        .await;

    let audio = fixture
        .client()
        .synthesize("hi", &SpeakOptions::default())
        .await
        .unwrap();

    assert_eq!(audio, vec![0u8, 1, 2]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_success_status_embeds_code_and_body() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error(VOICE_PATH, 401, "invalid credentials")
        .await;

    let err = fixture
        .client()
        .synthesize("hello", &SpeakOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    match &err {
        Error::Transport(TransportError::Status { status, body }) => {
            assert_eq!(*status, 401);
            assert_eq!(body, "invalid credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.to_string(), "Inworld TTS error 401: invalid credentials");
}

#[tokio::test]
async fn test_missing_audio_content_is_protocol_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_json(200, r#"{"other":"field"}"#, 1).await;

    let err = fixture
        .client()
        .synthesize("hello", &SpeakOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Protocol { .. }));
    assert!(err.to_string().contains("no audio content in response"));
}

#[tokio::test]
async fn test_malformed_success_body_is_protocol_error() {
    for body in ["not json", r#"{"audioContent":5}"#] {
        let mut fixture = MockServerFixture::new().await;
        let _mock = fixture.mock_json(200, body, 1).await;

        let err = fixture
            .client()
            .synthesize("hello", &SpeakOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Protocol { .. }), "{body}: {err}");
        assert!(err.to_string().contains("malformed tts response"));
    }
}

/// Answer one request with a 500 whose body ends before its content-length.
async fn serve_truncated_error(listener: TcpListener) {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
        if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if request.len() >= end + 4 + length {
                break;
            }
        }
    }
    socket
        .write_all(
            b"HTTP/1.1 500 Internal Server Error\r\n\
              content-type: text/plain\r\n\
              content-length: 100\r\n\r\n\
              partial",
        )
        .await
        .unwrap();
    socket.shutdown().await.ok();
}

#[tokio::test]
async fn test_unreadable_error_body_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_truncated_error(listener));

    let client = inworld_tts::TtsClient::builder()
        .api_key(TEST_API_KEY)
        .base_url(format!("http://{}{}", addr, VOICE_PATH))
        .build()
        .unwrap();
    let err = client
        .synthesize("hello", &SpeakOptions::default())
        .await
        .unwrap_err();

    match &err {
        Error::Transport(TransportError::Status { status, body }) => {
            assert_eq!(*status, 500);
            assert!(body.starts_with("<unreadable body:"), "{body}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_validation_failure_sends_nothing() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_audio(b"unused", 0).await;
    let client = fixture.client();

    for opts in [
        SpeakOptions::new().voice("Nonexistent"),
        SpeakOptions::new().language("xx"),
        SpeakOptions::new().model("bad-model"),
        SpeakOptions::new().format("flac"),
        SpeakOptions::new().sample_rate(7000),
        SpeakOptions::new().sample_rate(50000),
    ] {
        let err = client.synthesize("hello", &opts).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "{err}");
    }
    assert!(client.synthesize("", &SpeakOptions::default()).await.is_err());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_repeated_calls_are_identical() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_audio(b"same bytes", 2).await;
    let client = fixture.client();
    let opts = SpeakOptions::new().voice(Voice::Olivia);

    let first = client.synthesize("hello", &opts).await.unwrap();
    let second = client.synthesize("hello", &opts).await.unwrap();

    assert_eq!(first, second);
    mock.assert_async().await;
}
