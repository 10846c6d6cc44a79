use crate::mock_server::MockServerFixture;
use anythingllm_client::{ChatChunk, ChatMessage, ChatMode, ChatOptions, ErrorKind};
use futures::StreamExt;
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn blocking_chat_sends_last_message() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .server
        .mock("POST", "/api/v1/workspace/dev/chat")
        .match_body(Matcher::Json(json!({ "message": "And Rust?", "mode": "chat", "temperature": 0.2 })))
        .with_status(200)
        .with_body(
            json!({
                "id": "abc",
                "type": "textResponse",
                "textResponse": "Rust is a systems language.",
                "sources": [{ "title": "rust.md", "text": "..." }],
                "chatId": "c-1",
                "close": true,
                "error": null
            })
            .to_string(),
        )
        .create_async()
        .await;

    let messages = [
        ChatMessage::user("What is Go?"),
        ChatMessage::assistant("A language."),
        ChatMessage::user("And Rust?"),
    ];
    let resp = fixture
        .client()
        .chat()
        .send("dev", &messages, &ChatOptions::new().temperature(0.2))
        .await
        .unwrap();

    assert_eq!(resp.text_response, "Rust is a systems language.");
    assert_eq!(resp.sources.unwrap()[0].title, "rust.md");
    assert_eq!(resp.chat_id.as_deref(), Some("c-1"));
    m.assert_async().await;
}

#[tokio::test]
async fn empty_conversation_never_hits_the_server() {
    let fixture = MockServerFixture::new().await;
    let err = fixture
        .client()
        .chat()
        .send("dev", &[], &ChatOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ValidationFailure { .. }));
}

#[tokio::test]
async fn stream_yields_valid_chunks_in_order() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .mock_event_stream(
            "/workspace/dev/stream-chat",
            &[
                r#"data: {"type":"textResponseChunk","textResponse":"Rust","sources":[]}"#,
                r#"data: {"type":"textResponseChunk","textResponse":"st"#,
                r#"data: {"type":"text","content":" is"}"#,
                "",
                r#"data: {"type":"citation","content":" [1]","metadata":{"doc":"rust.md"}}"#,
                "data: {broken",
                r#"data: {"type":"text","content":" fast"}"#,
                r#"data: {"type":"stop","chatId":"c-9"}"#,
                "data: [DONE]",
            ],
        )
        .await;

    let chunks: Vec<ChatChunk> = fixture
        .client()
        .chat()
        .stream(
            "dev",
            &[ChatMessage::user("Describe Rust")],
            &ChatOptions::new().mode(ChatMode::Query),
        )
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(chunks.len(), 5);
    let text: String = chunks.iter().filter_map(|c| c.text()).collect();
    assert_eq!(text, "Rust is [1] fast");
    assert!(matches!(chunks[2], ChatChunk::Citation { .. }));
    assert_eq!(
        chunks[4],
        ChatChunk::Stop {
            chat_id: Some("c-9".into())
        }
    );
    m.assert_async().await;
}

#[tokio::test]
async fn stream_query_carries_message_and_mode() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .server
        .mock("GET", "/api/v1/workspace/dev/stream-chat")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("message".into(), "hi there".into()),
            Matcher::UrlEncoded("mode".into(), "chat".into()),
        ]))
        .with_status(200)
        .with_body("data: [DONE]\n")
        .create_async()
        .await;

    let chunks: Vec<ChatChunk> = fixture
        .client()
        .chat()
        .stream("dev", &[ChatMessage::user("hi there")], &ChatOptions::default())
        .await
        .unwrap()
        .collect()
        .await;
    assert!(chunks.is_empty());
    m.assert_async().await;
}

#[tokio::test]
async fn stream_open_failure_is_returned_not_streamed() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .server
        .mock("GET", "/api/v1/workspace/dev/stream-chat")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(json!({ "error": "Invalid API Key" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let err = fixture
        .client()
        .chat()
        .stream("dev", &[ChatMessage::user("hi")], &ChatOptions::default())
        .await
        .err()
        .expect("open fails");
    assert_eq!(err.kind, ErrorKind::AuthFailure);
    m.assert_async().await;
}
