use crate::mock_server::{document_json, MockServerFixture};
use anythingllm_client::{DocumentType, ErrorKind, FileUpload, UploadOptions};
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn upload_file_sends_multipart_and_returns_first_document() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .server
        .mock("POST", "/api/v1/document/upload")
        .match_header("content-type", Matcher::Regex("^multipart/form-data; boundary=".to_string()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="notes.txt""#.to_string()),
            Matcher::Regex("hello world".to_string()),
            Matcher::Regex(r#"name="title""#.to_string()),
            Matcher::Regex(r#"\["a","b"\]"#.to_string()),
            Matcher::Regex(r#"name="addToWorkspaces""#.to_string()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "error": null,
                "documents": [document_json("notes"), document_json("other")]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let doc = fixture
        .client()
        .documents()
        .upload_file(
            "dev",
            FileUpload::new("notes.txt", b"hello world".to_vec()),
            &UploadOptions::new()
                .title("Notes")
                .tags(vec!["a".into(), "b".into()]),
        )
        .await
        .unwrap();

    assert_eq!(doc.title, "notes");
    assert_eq!(doc.doc_type, DocumentType::File);
    m.assert_async().await;
}

#[tokio::test]
async fn upload_without_documents_is_validation_failure() {
    let mut fixture = MockServerFixture::new().await;
    let _m = fixture
        .mock_json("POST", "/document/upload", 200, json!({ "success": false }), 1)
        .await;

    let err = fixture
        .client()
        .documents()
        .upload_file("dev", FileUpload::new("a.md", b"# a".to_vec()), &UploadOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ValidationFailure { .. }));
    assert_eq!(err.violations()[0].message, "No document returned");
}

#[tokio::test]
async fn web_link_returns_success_flag() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .server
        .mock("POST", "/api/v1/document/process-link")
        .match_body(Matcher::PartialJson(json!({ "link": "https://example.com/post" })))
        .with_status(200)
        .with_body(json!({ "success": true, "error": null }).to_string())
        .create_async()
        .await;

    let ok = fixture
        .client()
        .documents()
        .upload_web_link("dev", "https://example.com/post")
        .await
        .unwrap();
    assert!(ok);
    m.assert_async().await;
}

#[tokio::test]
async fn list_unwraps_local_files() {
    let mut fixture = MockServerFixture::new().await;
    let _m = fixture
        .mock_json(
            "GET",
            "/workspace/dev/documents",
            200,
            json!({ "localFiles": { "name": "documents", "type": "folder", "items": [document_json("a"), document_json("b")] } }),
            1,
        )
        .await;

    let docs = fixture.client().documents().list("dev").await.unwrap();
    let titles: Vec<&str> = docs.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b"]);
}

#[tokio::test]
async fn search_sends_query_mode_and_default_top_k() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .server
        .mock("POST", "/api/v1/workspace/dev/chat")
        .match_body(Matcher::Json(json!({ "message": "borrow checker", "mode": "query", "topK": 3 })))
        .with_status(200)
        .with_body(
            json!({
                "textResponse": "...",
                "sources": [
                    { "content": "Ownership rules", "score": 0.91, "documentId": "d1" },
                    { "content": "Lifetimes", "score": 0.74 }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let hits = fixture
        .client()
        .documents()
        .search("dev", "borrow checker", None)
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].document_id.as_deref(), Some("d1"));
    assert!(hits[1].metadata.is_empty());
    m.assert_async().await;
}
