use crate::mock_server::{workspace_json, MockServerFixture};
use anythingllm_client::{CreateWorkspace, ErrorKind, ResourceType, WorkspaceUpdate};
use serde_json::json;

#[tokio::test]
async fn create_then_list_contains_workspace() {
    let mut fixture = MockServerFixture::new().await;
    let create = fixture
        .server
        .mock("POST", "/api/v1/workspaces/new")
        .match_body(mockito::Matcher::Json(json!({ "name": "Dev", "slug": "dev-workspace" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "workspace": workspace_json("Dev", "dev-workspace"), "message": null }).to_string())
        .create_async()
        .await;
    let list = fixture
        .mock_json(
            "GET",
            "/workspaces",
            200,
            json!({ "workspaces": [workspace_json("Other", "other"), workspace_json("Dev", "dev-workspace")] }),
            1,
        )
        .await;

    let client = fixture.client();
    let created = client
        .workspaces()
        .create(&CreateWorkspace::new("Dev").slug("dev-workspace"))
        .await
        .unwrap();
    assert_eq!(created.slug, "dev-workspace");

    let all = client.workspaces().list().await.unwrap();
    let dev = all.iter().find(|w| w.slug == "dev-workspace").expect("listed");
    assert_eq!(dev.name, "Dev");

    create.assert_async().await;
    list.assert_async().await;
}

#[tokio::test]
async fn get_accepts_bare_detail() {
    let mut fixture = MockServerFixture::new().await;
    let mut detail = workspace_json("Dev", "dev-workspace");
    detail["settings"] = json!({ "llmProvider": "ollama", "topK": 4, "similarityThreshold": 0.25 });
    let _m = fixture
        .mock_json("GET", "/workspace/dev-workspace", 200, detail, 1)
        .await;

    let ws = fixture.client().workspaces().get("dev-workspace").await.unwrap();
    let settings = ws.settings.unwrap();
    assert_eq!(settings.llm_provider.as_deref(), Some("ollama"));
    assert_eq!(settings.top_k, Some(4));
}

#[tokio::test]
async fn update_posts_partial_body() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .server
        .mock("POST", "/api/v1/workspace/dev-workspace/update")
        .match_body(mockito::Matcher::Json(json!({ "name": "Renamed" })))
        .with_status(200)
        .with_body(json!({ "workspace": workspace_json("Renamed", "dev-workspace") }).to_string())
        .create_async()
        .await;

    let ws = fixture
        .client()
        .workspaces()
        .update("dev-workspace", &WorkspaceUpdate::new().name("Renamed"))
        .await
        .unwrap();
    assert_eq!(ws.name, "Renamed");
    m.assert_async().await;
}

#[tokio::test]
async fn delete_accepts_empty_body() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .server
        .mock("DELETE", "/api/v1/workspace/dev-workspace")
        .with_status(200)
        .create_async()
        .await;

    tokio_test::assert_ok!(fixture.client().workspaces().delete("dev-workspace").await);
    m.assert_async().await;
}

#[tokio::test]
async fn contract_violation_is_validation_failure_with_raw_payload() {
    let mut fixture = MockServerFixture::new().await;
    let bad = json!([{ "name": "Dev", "createdAt": "2025-03-01T12:00:00Z", "documentCount": 0 }]);
    let m = fixture.mock_json("GET", "/workspaces", 200, bad.clone(), 1).await;

    let err = fixture.client().workspaces().list().await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ValidationFailure { .. }));
    assert!(!err.recoverable);
    assert!(!err.violations().is_empty());
    assert_eq!(err.details.as_ref().unwrap()["data"], bad);
    assert_eq!(err.to_json()["code"], "ValidationFailure");
    m.assert_async().await;
}

#[tokio::test]
async fn missing_workspace_is_not_found() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .mock_json("GET", "/workspace/ghost", 404, json!({ "error": "Workspace not found" }), 1)
        .await;

    let err = fixture.client().workspaces().get("ghost").await.unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::ResourceNotFound {
            resource: ResourceType::Workspace
        }
    );
    assert_eq!(err.status, Some(404));
    assert!(!err.suggestion.is_empty());
    m.assert_async().await;
}
