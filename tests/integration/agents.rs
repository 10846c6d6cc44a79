use crate::mock_server::MockServerFixture;
use anythingllm_client::{ErrorKind, ResourceType};
use serde_json::json;

fn agent_json(id: &str, active: bool) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Researcher",
        "description": "Searches the workspace",
        "active": active,
        "config": { "tools": ["rag"] }
    })
}

#[tokio::test]
async fn lists_and_gets_agents() {
    let mut fixture = MockServerFixture::new().await;
    let list = fixture
        .mock_json(
            "GET",
            "/workspace/dev-workspace/agents",
            200,
            json!([agent_json("a1", true), agent_json("a2", false)]),
            1,
        )
        .await;
    let get = fixture
        .mock_json(
            "GET",
            "/workspace/dev-workspace/agent/a1",
            200,
            agent_json("a1", true),
            1,
        )
        .await;

    let client = fixture.client();
    let agents = client.agents().list("dev-workspace").await.unwrap();
    assert_eq!(agents.len(), 2);
    assert!(!agents[1].active);

    let agent = client.agents().get("dev-workspace", "a1").await.unwrap();
    assert_eq!(agent.name, "Researcher");
    assert_eq!(agent.config.unwrap()["tools"][0], "rag");

    list.assert_async().await;
    get.assert_async().await;
}

#[tokio::test]
async fn missing_agent_is_not_found() {
    let mut fixture = MockServerFixture::new().await;
    let m = fixture
        .mock_json(
            "GET",
            "/workspace/dev-workspace/agent/ghost",
            404,
            json!({ "error": "Agent not found" }),
            1,
        )
        .await;

    let err = fixture
        .client()
        .agents()
        .get("dev-workspace", "ghost")
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::ResourceNotFound {
            resource: ResourceType::Agent
        }
    );
    assert!(!err.recoverable);
    m.assert_async().await;
}
