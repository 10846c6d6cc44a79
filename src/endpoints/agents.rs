use crate::client::endpoint::{segment, Operation};
use crate::client::AnythingLlmClient;
use crate::contract::schemas;
use crate::types::{AgentDetail, AgentSummary};
use crate::Result;

/// Workspace agents (read-only).
#[derive(Debug, Clone, Copy)]
pub struct Agents<'a> {
    client: &'a AnythingLlmClient,
}

impl<'a> Agents<'a> {
    pub(crate) fn new(client: &'a AnythingLlmClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, workspace: &str) -> Result<Vec<AgentSummary>> {
        self.client
            .execute(
                Operation::get(format!("/workspace/{}/agents", segment(workspace))),
                &schemas::agent_list(),
            )
            .await
    }

    pub async fn get(&self, workspace: &str, agent_id: &str) -> Result<AgentDetail> {
        self.client
            .execute(
                Operation::get(format!(
                    "/workspace/{}/agent/{}",
                    segment(workspace),
                    segment(agent_id)
                )),
                &schemas::agent_detail(),
            )
            .await
    }
}
