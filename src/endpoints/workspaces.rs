use crate::client::endpoint::{segment, Operation};
use crate::client::AnythingLlmClient;
use crate::contract::schemas;
use crate::types::{CreateWorkspace, WorkspaceDetail, WorkspaceSummary, WorkspaceUpdate};
use crate::Result;

/// Workspace CRUD.
#[derive(Debug, Clone, Copy)]
pub struct Workspaces<'a> {
    client: &'a AnythingLlmClient,
}

impl<'a> Workspaces<'a> {
    pub(crate) fn new(client: &'a AnythingLlmClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<WorkspaceSummary>> {
        self.client
            .execute(Operation::get("/workspaces"), &schemas::workspace_list())
            .await
    }

    pub async fn create(&self, params: &CreateWorkspace) -> Result<WorkspaceSummary> {
        self.client
            .execute(
                Operation::post("/workspaces/new").json(params),
                &schemas::workspace_created(),
            )
            .await
    }

    pub async fn get(&self, slug: &str) -> Result<WorkspaceDetail> {
        self.client
            .execute(
                Operation::get(format!("/workspace/{}", segment(slug))),
                &schemas::workspace_detail(),
            )
            .await
    }

    pub async fn update(&self, slug: &str, update: &WorkspaceUpdate) -> Result<WorkspaceDetail> {
        self.client
            .execute(
                Operation::post(format!("/workspace/{}/update", segment(slug))).json(update),
                &schemas::workspace_detail(),
            )
            .await
    }

    pub async fn delete(&self, slug: &str) -> Result<()> {
        self.client
            .execute(
                Operation::delete(format!("/workspace/{}", segment(slug))),
                &schemas::workspace_deleted(),
            )
            .await
    }
}
