use crate::client::endpoint::{segment, FormSpec, Operation};
use crate::client::AnythingLlmClient;
use crate::contract::schemas;
use crate::types::{Document, FileUpload, SearchResult, UploadOptions};
use crate::Result;
use serde_json::json;

pub const DEFAULT_SEARCH_TOP_K: u32 = 3;

/// Document ingestion, listing and retrieval.
#[derive(Debug, Clone, Copy)]
pub struct Documents<'a> {
    client: &'a AnythingLlmClient,
}

impl<'a> Documents<'a> {
    pub(crate) fn new(client: &'a AnythingLlmClient) -> Self {
        Self { client }
    }

    /// Upload a file and embed it into `workspace`.
    pub async fn upload_file(
        &self,
        workspace: &str,
        file: FileUpload,
        options: &UploadOptions,
    ) -> Result<Document> {
        let mut form = FormSpec::new().file("file", file);
        if let Some(title) = &options.title {
            form = form.text("title", title.clone());
        }
        if let Some(tags) = &options.tags {
            form = form.text("tags", json!(tags).to_string());
        }
        form = form.text("addToWorkspaces", workspace);

        self.client
            .execute(
                Operation::post("/document/upload").multipart(form),
                &schemas::document_uploaded(),
            )
            .await
    }

    /// Scrape `url` and embed the result into `workspace`. Returns the server's success flag.
    pub async fn upload_web_link(&self, workspace: &str, url: &str) -> Result<bool> {
        self.client
            .execute(
                Operation::post("/document/process-link")
                    .json(&json!({ "link": url, "addToWorkspaces": workspace })),
                &schemas::link_processed(),
            )
            .await
    }

    pub async fn list(&self, workspace: &str) -> Result<Vec<Document>> {
        self.client
            .execute(
                Operation::get(format!("/workspace/{}/documents", segment(workspace))),
                &schemas::document_list(),
            )
            .await
    }

    /// Similarity search through the workspace's query mode. `top_k` defaults to 3.
    pub async fn search(
        &self,
        workspace: &str,
        query: &str,
        top_k: Option<u32>,
    ) -> Result<Vec<SearchResult>> {
        let body = json!({
            "message": query,
            "mode": "query",
            "topK": top_k.unwrap_or(DEFAULT_SEARCH_TOP_K),
        });
        // Read-only despite the POST.
        let op = Operation::post(format!("/workspace/{}/chat", segment(workspace)))
            .json(&body)
            .idempotent();
        self.client.execute(op, &schemas::search_results()).await
    }
}
