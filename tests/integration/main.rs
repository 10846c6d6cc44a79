//! Integration tests against a mock AnythingLLM HTTP server.

mod mock_server;

mod agents;
mod auth;
mod chat;
mod documents;
mod retries;
mod workspaces;
