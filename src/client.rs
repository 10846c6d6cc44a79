//! Client for the AnythingLLM REST surface.
//!
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod config;
pub mod core;
pub mod endpoint;
pub mod error_classification;
mod execution;
pub mod policy;
mod validation;

pub use builder::AnythingLlmClientBuilder;
pub use config::ClientConfig;
pub use core::AnythingLlmClient;
pub use endpoint::{FormSpec, Operation, RequestBody};
pub use error_classification::{map_failure, RawFailure};
pub use policy::RetryPolicy;
