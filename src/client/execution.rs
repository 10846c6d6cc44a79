//! Request execution: one logical call through transport, contract and retry policy.

use crate::client::core::AnythingLlmClient;
use crate::client::endpoint::Operation;
use crate::client::error_classification::{map_failure, RawFailure};
use crate::client::policy::RetryPolicy;
use crate::contract::ResponseContract;
use crate::{BoxStream, Result};
use bytes::Bytes;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

impl AnythingLlmClient {
    /// Policy for `op`: mutating calls run once unless marked idempotent.
    fn policy_for(&self, op: &Operation) -> RetryPolicy {
        if op.is_retry_eligible() {
            self.retry
        } else {
            RetryPolicy {
                max_retries: 0,
                ..self.retry
            }
        }
    }

    /// Execute `op` and canonicalise its response with `contract`.
    ///
    /// Every failure, including a contract mismatch, is returned as a classified
    /// [`DomainError`](crate::DomainError).
    pub async fn execute<T: 'static>(
        &self,
        op: Operation,
        contract: &ResponseContract<T>,
    ) -> Result<T> {
        op.ready()?;
        let policy = self.policy_for(&op);
        let start = Instant::now();
        let op = &op;

        let result = policy
            .run(|attempt| async move {
                let request_id = Uuid::new_v4().to_string();
                debug!(
                    method = %op.method,
                    path = op.path.as_str(),
                    attempt,
                    request_id = request_id.as_str(),
                    "attempt"
                );
                let raw = self
                    .transport
                    .send_json(op, &request_id)
                    .await
                    .map_err(map_failure)?;

                match contract.validate(&raw) {
                    Ok(value) => {
                        if self.config.debug {
                            info!(
                                path = op.path.as_str(),
                                contract = contract.name(),
                                payload = %raw,
                                "response"
                            );
                        }
                        Ok(value)
                    }
                    Err(violations) => Err(map_failure(RawFailure::Contract { violations, raw })),
                }
            })
            .await;

        if let Err(e) = &result {
            info!(
                method = %op.method,
                path = op.path.as_str(),
                error_code = e.code(),
                http_status = ?e.status,
                duration_ms = start.elapsed().as_millis() as u64,
                "request failed"
            );
        }
        result
    }

    /// Open a streaming response for `op`. Opening follows the same retry rules as
    /// [`execute`](Self::execute); failures after the stream is open are left to the reader.
    pub(crate) async fn open_stream(
        &self,
        op: Operation,
    ) -> Result<BoxStream<'static, std::result::Result<Bytes, RawFailure>>> {
        op.ready()?;
        let policy = self.policy_for(&op);
        let start = Instant::now();
        let op = &op;

        let result = policy
            .run(|attempt| async move {
                let request_id = Uuid::new_v4().to_string();
                debug!(
                    method = %op.method,
                    path = op.path.as_str(),
                    attempt,
                    request_id = request_id.as_str(),
                    "stream attempt"
                );
                self.transport
                    .send_stream(op, &request_id)
                    .await
                    .map_err(map_failure)
            })
            .await;

        if let Err(e) = &result {
            info!(
                path = op.path.as_str(),
                error_code = e.code(),
                http_status = ?e.status,
                duration_ms = start.elapsed().as_millis() as u64,
                "stream open failed"
            );
        }
        result
    }
}
