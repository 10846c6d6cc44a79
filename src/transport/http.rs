use crate::client::config::ClientConfig;
use crate::client::endpoint::{unserializable, Operation, RequestBody};
use crate::client::error_classification::RawFailure;
use crate::error::DomainError;
use crate::{BoxStream, Result};
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Thin reqwest wrapper: versioned API root, bearer credential, per-attempt request id.
///
/// Every failure comes back as a [`RawFailure`]; classification happens upstream.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    api_root: String,
    api_key: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        // No client-wide timeout: streaming bodies may outlive it. Each call applies its own.
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|e| DomainError::client_unexpected(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_root: config.api_root(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn request(
        &self,
        op: &Operation,
        request_id: &str,
    ) -> std::result::Result<reqwest::RequestBuilder, RawFailure> {
        let url = format!("{}{}", self.api_root, op.path);
        let mut req = self
            .client
            .request(op.method.clone(), &url)
            .bearer_auth(&self.api_key)
            .header("x-request-id", request_id);

        if !op.query.is_empty() {
            req = req.query(&op.query);
        }

        req = match &op.body {
            RequestBody::None => req,
            RequestBody::Json(body) => req.json(body),
            RequestBody::Multipart(form) => req.multipart(form.to_form()?),
            RequestBody::Unserializable(reason) => return Err(unserializable(reason).into()),
        };
        Ok(req)
    }

    /// Send one attempt and return the parsed JSON body. An empty body reads as `null`; a
    /// non-JSON body reads as a JSON string so the contract can reject it.
    pub async fn send_json(
        &self,
        op: &Operation,
        request_id: &str,
    ) -> std::result::Result<Value, RawFailure> {
        debug!(method = %op.method, path = op.path.as_str(), request_id, "sending request");
        let resp = self
            .request(op, request_id)?
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        let retry_after = retry_after_secs(resp.headers());
        let bytes = resp.bytes().await?;
        let body = parse_body(&bytes);

        if status.is_success() {
            Ok(body)
        } else {
            Err(RawFailure::Http {
                status: status.as_u16(),
                body,
                retry_after,
            })
        }
    }

    /// Send one attempt and return the response body as a byte stream once headers arrive.
    ///
    /// The configured timeout bounds the wait for headers only.
    pub async fn send_stream(
        &self,
        op: &Operation,
        request_id: &str,
    ) -> std::result::Result<BoxStream<'static, std::result::Result<Bytes, RawFailure>>, RawFailure>
    {
        debug!(method = %op.method, path = op.path.as_str(), request_id, "opening stream");
        let req = self
            .request(op, request_id)?
            .header("accept", "text/event-stream");

        let resp = tokio::time::timeout(self.timeout, req.send())
            .await
            .map_err(|_| {
                RawFailure::Timeout(format!("timeout of {}ms exceeded", self.timeout.as_millis()))
            })??;

        let status = resp.status();
        if !status.is_success() {
            let retry_after = retry_after_secs(resp.headers());
            let bytes = resp.bytes().await?;
            return Err(RawFailure::Http {
                status: status.as_u16(),
                body: parse_body(&bytes),
                retry_after,
            });
        }

        Ok(Box::pin(resp.bytes_stream().map(|r| r.map_err(RawFailure::from))))
    }
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// `Retry-After: <seconds>`; the HTTP-date form is not supported.
fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
