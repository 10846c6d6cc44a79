//! Operation descriptors: what one logical call sends.

use crate::error::DomainError;
use crate::types::FileUpload;
use crate::Result;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// One multipart field.
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Text { name: String, value: String },
    File { name: String, file: FileUpload },
}

/// Multipart body description. Kept as plain data so every attempt can rebuild the
/// `reqwest` form, which is consumed on send.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSpec {
    pub fields: Vec<FormField>,
}

impl FormSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(FormField::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(mut self, name: impl Into<String>, file: FileUpload) -> Self {
        self.fields.push(FormField::File {
            name: name.into(),
            file,
        });
        self
    }

    pub(crate) fn to_form(&self) -> std::result::Result<reqwest::multipart::Form, reqwest::Error> {
        let mut form = reqwest::multipart::Form::new();
        for field in &self.fields {
            form = match field {
                FormField::Text { name, value } => form.text(name.clone(), value.clone()),
                FormField::File { name, file } => {
                    let mut part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
                        .file_name(file.file_name.clone());
                    if let Some(mime) = &file.mime {
                        part = part.mime_str(mime)?;
                    }
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    None,
    Json(Value),
    Multipart(FormSpec),
    /// The body failed to serialize; the call fails before anything is sent.
    Unserializable(String),
}

pub(crate) fn unserializable(reason: &str) -> DomainError {
    DomainError::client_unexpected(format!("Request body could not be serialized: {}", reason))
}

/// Method, path (relative to the versioned API root), body and retry eligibility of a call.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    pub query: Vec<(String, String)>,
    /// Safe to repeat even though the method is not GET.
    pub idempotent: bool,
}

impl Operation {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::None,
            query: Vec::new(),
            idempotent: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<B: Serialize>(mut self, body: &B) -> Self {
        self.body = match serde_json::to_value(body) {
            Ok(value) => RequestBody::Json(value),
            Err(e) => RequestBody::Unserializable(e.to_string()),
        };
        self
    }

    pub fn multipart(mut self, form: FormSpec) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn idempotent(mut self) -> Self {
        self.idempotent = true;
        self
    }

    /// Fails with `ClientUnexpected` if the operation cannot be sent as built.
    pub(crate) fn ready(&self) -> Result<()> {
        match &self.body {
            RequestBody::Unserializable(reason) => Err(unserializable(reason)),
            _ => Ok(()),
        }
    }

    /// GET calls, and calls marked idempotent, may be retried.
    pub fn is_retry_eligible(&self) -> bool {
        self.method == Method::GET || self.idempotent
    }
}

/// Percent-encode one path segment (slugs, ids).
pub(crate) fn segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
