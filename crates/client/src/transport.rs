//! Transport seam
//!
//! [`Transport`] is where an [`ApiRequest`] leaves the process.
//! [`HttpTransport`] sends it over HTTP with `reqwest`, joining the path to
//! the configured base URL and attaching the bearer credential from the
//! injected [`AuthContext`].

use crate::auth::AuthContext;
use crate::config::ClientConfig;
use crate::request::{ApiRequest, ApiResponse, Method, PartContent, RequestBody};
use estate_core::{AdminError, AdminResult, Validatable};
use reqwest::Client;
use reqwest::multipart::{Form, Part as FormPart};
use std::future::Future;

/// Sends requests and returns raw responses
///
/// Implementations report only failures that prevented a response
/// (`AdminError::Transport`); non-2xx statuses are returned as responses.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> impl Future<Output = AdminResult<ApiResponse>> + Send;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    auth: AuthContext,
}

impl HttpTransport {
    /// Create a transport from configuration and credential
    pub fn new(config: &ClientConfig, auth: AuthContext) -> AdminResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AdminError::transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            auth,
        })
    }

    /// The credential used by this transport
    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Full URL for a path
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> AdminResult<ApiResponse> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(authorization) = self.auth.authorization() {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => {
                let mut form = Form::new();
                for part in parts {
                    form = match part.content {
                        PartContent::Text(text) => form.text(part.name, text),
                        PartContent::File(file) => {
                            let file_part = FormPart::bytes(file.bytes)
                                .file_name(file.file_name)
                                .mime_str(&file.mime)
                                .map_err(|e| {
                                    AdminError::invalid_value(
                                        &part.name,
                                        format!("bad MIME type '{}': {e}", file.mime),
                                    )
                                })?;
                            form.part(part.name, file_part)
                        }
                    };
                }
                builder.multipart(form)
            }
        };

        let response = builder.send().await.map_err(describe_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(describe_error)?;
        Ok(ApiResponse { status, body })
    }
}

/// Join a base URL and a path with exactly one `/` between them
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn describe_error(e: reqwest::Error) -> AdminError {
    if e.is_timeout() {
        AdminError::transport(format!("request timed out: {e}"))
    } else if e.is_connect() {
        AdminError::transport(format!("connection failed: {e}"))
    } else {
        AdminError::transport(e.to_string())
    }
}
