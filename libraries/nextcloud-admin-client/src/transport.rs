//! HTTP transport for the administration API.
//!
//! Resource clients describe a request as an [`ApiRequest`] and hand it to a
//! [`Transport`]. The default [`ReqwestTransport`] resolves the path against
//! the server URL, attaches basic auth plus the OCS headers, and returns the
//! raw status and body so the envelope decoder can choose how to parse it.

use crate::error::{ClientError, Result};
use crate::types::Session;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Fixed route prefixes, as path segments relative to the server URL.
pub(crate) mod routes {
    pub const CAPABILITIES: &[&str] = &["ocs", "v1.php", "cloud", "capabilities"];
    pub const USERS: &[&str] = &["ocs", "v1.php", "cloud", "users"];
    pub const GROUPS: &[&str] = &["ocs", "v1.php", "cloud", "groups"];
    pub const GROUP_FOLDERS: &[&str] = &["index.php", "apps", "groupfolders", "folders"];
}

/// A single request against the administration API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Unencoded path segments; the transport percent-encodes each one.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    /// Form-encoded body fields
    pub form: Vec<(String, String)>,
    pub session: Session,
}

impl ApiRequest {
    pub fn new(method: Method, route: &[&str], session: Session) -> Self {
        Self {
            method,
            segments: route.iter().map(|s| (*s).to_string()).collect(),
            query: Vec::new(),
            form: Vec::new(),
            session,
        }
    }

    /// Append one path segment.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((key.into(), value.into()));
        self
    }

    /// Slash-joined path, without percent-encoding.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Value of a form field, if present.
    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw HTTP response, before envelope decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues requests against the server.
///
/// Implementations must not retry; every error goes back to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// Default transport backed by `reqwest`.
pub struct ReqwestTransport {
    http: Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(base_url: Url, timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(format!("nextcloud-admin-client/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self { http, base_url })
    }

    fn resolve(&self, segments: &[String]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let url = self.resolve(&request.segments)?;
        debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .basic_auth(&request.session.username, Some(&request.session.password))
            .header("OCS-APIRequest", "true")
            .header(reqwest::header::ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        let response = builder.send().await.map_err(ClientError::from_transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(ClientError::from_transport)?;

        debug!(status, bytes = body.len(), "Received response");
        Ok(RawResponse { status, body })
    }
}
