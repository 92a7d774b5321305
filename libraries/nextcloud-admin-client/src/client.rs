//! Main Nextcloud admin client.

use crate::auth::AuthClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::group_folders::GroupFoldersClient;
use crate::groups::GroupsClient;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Capabilities, Session};
use crate::users::UsersClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;
use url::Url;

/// Main client for the Nextcloud administration API.
///
/// The client owns the session. Resource handles (`users()`, `groups()`,
/// `group_folders()`) can only be obtained while a session exists, and each
/// handle keeps its own copy of it.
///
/// # Example
///
/// ```ignore
/// use nextcloud_admin_client::{ClientConfig, NextcloudClient};
///
/// let client = NextcloudClient::new(ClientConfig::new("https://cloud.example.com"))?;
/// client.login("admin", "app-password").await?;
///
/// let users = client.users().await?;
/// for id in users.client().list().await? {
///     println!("{}", id);
/// }
/// ```
pub struct NextcloudClient {
    transport: Arc<dyn Transport>,
    url: String,
    session: Arc<RwLock<Option<Session>>>,
}

impl NextcloudClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let url = normalize_url(&config.url)?;
        let base = Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let transport = ReqwestTransport::new(
            base,
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.connect_timeout_secs),
        )?;

        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client that sends requests through `transport`.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let url = normalize_url(&config.url)?;
        config.validate()?;

        let session = match (config.username, config.password) {
            (Some(username), Some(password)) => Some(Session::new(username, password)),
            _ => None,
        };

        Ok(Self {
            transport,
            url,
            session: Arc::new(RwLock::new(session)),
        })
    }

    /// Get the server URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Check if the client holds a session.
    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Login with username and password (or app password).
    ///
    /// On success the session is stored for subsequent requests. On failure
    /// any previous session is left as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<Capabilities> {
        let candidate = Session::new(username, password);
        let capabilities = AuthClient::new(self.transport.as_ref())
            .login(&candidate)
            .await?;

        *self.session.write().await = Some(candidate);
        Ok(capabilities)
    }

    /// Set credentials directly, without probing the server.
    pub async fn set_credentials(&self, username: impl Into<String>, password: impl Into<String>) {
        *self.session.write().await = Some(Session::new(username, password));
    }

    /// Clear the stored session.
    pub async fn logout(&self) {
        *self.session.write().await = None;
        info!("Logged out");
    }

    async fn current_session(&self) -> Result<Session> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(ClientError::Unauthorized)
    }

    /// Get a handle for user operations.
    ///
    /// Returns `ClientError::Unauthorized` if not logged in.
    pub async fn users(&self) -> Result<UsersClientHandle> {
        Ok(UsersClientHandle {
            transport: self.transport.clone(),
            session: self.current_session().await?,
        })
    }

    /// Get a handle for group operations.
    ///
    /// Returns `ClientError::Unauthorized` if not logged in.
    pub async fn groups(&self) -> Result<GroupsClientHandle> {
        Ok(GroupsClientHandle {
            transport: self.transport.clone(),
            session: self.current_session().await?,
        })
    }

    /// Get a handle for group folder operations.
    ///
    /// Returns `ClientError::Unauthorized` if not logged in.
    pub async fn group_folders(&self) -> Result<GroupFoldersClientHandle> {
        Ok(GroupFoldersClientHandle {
            transport: self.transport.clone(),
            session: self.current_session().await?,
        })
    }
}

fn normalize_url(url: &str) -> Result<String> {
    if url.is_empty() {
        return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let url = url.trim_end_matches('/').to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }
    Ok(url)
}

/// Handle for user operations.
///
/// This is returned by `NextcloudClient::users()`.
pub struct UsersClientHandle {
    transport: Arc<dyn Transport>,
    session: Session,
}

impl UsersClientHandle {
    /// Get the users client.
    pub fn client(&self) -> UsersClient<'_> {
        UsersClient::new(self.transport.as_ref(), &self.session)
    }
}

/// Handle for group operations.
pub struct GroupsClientHandle {
    transport: Arc<dyn Transport>,
    session: Session,
}

impl GroupsClientHandle {
    /// Get the groups client.
    pub fn client(&self) -> GroupsClient<'_> {
        GroupsClient::new(self.transport.as_ref(), &self.session)
    }
}

/// Handle for group folder operations.
pub struct GroupFoldersClientHandle {
    transport: Arc<dyn Transport>,
    session: Session,
}

impl GroupFoldersClientHandle {
    /// Get the group folders client.
    pub fn client(&self) -> GroupFoldersClient<'_> {
        GroupFoldersClient::new(self.transport.as_ref(), &self.session)
    }
}
