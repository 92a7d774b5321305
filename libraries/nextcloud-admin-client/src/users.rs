//! User provisioning operations.

use crate::envelope;
use crate::error::{ClientError, Result};
use crate::transport::{routes, ApiRequest, Transport};
use crate::types::{GroupList, Session, User, UserList};
use crate::update::{apply_update, UserUpdate};
use reqwest::Method;
use tracing::{debug, warn};

/// User client for the provisioning API.
pub struct UsersClient<'a> {
    transport: &'a dyn Transport,
    session: &'a Session,
}

impl<'a> UsersClient<'a> {
    pub(crate) fn new(transport: &'a dyn Transport, session: &'a Session) -> Self {
        Self { transport, session }
    }

    fn request(&self, method: Method) -> ApiRequest {
        ApiRequest::new(method, routes::USERS, self.session.clone())
    }

    /// Request scoped to one user, optionally with a sub-route.
    fn user_request(&self, method: Method, name: &str, route: Option<&str>) -> Result<ApiRequest> {
        require_name(name)?;
        let request = self.request(method).segment(name);
        Ok(match route {
            Some(route) => request.segment(route),
            None => request,
        })
    }

    /// Send a user-scoped request and check only the envelope status.
    async fn send(&self, request: ApiRequest) -> Result<()> {
        debug!(method = %request.method, path = %request.path(), "User request");
        let response = self.transport.execute(request).await?;
        envelope::decode_unit(&response)
    }

    /// List all user ids.
    pub async fn list(&self) -> Result<Vec<String>> {
        let request = self.request(Method::GET);
        debug!(path = %request.path(), "Listing users");

        let response = self.transport.execute(request).await?;
        let list: UserList = envelope::decode(&response)?;

        debug!(count = list.users.len(), "Listed users");
        Ok(list.users)
    }

    /// Return the user ids matching the search string.
    pub async fn search(&self, search: &str) -> Result<Vec<String>> {
        let request = self.request(Method::GET).query("search", search);
        debug!(search = %search, "Searching users");

        let response = self.transport.execute(request).await?;
        let list: UserList = envelope::decode(&response)?;
        Ok(list.users)
    }

    /// Get the details of a single user.
    ///
    /// The server's user payload is not always valid for a strict decoder
    /// (quoted booleans, `[]` quota), so this goes through the repair path.
    pub async fn get(&self, name: &str) -> Result<User> {
        let request = self.user_request(Method::GET, name, None)?;
        debug!(user = %name, "Fetching user");

        let response = self.transport.execute(request).await?;
        envelope::decode_repaired(&response)
    }

    /// Create a user, then apply `profile` if given.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        profile: Option<&UserUpdate>,
    ) -> Result<()> {
        require_name(username)?;
        let request = self
            .request(Method::POST)
            .form("userid", username)
            .form("password", password);
        self.send(request).await?;
        debug!(user = %username, "User created");

        match profile {
            Some(profile) => self.update(username, profile).await,
            None => Ok(()),
        }
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        self.send(self.user_request(Method::DELETE, name, None)?).await
    }

    pub async fn enable(&self, name: &str) -> Result<()> {
        self.send(self.user_request(Method::PUT, name, Some("enable"))?)
            .await
    }

    pub async fn disable(&self, name: &str) -> Result<()> {
        self.send(self.user_request(Method::PUT, name, Some("disable"))?)
            .await
    }

    /// (Re)send the welcome mail. Fails if the user has no email configured.
    pub async fn send_welcome_email(&self, name: &str) -> Result<()> {
        self.send(self.user_request(Method::POST, name, Some("welcome"))?)
            .await
    }

    /// Push every populated field of `update` concurrently.
    ///
    /// Returns `ClientError::Update` listing each failed field. Fields not
    /// listed may or may not have been applied.
    pub async fn update(&self, name: &str, update: &UserUpdate) -> Result<()> {
        require_name(name)?;
        debug!(user = %name, fields = update.changes().len(), "Updating user");

        let result = apply_update(update, move |field, value| {
            self.set_attribute(name, field.key(), value)
        })
        .await;

        if let Err(ClientError::Update(e)) = &result {
            warn!(user = %name, failed = ?e.fields(), "User update partially failed");
        }
        result
    }

    pub async fn update_email(&self, name: &str, email: &str) -> Result<()> {
        self.set_attribute(name, "email", email.to_string()).await
    }

    pub async fn update_display_name(&self, name: &str, display_name: &str) -> Result<()> {
        self.set_attribute(name, "displayname", display_name.to_string())
            .await
    }

    pub async fn update_phone(&self, name: &str, phone: &str) -> Result<()> {
        self.set_attribute(name, "phone", phone.to_string()).await
    }

    pub async fn update_address(&self, name: &str, address: &str) -> Result<()> {
        self.set_attribute(name, "address", address.to_string())
            .await
    }

    pub async fn update_website(&self, name: &str, website: &str) -> Result<()> {
        self.set_attribute(name, "website", website.to_string())
            .await
    }

    pub async fn update_twitter(&self, name: &str, twitter: &str) -> Result<()> {
        self.set_attribute(name, "twitter", twitter.to_string())
            .await
    }

    pub async fn update_password(&self, name: &str, password: &str) -> Result<()> {
        self.set_attribute(name, "password", password.to_string())
            .await
    }

    /// Set the user's quota in bytes.
    pub async fn update_quota(&self, name: &str, quota: i64) -> Result<()> {
        self.set_attribute(name, "quota", quota.to_string()).await
    }

    pub async fn update_language(&self, name: &str, language: &str) -> Result<()> {
        self.set_attribute(name, "language", language.to_string())
            .await
    }

    /// List the groups the user belongs to.
    pub async fn groups(&self, name: &str) -> Result<Vec<String>> {
        let request = self.user_request(Method::GET, name, Some("groups"))?;
        let response = self.transport.execute(request).await?;
        let list: GroupList = envelope::decode(&response)?;
        Ok(list.groups)
    }

    pub async fn add_to_group(&self, name: &str, group: &str) -> Result<()> {
        self.group_membership(Method::POST, name, "groups", group)
            .await
    }

    pub async fn remove_from_group(&self, name: &str, group: &str) -> Result<()> {
        self.group_membership(Method::DELETE, name, "groups", group)
            .await
    }

    /// Make the user a subadmin of `group`.
    pub async fn promote_subadmin(&self, name: &str, group: &str) -> Result<()> {
        self.group_membership(Method::POST, name, "subadmins", group)
            .await
    }

    pub async fn demote_subadmin(&self, name: &str, group: &str) -> Result<()> {
        self.group_membership(Method::DELETE, name, "subadmins", group)
            .await
    }

    /// List the groups the user is subadmin of.
    pub async fn subadmin_groups(&self, name: &str) -> Result<Vec<String>> {
        let request = self.user_request(Method::GET, name, Some("subadmins"))?;
        let response = self.transport.execute(request).await?;
        envelope::decode(&response)
    }

    async fn group_membership(
        &self,
        method: Method,
        name: &str,
        route: &str,
        group: &str,
    ) -> Result<()> {
        if group.is_empty() {
            return Err(ClientError::InvalidArgument(
                "group cannot be empty".to_string(),
            ));
        }
        let request = self
            .user_request(method, name, Some(route))?
            .form("groupid", group);
        self.send(request).await
    }

    async fn set_attribute(&self, name: &str, key: &str, value: String) -> Result<()> {
        let request = self
            .user_request(Method::PUT, name, None)?
            .form("key", key)
            .form("value", value);
        debug!(user = %name, key = %key, "Setting user attribute");
        self.send(request).await
    }
}

fn require_name(name: &str) -> Result<()> {
    if name.is_empty() {
        Err(ClientError::InvalidArgument(
            "user name cannot be empty".to_string(),
        ))
    } else {
        Ok(())
    }
}
