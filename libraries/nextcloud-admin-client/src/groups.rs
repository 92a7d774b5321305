//! Group provisioning operations.

use crate::envelope;
use crate::error::{ClientError, Result};
use crate::transport::{routes, ApiRequest, Transport};
use crate::types::{GroupList, Session, UserList};
use reqwest::Method;
use tracing::debug;

/// Group client for the provisioning API.
pub struct GroupsClient<'a> {
    transport: &'a dyn Transport,
    session: &'a Session,
}

impl<'a> GroupsClient<'a> {
    pub(crate) fn new(transport: &'a dyn Transport, session: &'a Session) -> Self {
        Self { transport, session }
    }

    fn request(&self, method: Method) -> ApiRequest {
        ApiRequest::new(method, routes::GROUPS, self.session.clone())
    }

    fn group_path(&self, method: Method, name: &str) -> Result<ApiRequest> {
        require_group_name(name)?;
        Ok(self.request(method).segment(name))
    }

    /// Shared path for group mutations: decode as a group-list envelope and
    /// surface the meta error.
    async fn group_request(&self, request: ApiRequest) -> Result<()> {
        debug!(method = %request.method, path = %request.path(), "Group request");
        let response = self.transport.execute(request).await?;
        envelope::decode_unit(&response)
    }

    /// List all group ids.
    pub async fn list(&self) -> Result<Vec<String>> {
        let response = self.transport.execute(self.request(Method::GET)).await?;
        let list: GroupList = envelope::decode(&response)?;

        debug!(count = list.groups.len(), "Listed groups");
        Ok(list.groups)
    }

    /// Return the group ids matching the search string.
    pub async fn search(&self, search: &str) -> Result<Vec<String>> {
        let request = self.request(Method::GET).query("search", search);
        let response = self.transport.execute(request).await?;
        let list: GroupList = envelope::decode(&response)?;
        Ok(list.groups)
    }

    /// List the members of a group.
    pub async fn members(&self, name: &str) -> Result<Vec<String>> {
        let request = self.group_path(Method::GET, name)?;
        debug!(group = %name, "Listing group members");

        let response = self.transport.execute(request).await?;
        let list: UserList = envelope::decode(&response)?;
        Ok(list.users)
    }

    pub async fn create(&self, name: &str) -> Result<()> {
        require_group_name(name)?;
        self.group_request(self.request(Method::POST).form("groupid", name))
            .await
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        self.group_request(self.group_path(Method::DELETE, name)?)
            .await
    }

    /// List the subadmins of a group.
    pub async fn subadmins(&self, name: &str) -> Result<Vec<String>> {
        let request = self.group_path(Method::GET, name)?.segment("subadmins");
        let response = self.transport.execute(request).await?;
        envelope::decode(&response)
    }
}

fn require_group_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ClientError::InvalidArgument(
            "group name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
