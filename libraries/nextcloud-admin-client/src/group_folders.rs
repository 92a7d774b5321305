//! Group folder operations (groupfolders app).

use crate::envelope;
use crate::error::{ClientError, Result};
use crate::transport::{routes, ApiRequest, Transport};
use crate::types::{CreatedFolder, GroupFolder, Session, SharePermission};
use reqwest::Method;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Group folder client.
pub struct GroupFoldersClient<'a> {
    transport: &'a dyn Transport,
    session: &'a Session,
}

impl<'a> GroupFoldersClient<'a> {
    pub(crate) fn new(transport: &'a dyn Transport, session: &'a Session) -> Self {
        Self { transport, session }
    }

    fn request(&self, method: Method) -> ApiRequest {
        ApiRequest::new(method, routes::GROUP_FOLDERS, self.session.clone())
    }

    fn folder_request(&self, method: Method, id: u64) -> ApiRequest {
        self.request(method).segment(id.to_string())
    }

    async fn send(&self, request: ApiRequest) -> Result<()> {
        debug!(method = %request.method, path = %request.path(), "Group folder request");
        let response = self.transport.execute(request).await?;
        envelope::decode_unit(&response)
    }

    /// List all group folders, keyed by id.
    pub async fn list(&self) -> Result<BTreeMap<u64, GroupFolder>> {
        let response = self.transport.execute(self.request(Method::GET)).await?;
        let data: serde_json::Value = envelope::decode(&response)?;

        let folders = match data {
            // PHP encodes an empty map as an empty array
            serde_json::Value::Array(items) if items.is_empty() => BTreeMap::new(),
            serde_json::Value::Object(map) => {
                let mut folders = BTreeMap::new();
                for (_, value) in map {
                    let folder: GroupFolder = serde_json::from_value(value).map_err(|e| {
                        ClientError::ParseError(format!("Failed to parse group folder: {}", e))
                    })?;
                    folders.insert(folder.id, folder);
                }
                folders
            }
            other => {
                return Err(ClientError::ParseError(format!(
                    "Unexpected group folder list payload: {}",
                    other
                )))
            }
        };

        debug!(count = folders.len(), "Listed group folders");
        Ok(folders)
    }

    pub async fn get(&self, id: u64) -> Result<GroupFolder> {
        debug!(folder_id = id, "Fetching group folder");
        let response = self
            .transport
            .execute(self.folder_request(Method::GET, id))
            .await?;
        envelope::decode(&response)
    }

    /// Create a group folder and return its id.
    pub async fn create(&self, mount_point: &str) -> Result<u64> {
        require_mount_point(mount_point)?;
        let request = self.request(Method::POST).form("mountpoint", mount_point);
        let response = self.transport.execute(request).await?;
        let created: CreatedFolder = envelope::decode(&response)?;

        debug!(folder_id = created.id, mount_point = %mount_point, "Group folder created");
        Ok(created.id)
    }

    pub async fn rename(&self, id: u64, mount_point: &str) -> Result<()> {
        require_mount_point(mount_point)?;
        let request = self
            .folder_request(Method::POST, id)
            .segment("mountpoint")
            .form("mountpoint", mount_point);
        self.send(request).await
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        self.send(self.folder_request(Method::DELETE, id)).await
    }

    /// Give `group` access to the folder.
    pub async fn add_group(&self, id: u64, group: &str) -> Result<()> {
        require_group(group)?;
        let request = self
            .folder_request(Method::POST, id)
            .segment("groups")
            .form("group", group);
        self.send(request).await
    }

    pub async fn remove_group(&self, id: u64, group: &str) -> Result<()> {
        require_group(group)?;
        let request = self
            .folder_request(Method::DELETE, id)
            .segment("groups")
            .segment(group);
        self.send(request).await
    }

    pub async fn set_group_permissions(
        &self,
        id: u64,
        group: &str,
        permissions: SharePermission,
    ) -> Result<()> {
        require_group(group)?;
        let request = self
            .folder_request(Method::POST, id)
            .segment("groups")
            .segment(group)
            .form("permissions", permissions.bits().to_string());
        self.send(request).await
    }

    /// Set the folder quota in bytes (negative values are server sentinels).
    pub async fn set_quota(&self, id: u64, quota: i64) -> Result<()> {
        let request = self
            .folder_request(Method::POST, id)
            .segment("quota")
            .form("quota", quota.to_string());
        self.send(request).await
    }
}

fn require_mount_point(mount_point: &str) -> Result<()> {
    if mount_point.is_empty() {
        return Err(ClientError::InvalidArgument(
            "mount point cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn require_group(group: &str) -> Result<()> {
    if group.is_empty() {
        return Err(ClientError::InvalidArgument(
            "group cannot be empty".to_string(),
        ));
    }
    Ok(())
}

// =============================================================================
// Legacy `groups` shapes
// =============================================================================

/// Newer servers nest the permission next to display metadata.
#[derive(Deserialize)]
struct NestedGroupEntry {
    permissions: u32,
}

/// Decode the `groups` map of a group folder.
///
/// Tries the flat `{gid: permissions}` shape first, then the nested
/// `{gid: {"permissions": ..}}` shape, and accepts `[]` as an empty map.
pub(crate) fn deserialize_groups<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, SharePermission>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    if let Ok(flat) = serde_json::from_value::<HashMap<String, u32>>(value.clone()) {
        return Ok(flat
            .into_iter()
            .map(|(group, bits)| (group, SharePermission::from(bits)))
            .collect());
    }

    if let Ok(nested) = serde_json::from_value::<HashMap<String, NestedGroupEntry>>(value.clone()) {
        return Ok(nested
            .into_iter()
            .map(|(group, entry)| (group, SharePermission::from(entry.permissions)))
            .collect());
    }

    match value {
        serde_json::Value::Array(items) if items.is_empty() => Ok(BTreeMap::new()),
        serde_json::Value::Null => Ok(BTreeMap::new()),
        other => Err(de::Error::custom(format!(
            "unrecognised group folder groups shape: {}",
            other
        ))),
    }
}
