//! Nextcloud Admin Client
//!
//! HTTP client library for the Nextcloud provisioning API (users, groups)
//! and the groupfolders app API.
//!
//! # Features
//!
//! - **Authentication**: basic auth session, verified against the capabilities endpoint
//! - **Users**: create, delete, enable/disable, attribute updates, group and subadmin membership
//! - **Bulk updates**: concurrent per-field updates with aggregated failures
//! - **Groups**: list, search, create, delete, members, subadmins
//! - **Group folders**: create, rename, delete, group permissions, quota
//!
//! # Example
//!
//! ```ignore
//! use nextcloud_admin_client::{ClientConfig, NextcloudClient, UserUpdate};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NextcloudClient::new(ClientConfig::load()?)?;
//!     let caps = client.login("admin", "app-password").await?;
//!     println!("Connected to Nextcloud {}", caps.version.string);
//!
//!     let users = client.users().await?;
//!     users.client().create("jane", "s3cret-pass", None).await?;
//!
//!     let profile = UserUpdate {
//!         email: Some("jane@example.com".into()),
//!         display_name: Some("Jane Doe".into()),
//!         ..Default::default()
//!     };
//!     users.client().update("jane", &profile).await?;
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod config;
pub mod envelope;
mod error;
mod group_folders;
mod groups;
pub mod transport;
mod types;
mod update;
mod users;

// Re-export main types
pub use client::{
    GroupFoldersClientHandle, GroupsClientHandle, NextcloudClient, UsersClientHandle,
};
pub use crate::config::ClientConfig;
pub use error::{ApiError, ClientError, Result};
pub use transport::{ApiRequest, RawResponse, ReqwestTransport, Transport};
pub use types::{
    Capabilities, GroupFolder, ServerVersion, Session, SharePermission, User, UserQuota,
};
pub use update::{FieldFailure, UpdateError, UserField, UserUpdate};

// Re-export sub-clients for direct use if needed
pub use group_folders::GroupFoldersClient;
pub use groups::GroupsClient;
pub use users::UsersClient;
