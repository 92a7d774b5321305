//! Types for administration API requests and responses.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::BitOr;

/// Credentials attached to every request (basic auth).
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    /// Password or app password
    pub password: String,
}

impl Session {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Capabilities
// =============================================================================

/// Result of the login probe.
#[derive(Debug, Clone, Deserialize)]
pub struct Capabilities {
    pub version: ServerVersion,
    #[serde(default)]
    pub capabilities: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
    pub string: String,
    #[serde(default)]
    pub edition: String,
}

// =============================================================================
// User Types
// =============================================================================

/// A user as returned by the single-user endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub quota: UserQuota,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "displayname", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// Groups this user is subadmin of
    #[serde(default)]
    pub subadmin: Vec<String>,
    /// Milliseconds since epoch, 0 if never logged in
    #[serde(rename = "lastLogin", default)]
    pub last_login: i64,
    #[serde(default)]
    pub backend: Option<String>,
}

/// Storage quota of a user, in bytes.
///
/// `quota` is negative for the server's special values (e.g. -3 = unlimited).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UserQuota {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub free: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub used: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total: i64,
    #[serde(default)]
    pub relative: f64,
    #[serde(default, deserialize_with = "quota_limit")]
    pub quota: i64,
}

impl UserQuota {
    /// Quota value the server uses for "no limit".
    pub const UNLIMITED: i64 = -3;
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserList {
    #[serde(default)]
    pub users: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupList {
    #[serde(default)]
    pub groups: Vec<String>,
}

// =============================================================================
// Group Folder Types
// =============================================================================

/// Permission bitmask a group holds on a group folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharePermission(u32);

impl SharePermission {
    pub const NONE: Self = Self(0);
    pub const READ: Self = Self(1);
    pub const UPDATE: Self = Self(2);
    pub const CREATE: Self = Self(4);
    pub const DELETE: Self = Self(8);
    pub const SHARE: Self = Self(16);
    pub const ALL: Self = Self(31);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl From<u32> for SharePermission {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl From<SharePermission> for u32 {
    fn from(permission: SharePermission) -> Self {
        permission.0
    }
}

impl BitOr for SharePermission {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for SharePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A folder shared with one or more groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupFolder {
    #[serde(deserialize_with = "lenient_u64")]
    pub id: u64,
    pub mount_point: String,
    #[serde(deserialize_with = "crate::group_folders::deserialize_groups", default)]
    pub groups: BTreeMap<String, SharePermission>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub quota: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub size: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedFolder {
    #[serde(deserialize_with = "lenient_u64")]
    pub id: u64,
}

// =============================================================================
// Lenient number decoding
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Str(String),
}

/// Accepts a number or a numeric string.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Int(v) => Ok(v),
        NumberOrString::Float(v) => Ok(v as i64),
        NumberOrString::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected integer, got {:?}", s))),
    }
}

/// Like [`lenient_i64`], but maps non-numeric sentinels such as `"none"`
/// to [`UserQuota::UNLIMITED`].
fn quota_limit<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Int(v) => Ok(v),
        NumberOrString::Float(v) => Ok(v as i64),
        NumberOrString::Str(s) => Ok(s.trim().parse().unwrap_or(UserQuota::UNLIMITED)),
    }
}

pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_i64(deserializer)?;
    u64::try_from(value).map_err(|_| de::Error::custom(format!("expected unsigned id, got {}", value)))
}
