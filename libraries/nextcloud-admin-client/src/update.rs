//! Bulk user updates.
//!
//! A [`UserUpdate`] is split into one `key`/`value` attribute request per
//! populated field. All requests run concurrently against the same user and
//! every failure is collected into an [`UpdateError`]. Siblings are never
//! cancelled when one field fails, and nothing records which fields did
//! succeed: a non-empty error means the remote user may be partially updated.

use crate::error::{ClientError, Result};
use crate::types::User;
use futures_util::future::join_all;
use std::fmt;
use std::future::Future;

/// A user attribute that can be set through the bulk update path.
///
/// Quota, enabled state, group membership and language have dedicated
/// operations and are deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserField {
    DisplayName,
    Email,
    Phone,
    Address,
    Website,
    Twitter,
    Password,
}

impl UserField {
    pub const ALL: [UserField; 7] = [
        UserField::DisplayName,
        UserField::Email,
        UserField::Phone,
        UserField::Address,
        UserField::Website,
        UserField::Twitter,
        UserField::Password,
    ];

    /// Attribute key understood by the server.
    pub fn key(&self) -> &'static str {
        match self {
            UserField::DisplayName => "displayname",
            UserField::Email => "email",
            UserField::Phone => "phone",
            UserField::Address => "address",
            UserField::Website => "website",
            UserField::Twitter => "twitter",
            UserField::Password => "password",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Profile fields to push to the server. `None` and empty values are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub password: Option<String>,
}

impl UserUpdate {
    pub fn get(&self, field: UserField) -> Option<&str> {
        let value = match field {
            UserField::DisplayName => &self.display_name,
            UserField::Email => &self.email,
            UserField::Phone => &self.phone,
            UserField::Address => &self.address,
            UserField::Website => &self.website,
            UserField::Twitter => &self.twitter,
            UserField::Password => &self.password,
        };
        value.as_deref()
    }

    /// Fields that will produce a request, in `UserField::ALL` order.
    pub fn changes(&self) -> Vec<(UserField, &str)> {
        UserField::ALL
            .iter()
            .filter_map(|field| {
                self.get(*field)
                    .filter(|value| !value.is_empty())
                    .map(|value| (*field, value))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.changes().is_empty()
    }
}

impl From<&User> for UserUpdate {
    fn from(user: &User) -> Self {
        Self {
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            website: user.website.clone(),
            twitter: user.twitter.clone(),
            password: None,
        }
    }
}

/// One field that failed to update.
#[derive(Debug)]
pub struct FieldFailure {
    pub field: UserField,
    pub error: ClientError,
}

/// Aggregate of per-field failures. Empty means every field was applied.
#[derive(Debug, Default)]
pub struct UpdateError {
    failures: Vec<FieldFailure>,
}

impl UpdateError {
    pub fn new(mut failures: Vec<FieldFailure>) -> Self {
        failures.sort_by_key(|f| f.field);
        Self { failures }
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }

    /// Names of the failed fields, sorted.
    pub fn fields(&self) -> Vec<UserField> {
        self.failures.iter().map(|f| f.field).collect()
    }

    /// `Ok(())` for an empty aggregate, otherwise the aggregate as an error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ClientError::Update(self))
        }
    }
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to update {} field(s)", self.failures.len())?;
        for (i, failure) in self.failures.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}: {}", sep, failure.field, failure.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for UpdateError {}

/// Run `set` once per populated field, concurrently, and aggregate the failures.
///
/// `set` receives the attribute key and value and performs one request.
pub(crate) async fn apply_update<F, Fut>(update: &UserUpdate, set: F) -> Result<()>
where
    F: Fn(UserField, String) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let tasks = update.changes().into_iter().map(|(field, value)| {
        let request = set(field, value.to_string());
        async move { request.await.err().map(|error| FieldFailure { field, error }) }
    });

    let failures: Vec<FieldFailure> = join_all(tasks).await.into_iter().flatten().collect();
    UpdateError::new(failures).into_result()
}
