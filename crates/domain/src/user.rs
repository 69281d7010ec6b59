//! User accounts and the write access they grant.

use serde::{Deserialize, Serialize};

use crate::id::RecordId;
use crate::time::Timestamp;

/// An account of the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub date_joined: Option<Timestamp>,
    #[serde(default)]
    pub device_count: u32,
}

impl User {
    /// Role label shown in the user list.
    #[must_use]
    pub fn role_label(&self) -> &'static str {
        role_label(self.is_staff)
    }

    /// Activity label shown in the user list.
    #[must_use]
    pub fn activity_label(&self) -> &'static str {
        activity_label(self.is_active)
    }
}

/// Role label for an `is_staff` flag.
#[must_use]
pub fn role_label(is_staff: bool) -> &'static str {
    if is_staff { "Admin" } else { "User" }
}

/// Activity label for an `is_active` flag.
#[must_use]
pub fn activity_label(is_active: bool) -> &'static str {
    if is_active { "Active" } else { "Inactive" }
}

/// Write privilege of the current session.
///
/// Computed by the caller and handed to each view model; view models never
/// look it up themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Access {
    /// May read records only.
    #[default]
    ReadOnly,
    /// May create, edit and delete records.
    Staff,
}

impl Access {
    /// Derive the access level of a signed-in user.
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        if user.is_staff { Self::Staff } else { Self::ReadOnly }
    }

    /// Whether mutations are allowed.
    #[must_use]
    pub fn can_write(self) -> bool {
        matches!(self, Self::Staff)
    }
}

/// Access/refresh token pair returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Username/password pair sent to the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}
