//! User domain types.

use serde::{Deserialize, Serialize};

use ecofinds_core::{Email, Password, UserId};

/// A marketplace user as seen by the rest of the application.
///
/// This is also the session record: it never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Sign-in email, unique across the registry.
    pub email: Email,
    /// Public handle, unique across the registry.
    pub username: String,
    /// Display name, empty until the user fills in their profile.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    /// Avatar image URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Name shown on listings: the display name, or the username if unset.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}

/// A registry entry: the user plus their credential.
///
/// Serialized flat, so the password sits alongside the user fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    #[serde(flatten)]
    pub user: User,
    pub password: Password,
}

impl RegisteredUser {
    /// Whether this entry matches a login attempt exactly.
    #[must_use]
    pub fn matches_credentials(&self, email: &str, password: &str) -> bool {
        self.user.email.matches(email) && self.password.matches(password)
    }
}

/// Partial profile edit. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.avatar.is_none()
    }

    /// Merge the present fields into `user`.
    ///
    /// `email` must already be validated by the caller; the raw string field
    /// is ignored in favour of it.
    pub(crate) fn apply(&self, user: &mut User, email: Option<&Email>) {
        if let Some(email) = email {
            user.email = email.clone();
        }
        if let Some(username) = &self.username {
            user.username.clone_from(username);
        }
        if let Some(name) = &self.name {
            user.name.clone_from(name);
        }
        if let Some(phone) = &self.phone {
            user.phone.clone_from(phone);
        }
        if let Some(address) = &self.address {
            user.address.clone_from(address);
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = Some(avatar.clone());
        }
    }
}
