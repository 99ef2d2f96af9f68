//! Signed-in user model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account role reported by the server.
///
/// The role only gates which affordances a collaborator shows; the server
/// enforces authorisation on its own. Unknown roles are treated as
/// [`Role::User`] so an unexpected value never grants admin affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May manage posts and accounts.
    Admin,
    /// Regular account.
    #[default]
    User,
}

impl Role {
    /// Interpret a server-supplied role string.
    ///
    /// # Examples
    /// ```
    /// use content_client::domain::Role;
    ///
    /// assert_eq!(Role::from_server("ADMIN"), Role::Admin);
    /// assert_eq!(Role::from_server("public"), Role::User);
    /// ```
    #[must_use]
    pub fn from_server(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::User
        }
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The account behind the current credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique handle.
    pub username: String,
    /// Advisory role.
    pub role: Role,
}

impl User {
    /// Whether admin-only affordances should be shown.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}
