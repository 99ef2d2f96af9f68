//! Authentication primitives: login credentials, bearer credentials, and
//! registration payloads.
//!
//! Keep raw input parsing at the edge by exposing constructors that validate
//! string inputs before a service talks to a port.

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

use super::user::Role;

/// Why a username/password pair was refused before reaching the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginValidationError {
    /// The username was empty or only whitespace.
    #[error("a username is required")]
    MissingUsername,
    /// The password was empty.
    #[error("a password is required")]
    MissingPassword,
}

/// Username and password for the token endpoint.
///
/// Surrounding whitespace is stripped from the username. The password is
/// kept exactly as typed and zeroed on drop.
///
/// ```
/// use content_client::domain::LoginCredentials;
///
/// let login = LoginCredentials::try_from_parts("  editeur ", " mot de passe ").unwrap();
/// assert_eq!(login.username(), "editeur");
/// assert_eq!(login.password(), " mot de passe ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate a login form.
    ///
    /// # Errors
    ///
    /// Returns [`LoginValidationError`] when either field is missing.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(LoginValidationError::MissingUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::MissingPassword);
        }
        Ok(Self {
            username: trimmed.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username with surrounding whitespace removed.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password exactly as typed.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Opaque bearer credential.
///
/// The value is forwarded verbatim and never parsed. It is wiped from
/// memory on drop and redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    /// Wrap a raw bearer string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrow the raw bearer string for an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Result of a successful token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    /// Bearer credential to attach to later requests.
    pub credential: Credential,
    /// Token scheme reported by the server, normally `bearer`.
    pub token_type: String,
}

/// Validated self-registration request.
///
/// # Examples
/// ```
/// use content_client::domain::{Registration, Role};
///
/// let registration = Registration::try_from_parts("editor", "s3cret", Role::User).unwrap();
/// assert_eq!(registration.username(), "editor");
/// assert_eq!(registration.role(), Role::User);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: LoginCredentials,
    role: Role,
}

impl Registration {
    /// Construct a registration, reusing the login validation rules.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Self, LoginValidationError> {
        Ok(Self {
            credentials: LoginCredentials::try_from_parts(username, password)?,
            role,
        })
    }

    /// Requested username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    /// Requested password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.credentials.password()
    }

    /// Requested role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

/// Confirmation returned by the registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    /// Server confirmation message.
    pub message: String,
    /// Username the server registered, when echoed.
    pub username: Option<String>,
}
