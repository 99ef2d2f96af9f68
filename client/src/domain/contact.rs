//! Contact form and admin account-creation payloads.

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use super::user::Role;

/// Validation failures for [`ContactMessage`] and [`NewAccount`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// A required field was blank once trimmed.
    MissingField {
        /// Wire name of the field.
        field: &'static str,
    },
    /// The email address has no `@` or nothing on one side of it.
    InvalidEmail,
}

impl fmt::Display for ContactValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "{field} must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
        }
    }
}

impl std::error::Error for ContactValidationError {}

/// Message submitted through the public contact form.
///
/// # Examples
/// ```
/// use content_client::domain::ContactMessage;
///
/// let message = ContactMessage::try_new(
///     "Ada",
///     "ada@example.org",
///     "Partenariat",
///     "Collaboration",
///     "Bonjour !",
/// )
/// .unwrap();
/// assert_eq!(message.email(), "ada@example.org");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    name: String,
    email: String,
    category: String,
    subject: String,
    message: String,
}

impl ContactMessage {
    /// Validate and trim the form fields.
    pub fn try_new(
        name: &str,
        email: &str,
        category: &str,
        subject: &str,
        message: &str,
    ) -> Result<Self, ContactValidationError> {
        Ok(Self {
            name: required("name", name)?,
            email: email_address(email)?,
            category: required("category", category)?,
            subject: required("subject", subject)?,
            message: required("message", message)?,
        })
    }

    /// Sender's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }
}

/// Server acknowledgement of a stored contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactReceipt {
    /// Identifier of the stored message.
    pub id: i64,
    /// Server timestamp, as sent.
    pub created_at: Option<String>,
}

/// Account created by an administrator on someone else's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    username: String,
    email: String,
    password: Zeroizing<String>,
    role: Role,
}

impl NewAccount {
    /// Validate the account fields.
    pub fn try_new(
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Self, ContactValidationError> {
        if password.is_empty() {
            return Err(ContactValidationError::MissingField { field: "password" });
        }
        Ok(Self {
            username: required("username", username)?,
            email: email_address(email)?,
            password: Zeroizing::new(password.to_owned()),
            role,
        })
    }

    /// Account handle.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Account email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Initial password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Account role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

fn required(field: &'static str, raw: &str) -> Result<String, ContactValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ContactValidationError::MissingField { field });
    }
    Ok(trimmed.to_owned())
}

fn email_address(raw: &str) -> Result<String, ContactValidationError> {
    let trimmed = required("email", raw)?;
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(trimmed),
        _ => Err(ContactValidationError::InvalidEmail),
    }
}
