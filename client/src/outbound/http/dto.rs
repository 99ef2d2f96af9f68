//! DTOs for the content API's JSON bodies.
//!
//! Response DTOs decode leniently: an optional field with the wrong JSON type
//! is treated as absent rather than failing the whole body, so the domain
//! defaults can take over.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::ports::PostRecord;
use crate::domain::{
    ContactReceipt, Credential, NewAccount, Registration, RegistrationReceipt, Role, TokenGrant,
    UploadedImage, User,
};

#[derive(Debug, Deserialize)]
pub(super) struct TokenDto {
    access_token: String,
    #[serde(default, deserialize_with = "lenient_string")]
    token_type: Option<String>,
}

impl TokenDto {
    pub(super) fn into_grant(self) -> TokenGrant {
        TokenGrant {
            credential: Credential::new(self.access_token),
            token_type: self.token_type.unwrap_or_else(|| "bearer".to_owned()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    username: String,
    #[serde(default, deserialize_with = "lenient_string")]
    role: Option<String>,
}

impl UserDto {
    pub(super) fn into_user(self) -> User {
        User {
            username: self.username,
            role: self.role.as_deref().map(Role::from_server).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RegistrationReceiptDto {
    #[serde(default, deserialize_with = "lenient_string")]
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    username: Option<String>,
}

impl RegistrationReceiptDto {
    pub(super) fn into_receipt(self) -> RegistrationReceipt {
        RegistrationReceipt {
            message: self.message.unwrap_or_default(),
            username: self.username,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PostDto {
    #[serde(deserialize_with = "post_id")]
    id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    content: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    excerpt: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    author: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    date: Option<String>,
    #[serde(default, rename = "readTime", deserialize_with = "lenient_string")]
    read_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    image: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    featured: Option<bool>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    tags: Option<Vec<String>>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    post_type: Option<String>,
}

impl From<PostDto> for PostRecord {
    fn from(dto: PostDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            content: dto.content,
            excerpt: dto.excerpt,
            category: dto.category,
            author: dto.author,
            date: dto.date,
            read_time: dto.read_time,
            image: dto.image,
            featured: dto.featured,
            tags: dto.tags,
            post_type: dto.post_type,
        }
    }
}

/// Decode a post listing one record at a time.
///
/// Records whose id cannot be recovered are skipped with a warning so a single
/// malformed entry does not hide the rest of the listing.
pub(super) fn post_records(values: Vec<Value>) -> Vec<PostRecord> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<PostDto>(value) {
            Ok(dto) => Some(PostRecord::from(dto)),
            Err(error) => {
                warn!(index, %error, "skipping unreadable post in listing");
                None
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
pub(super) struct UploadedImageDto {
    url: String,
}

impl From<UploadedImageDto> for UploadedImage {
    fn from(dto: UploadedImageDto) -> Self {
        Self { url: dto.url }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ContactReceiptDto {
    id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    created_at: Option<String>,
}

impl From<ContactReceiptDto> for ContactReceipt {
    fn from(dto: ContactReceiptDto) -> Self {
        Self {
            id: dto.id,
            created_at: dto.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RegistrationBody<'a> {
    username: &'a str,
    password: &'a str,
    role: Role,
}

impl<'a> From<&'a Registration> for RegistrationBody<'a> {
    fn from(registration: &'a Registration) -> Self {
        Self {
            username: registration.username(),
            password: registration.password(),
            role: registration.role(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NewAccountBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    role: Role,
}

impl<'a> From<&'a NewAccount> for NewAccountBody<'a> {
    fn from(account: &'a NewAccount) -> Self {
        Self {
            username: account.username(),
            email: account.email(),
            password: account.password(),
            role: account.role(),
        }
    }
}

/// Error body shapes the server uses; both fields are optional.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

impl ErrorBodyDto {
    /// First usable message: `detail` (string or validation list), then
    /// `message`.
    pub(super) fn into_message(self) -> Option<String> {
        self.detail
            .as_ref()
            .and_then(detail_message)
            .or_else(|| self.message.as_ref().and_then(non_blank_str))
    }
}

fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(_) => non_blank_str(detail),
        Value::Array(entries) => {
            let parts: Vec<&str> = entries
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(text) => Some(text.as_str()),
                    Value::Object(fields) => fields.get("msg").and_then(Value::as_str),
                    _ => None,
                })
                .filter(|text| !text.trim().is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

/// Keep the string entries of a JSON array, in order.
pub(super) fn string_list(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|value| match value {
            Value::String(text) => Some(text),
            _ => None,
        })
        .collect()
}

fn non_blank_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|text| !text.trim().is_empty())
        .map(str::to_owned)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// Post ids arrive as JSON integers or, from older records, numeric strings.
fn post_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let id = match &value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    id.ok_or_else(|| D::Error::custom(format!("post id {value} is not an integer")))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_bool())
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(entries) => Some(string_list(entries)),
        _ => None,
    })
}
