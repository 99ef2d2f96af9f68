//! Reqwest-backed content API adapter.
//!
//! This adapter owns transport details only: URL building, bearer and
//! tracing headers, timeout and HTTP error mapping, and JSON decoding into
//! port records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{Instrument, debug, debug_span};
use uuid::Uuid;

use super::dto::{
    ContactReceiptDto, ErrorBodyDto, NewAccountBody, PostDto, RegistrationBody,
    RegistrationReceiptDto, TokenDto, UploadedImageDto, UserDto, post_records, string_list,
};
use crate::domain::ports::{ContentApi, ContentApiError, PostRecord};
use crate::domain::{
    ContactMessage, ContactReceipt, Credential, ImageUpload, LoginCredentials, NewAccount,
    NewPost, PostId, PostPatch, Registration, RegistrationReceipt, SiteStats, TokenGrant,
    UploadedImage, User,
};

const DEFAULT_USER_AGENT: &str = concat!("content-client/", env!("CARGO_PKG_VERSION"));
const TRACE_ID_HEADER: &str = "trace-id";

/// Request body variants the API uses.
enum Payload<'a> {
    Empty,
    Query(Vec<(&'static str, String)>),
    Form(Vec<(&'static str, &'a str)>),
    Json(Value),
    Multipart(Form),
}

/// Content API adapter performing one HTTP request per port call.
#[derive(Debug, Clone)]
pub struct HttpContentApi {
    client: Client,
    base_url: Url,
    user_agent: String,
}

impl HttpContentApi {
    /// Build an adapter with an explicit request timeout.
    ///
    /// Paths are resolved relative to `base_url`, so a base of
    /// `https://host/api` reaches `https://host/api/posts`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        })
    }

    /// Replace the `User-Agent` header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Base URL every path is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ContentApiError> {
        self.base_url
            .join(path)
            .map_err(|error| ContentApiError::transport(format!("invalid request URL: {error}")))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        credential: Option<Credential>,
        payload: Payload<'_>,
    ) -> Result<Vec<u8>, ContentApiError> {
        let url = self.endpoint(path)?;
        let trace_id = Uuid::new_v4();
        let span = debug_span!("content_api_request", %method, path, %trace_id);

        async move {
            let mut request = self
                .client
                .request(method, url)
                .header(USER_AGENT, self.user_agent.as_str())
                .header(TRACE_ID_HEADER, trace_id.to_string())
                .header(ACCEPT, "application/json");
            if let Some(bearer) = &credential {
                request = request.bearer_auth(bearer.expose());
            }
            request = match payload {
                Payload::Empty => request,
                Payload::Query(pairs) => request.query(&pairs),
                Payload::Form(pairs) => request.form(&pairs),
                Payload::Json(body) => request.json(&body),
                Payload::Multipart(form) => request.multipart(form),
            };

            let response = request.send().await.map_err(|error| map_transport_error(&error))?;
            let status = response.status();
            let body = response.bytes().await.map_err(|error| map_transport_error(&error))?;
            debug!(status = status.as_u16(), bytes = body.len(), "response received");
            if !status.is_success() {
                return Err(map_status_error(status, body.as_ref()));
            }
            Ok(body.to_vec())
        }
        .instrument(span)
        .await
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn json_payload<T: Serialize + ?Sized>(body: &T) -> Result<Payload<'static>, ContentApiError> {
    serde_json::to_value(body)
        .map(Payload::Json)
        .map_err(|error| ContentApiError::decode(format!("failed to encode request: {error}")))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ContentApiError> {
    serde_json::from_slice(body).map_err(|error| {
        ContentApiError::decode(format!(
            "unexpected response body ({error}): {}",
            body_preview(body)
        ))
    })
}

fn decode_post(body: &[u8]) -> Result<PostRecord, ContentApiError> {
    decode::<PostDto>(body).map(PostRecord::from)
}

#[async_trait]
impl ContentApi for HttpContentApi {
    async fn request_token(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<TokenGrant, ContentApiError> {
        let form = vec![
            ("username", credentials.username()),
            ("password", credentials.password()),
        ];
        let body = self
            .send(Method::POST, "auth/token", None, Payload::Form(form))
            .await?;
        decode::<TokenDto>(&body).map(TokenDto::into_grant)
    }

    async fn refresh_token(
        &self,
        credential: Option<Credential>,
    ) -> Result<TokenGrant, ContentApiError> {
        let body = self
            .send(Method::POST, "refresh", credential, Payload::Empty)
            .await?;
        decode::<TokenDto>(&body).map(TokenDto::into_grant)
    }

    async fn end_session(&self, credential: Option<Credential>) -> Result<(), ContentApiError> {
        self.send(Method::POST, "logout", credential, Payload::Empty)
            .await
            .map(drop)
    }

    async fn register(
        &self,
        registration: &Registration,
    ) -> Result<RegistrationReceipt, ContentApiError> {
        let payload = json_payload(&RegistrationBody::from(registration))?;
        let body = self.send(Method::POST, "register", None, payload).await?;
        decode::<RegistrationReceiptDto>(&body).map(RegistrationReceiptDto::into_receipt)
    }

    async fn current_user(&self, credential: Credential) -> Result<User, ContentApiError> {
        let body = self
            .send(Method::GET, "me", Some(credential), Payload::Empty)
            .await?;
        decode::<UserDto>(&body).map(UserDto::into_user)
    }

    async fn list_posts(
        &self,
        post_type: Option<String>,
        credential: Option<Credential>,
    ) -> Result<Vec<PostRecord>, ContentApiError> {
        let payload =
            post_type.map_or(Payload::Empty, |kind| Payload::Query(vec![("type", kind)]));
        let body = self.send(Method::GET, "posts", credential, payload).await?;
        let posts: Vec<Value> = decode(&body)?;
        Ok(post_records(posts))
    }

    async fn fetch_post(
        &self,
        id: PostId,
        credential: Option<Credential>,
    ) -> Result<PostRecord, ContentApiError> {
        let path = format!("posts/{id}");
        let body = self
            .send(Method::GET, &path, credential, Payload::Empty)
            .await?;
        decode_post(&body)
    }

    async fn create_post(
        &self,
        post: &NewPost,
        credential: Option<Credential>,
    ) -> Result<PostRecord, ContentApiError> {
        let payload = json_payload(post)?;
        let body = self.send(Method::POST, "posts", credential, payload).await?;
        decode_post(&body)
    }

    async fn update_post(
        &self,
        id: PostId,
        patch: &PostPatch,
        credential: Option<Credential>,
    ) -> Result<PostRecord, ContentApiError> {
        let path = format!("posts/{id}");
        let payload = json_payload(patch)?;
        let body = self.send(Method::PUT, &path, credential, payload).await?;
        decode_post(&body)
    }

    async fn delete_post(
        &self,
        id: PostId,
        credential: Option<Credential>,
    ) -> Result<(), ContentApiError> {
        let path = format!("posts/{id}");
        self.send(Method::DELETE, &path, credential, Payload::Empty)
            .await
            .map(drop)
    }

    async fn upload_image(
        &self,
        upload: &ImageUpload,
        credential: Option<Credential>,
    ) -> Result<UploadedImage, ContentApiError> {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|error| map_transport_error(&error))?;
        let form = Form::new().part("file", part);
        let body = self
            .send(Method::POST, "upload", credential, Payload::Multipart(form))
            .await?;
        decode::<UploadedImageDto>(&body).map(UploadedImage::from)
    }

    async fn list_categories(
        &self,
        credential: Option<Credential>,
    ) -> Result<Vec<String>, ContentApiError> {
        let body = self
            .send(Method::GET, "categories", credential, Payload::Empty)
            .await?;
        decode::<Vec<Value>>(&body).map(string_list)
    }

    async fn list_tags(
        &self,
        credential: Option<Credential>,
    ) -> Result<Vec<String>, ContentApiError> {
        let body = self
            .send(Method::GET, "tags", credential, Payload::Empty)
            .await?;
        decode::<Vec<Value>>(&body).map(string_list)
    }

    async fn fetch_stats(
        &self,
        credential: Option<Credential>,
    ) -> Result<SiteStats, ContentApiError> {
        let body = self
            .send(Method::GET, "stats", credential, Payload::Empty)
            .await?;
        decode(&body)
    }

    async fn submit_contact(
        &self,
        message: &ContactMessage,
        credential: Option<Credential>,
    ) -> Result<ContactReceipt, ContentApiError> {
        let payload = json_payload(message)?;
        let body = self
            .send(Method::POST, "contact/", credential, payload)
            .await?;
        decode::<ContactReceiptDto>(&body).map(ContactReceipt::from)
    }

    async fn create_account(
        &self,
        account: &NewAccount,
        credential: Option<Credential>,
    ) -> Result<(), ContentApiError> {
        let payload = json_payload(&NewAccountBody::from(account))?;
        self.send(Method::POST, "users/", credential, payload)
            .await
            .map(drop)
    }
}

fn map_transport_error(error: &reqwest::Error) -> ContentApiError {
    if error.is_timeout() {
        ContentApiError::timeout(error.to_string())
    } else {
        ContentApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ContentApiError {
    let message = serde_json::from_slice::<ErrorBodyDto>(body)
        .ok()
        .and_then(ErrorBodyDto::into_message)
        .unwrap_or_else(|| format!("request failed with status code {}", status.as_u16()));

    match status {
        StatusCode::UNAUTHORIZED => ContentApiError::unauthorized(message),
        StatusCode::FORBIDDEN => ContentApiError::forbidden(message),
        StatusCode::NOT_FOUND => ContentApiError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ContentApiError::timeout(message)
        }
        _ => ContentApiError::rejected(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
