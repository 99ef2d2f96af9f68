//! Shared helpers for content client integration tests.
//!
//! Integration tests compile as separate crates, so the fake server pieces
//! and client wiring live here and each test file pulls them in with
//! `mod support;`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use content_client::domain::ports::SessionStore;
use content_client::outbound::HttpContentApi;
use content_client::{AuthSession, ContentClient};
use mockable::Clock;
use reqwest::Url;
use serde_json::{Map, Value, json};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Clock pinned to 2025-09-01 so defaulted dates are predictable.
pub struct FixtureClock;

impl FixtureClock {
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid fixture date")
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 1, 8, 30, 0)
            .single()
            .expect("valid fixture timestamp")
    }
}

/// Adapter pointed at `base` with a short timeout.
pub fn http_api(base: &str) -> HttpContentApi {
    let url = Url::parse(base).expect("valid base URL");
    HttpContentApi::new(url, Duration::from_secs(2)).expect("build HTTP client")
}

/// Client wired to `base` and the given store.
pub fn client_for<S: SessionStore>(base: &str, store: Arc<S>) -> ContentClient<HttpContentApi, S> {
    ContentClient::new(Arc::new(http_api(base)), store, Arc::new(FixtureClock))
}

/// Session wired to `base` and the given store.
pub fn session_for<S: SessionStore>(base: &str, store: Arc<S>) -> AuthSession<HttpContentApi, S> {
    AuthSession::new(client_for(base, store))
}

/// Posts held by [`FakePostsServer`], keyed by identifier.
#[derive(Clone, Default)]
pub struct PostTable {
    rows: Arc<Mutex<BTreeMap<i64, Value>>>,
}

impl PostTable {
    fn with_rows<T>(&self, f: impl FnOnce(&mut BTreeMap<i64, Value>) -> T) -> T {
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rows)
    }

    /// Number of stored posts.
    pub fn len(&self) -> usize {
        self.with_rows(|rows| rows.len())
    }
}

fn post_id(request: &Request) -> Option<i64> {
    request
        .url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|raw| raw.parse().ok())
}

fn json_object(request: &Request) -> Option<Map<String, Value>> {
    match serde_json::from_slice::<Value>(&request.body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({ "detail": "Post not found" }))
}

struct CreatePost(PostTable);

impl Respond for CreatePost {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Some(mut fields) = json_object(request) else {
            return ResponseTemplate::new(422).set_body_json(json!({ "detail": "invalid body" }));
        };
        let stored = self.0.with_rows(|rows| {
            let id = rows.keys().next_back().map_or(1, |last| last + 1);
            fields.insert("id".to_owned(), json!(id));
            let post = Value::Object(fields);
            rows.insert(id, post.clone());
            post
        });
        ResponseTemplate::new(201).set_body_json(stored)
    }
}

struct UpdatePost(PostTable);

impl Respond for UpdatePost {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let (Some(id), Some(changes)) = (post_id(request), json_object(request)) else {
            return not_found();
        };
        let updated = self.0.with_rows(|rows| {
            let post = rows.get_mut(&id)?.as_object_mut()?;
            post.extend(changes);
            Some(Value::Object(post.clone()))
        });
        updated.map_or_else(not_found, |post| ResponseTemplate::new(200).set_body_json(post))
    }
}

struct FetchPost(PostTable);

impl Respond for FetchPost {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let found = post_id(request).and_then(|id| self.0.with_rows(|rows| rows.get(&id).cloned()));
        found.map_or_else(not_found, |post| ResponseTemplate::new(200).set_body_json(post))
    }
}

struct ListPosts(PostTable);

impl Respond for ListPosts {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let posts: Vec<Value> = self.0.with_rows(|rows| rows.values().cloned().collect());
        ResponseTemplate::new(200).set_body_json(posts)
    }
}

struct DeletePost(PostTable);

impl Respond for DeletePost {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let removed = post_id(request).and_then(|id| self.0.with_rows(|rows| rows.remove(&id)));
        match removed {
            Some(_) => ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" })),
            None => not_found(),
        }
    }
}

/// Mock server that keeps posts in memory across requests.
pub struct FakePostsServer {
    pub server: MockServer,
    pub posts: PostTable,
}

impl FakePostsServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let posts = PostTable::default();
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ListPosts(posts.clone()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/posts"))
            .respond_with(CreatePost(posts.clone()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/posts/\d+$"))
            .respond_with(FetchPost(posts.clone()))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path_regex(r"^/posts/\d+$"))
            .respond_with(UpdatePost(posts.clone()))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path_regex(r"^/posts/\d+$"))
            .respond_with(DeletePost(posts.clone()))
            .mount(&server)
            .await;
        Self { server, posts }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }
}
