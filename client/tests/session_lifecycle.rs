//! End-to-end behaviour of the client and session over HTTP and the file
//! store.

mod support;

use std::sync::Arc;

use chrono::NaiveDate;
use content_client::domain::ports::{InMemorySessionStore, SessionStore};
use content_client::domain::{
    Credential, DEFAULT_CATEGORIES, NewPost, PostId, PostPatch, Role, SiteStats,
};
use content_client::outbound::FileSessionStore;
use content_client::{AuthEvent, ErrorCode};
use rstest::{fixture, rstest};
use serde_json::json;
use support::{FakePostsServer, FixtureClock, client_for, session_for};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNREACHABLE: &str = "http://127.0.0.1:1";

#[fixture]
fn session_dir() -> TempDir {
    TempDir::new().expect("create session dir")
}

fn file_store(dir: &TempDir) -> Arc<FileSessionStore> {
    let root = camino::Utf8Path::from_path(dir.path()).expect("utf-8 temp path");
    Arc::new(FileSessionStore::open(root).expect("open session store"))
}

fn draft() -> NewPost {
    let mut post = NewPost::new(
        "Cartographie participative",
        "Compte rendu de l'atelier.",
        "Équipe SIG",
        "news",
        NaiveDate::from_ymd_opt(2025, 6, 14).expect("valid date"),
    );
    post.category = "Formation".to_owned();
    post.tags = vec!["osm".to_owned()];
    post
}

#[tokio::test]
async fn listed_posts_are_filled_with_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "Sans détails", "category": "  " },
            { "id": 2, "title": "Complet", "date": "2025-03-02T10:00:00", "tags": "osm" },
            { "id": 3, "title": "Archive", "date": "15 mars 2024" }
        ])))
        .mount(&server)
        .await;
    let client = client_for(&server.uri(), Arc::new(InMemorySessionStore::default()));

    let posts = client.list_posts(None).await;

    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0].category, "Non classé");
    assert_eq!(posts[0].read_time, "5 min");
    assert_eq!(posts[0].date, FixtureClock::today().to_string());
    assert!(posts[0].tags.is_empty());
    assert!(!posts[0].featured);
    assert_eq!(posts[1].date, "2025-03-02T10:00:00");
    assert!(posts[1].tags.is_empty());
    assert_eq!(posts[2].date, "15 mars 2024");
}

#[tokio::test]
async fn unreachable_server_degrades_passive_reads() {
    let client = client_for(UNREACHABLE, Arc::new(InMemorySessionStore::default()));

    assert!(client.list_posts(Some("news")).await.is_empty());
    assert_eq!(client.list_categories().await, DEFAULT_CATEGORIES.to_vec());
    assert!(client.list_tags().await.is_empty());
    assert_eq!(client.fetch_stats().await, SiteStats::default());
}

#[tokio::test]
async fn unreachable_server_fails_mutations() {
    let client = client_for(UNREACHABLE, Arc::new(InMemorySessionStore::default()));

    let err = client.create_post(&draft()).await.expect_err("no server");

    assert_eq!(err.code(), ErrorCode::Transport);
}

#[rstest]
#[tokio::test]
async fn sign_in_persists_the_credential_for_later_runs(session_dir: TempDir) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "tok-admin", "token_type": "bearer" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer tok-admin"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "username": "admin", "role": "admin" })),
        )
        .mount(&server)
        .await;

    let first = session_for(&server.uri(), file_store(&session_dir));
    let user = first.sign_in("admin", "pw").await.expect("sign in");
    assert_eq!(user.role, Role::Admin);
    assert!(first.is_admin());

    let second = session_for(&server.uri(), file_store(&session_dir));
    assert_eq!(second.current_user(), None);
    let restored = second.restore().await.expect("session restored");
    assert_eq!(restored.username, "admin");
    assert_eq!(second.current_user(), Some(restored));
}

#[rstest]
#[tokio::test]
async fn rejected_credential_is_cleared_and_announced(session_dir: TempDir) {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/posts/8"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Token expired" })),
        )
        .mount(&server)
        .await;
    let store = file_store(&session_dir);
    store
        .store(&Credential::new("stale"))
        .expect("seed credential");
    let client = client_for(&server.uri(), Arc::clone(&store)).with_login_path("/connexion");
    let mut events = client.subscribe();

    let err = client
        .delete_post(PostId::new(8))
        .await
        .expect_err("credential rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.to_string(), "Token expired");
    assert!(store.credential().expect("read store").is_none());
    assert!(!session_dir.path().join("token").exists());
    assert_eq!(
        events.try_recv().expect("expiry published"),
        AuthEvent::Expired {
            operation: "delete_post",
            login_path: "/connexion".to_owned(),
        }
    );
}

#[tokio::test]
async fn created_post_echoes_the_submitted_fields() {
    let fake = FakePostsServer::start().await;
    let store = Arc::new(InMemorySessionStore::with_credential(Credential::new("tok")));
    let client = client_for(&fake.uri(), store);

    let created = client.create_post(&draft()).await.expect("post created");

    assert_eq!(created.id, PostId::new(1));
    assert_eq!(created.title, "Cartographie participative");
    assert_eq!(created.category, "Formation");
    assert_eq!(created.read_time, "5 min");
    assert_eq!(created.tags, vec!["osm".to_owned()]);
    assert_eq!(fake.posts.len(), 1);
}

#[tokio::test]
async fn updated_post_reads_back_with_the_new_fields() {
    let fake = FakePostsServer::start().await;
    let store = Arc::new(InMemorySessionStore::with_credential(Credential::new("tok")));
    let client = client_for(&fake.uri(), store);
    let created = client.create_post(&draft()).await.expect("post created");

    let patch = PostPatch {
        title: Some("Carte mise à jour".to_owned()),
        featured: Some(true),
        ..PostPatch::default()
    };
    client
        .update_post(created.id, &patch)
        .await
        .expect("post updated");
    let fetched = client.fetch_post(created.id).await.expect("post fetched");

    assert_eq!(fetched.title, "Carte mise à jour");
    assert!(fetched.featured);
    assert_eq!(fetched.content, created.content);
    assert_eq!(fetched.date, created.date);
}

#[tokio::test]
async fn deleted_post_is_no_longer_found() {
    let fake = FakePostsServer::start().await;
    let client = client_for(&fake.uri(), Arc::new(InMemorySessionStore::default()));
    let created = client.create_post(&draft()).await.expect("post created");

    client.delete_post(created.id).await.expect("post deleted");
    let err = client.fetch_post(created.id).await.expect_err("gone");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.to_string(), "Article non trouvé");
    assert!(client.list_posts(None).await.is_empty());
}

#[rstest]
#[tokio::test]
async fn sign_out_forgets_the_user_even_when_logout_fails(session_dir: TempDir) {
    let store = file_store(&session_dir);
    store
        .store(&Credential::new("tok"))
        .expect("seed credential");
    let session = session_for(UNREACHABLE, Arc::clone(&store));
    let mut events = session.client().subscribe();

    session.sign_out().await;

    assert!(store.credential().expect("read store").is_none());
    assert_eq!(session.current_user(), None);
    assert_eq!(events.try_recv().expect("event"), AuthEvent::SignedOut);
}
