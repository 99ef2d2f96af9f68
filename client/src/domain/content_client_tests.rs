//! Tests for the content client service.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    InMemorySessionStore, MockContentApi, MockSessionStore, PostRecord, SessionStoreError,
};
use crate::domain::{
    DEFAULT_CATEGORIES, DEFAULT_READ_TIME, ErrorCode, Role, UNCATEGORISED,
};

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 1, 7, 45, 0)
            .single()
            .expect("valid fixture timestamp")
    }
}

fn fixture_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date")
}

#[fixture]
fn signed_in_store() -> Arc<InMemorySessionStore> {
    Arc::new(InMemorySessionStore::with_credential(Credential::new(
        "stored-token",
    )))
}

fn make_client<S>(api: MockContentApi, store: Arc<S>) -> ContentClient<MockContentApi, S> {
    ContentClient::new(Arc::new(api), store, Arc::new(FixtureClock))
}

fn carries_stored_token(credential: &Option<Credential>) -> bool {
    credential.as_ref().map(Credential::expose) == Some("stored-token")
}

#[rstest]
#[tokio::test]
async fn list_posts_normalises_records_and_attaches_credential(
    signed_in_store: Arc<InMemorySessionStore>,
) {
    let mut api = MockContentApi::new();
    api.expect_list_posts()
        .withf(|filter, credential| {
            filter.as_deref() == Some("news") && carries_stored_token(credential)
        })
        .times(1)
        .return_once(|_, _| Ok(vec![PostRecord::with_id(4), PostRecord::with_id(2)]));

    let posts = make_client(api, signed_in_store)
        .list_posts(Some("news"))
        .await;

    let ids: Vec<i64> = posts.iter().map(|post| post.id.get()).collect();
    assert_eq!(ids, vec![4, 2]);
    let first = posts.first().expect("first post");
    assert_eq!(first.category, UNCATEGORISED);
    assert_eq!(first.read_time, DEFAULT_READ_TIME);
    assert_eq!(first.date, "2025-09-01");
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("   "))]
#[tokio::test]
async fn blank_type_filters_are_not_sent(#[case] filter: Option<&'static str>) {
    let mut api = MockContentApi::new();
    api.expect_list_posts()
        .withf(|filter, credential| filter.is_none() && credential.is_none())
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));

    let posts = make_client(api, Arc::new(InMemorySessionStore::default()))
        .list_posts(filter)
        .await;

    assert!(posts.is_empty());
}

#[rstest]
#[case(ContentApiError::transport("error sending request"))]
#[case(ContentApiError::timeout("operation timed out"))]
#[case(ContentApiError::rejected(500_u16, "Internal Server Error"))]
#[case(ContentApiError::decode("expected a sequence"))]
#[tokio::test]
async fn list_posts_swallows_failures(#[case] failure: ContentApiError) {
    let mut api = MockContentApi::new();
    api.expect_list_posts()
        .times(1)
        .return_once(move |_, _| Err(failure));

    let posts = make_client(api, Arc::new(InMemorySessionStore::default()))
        .list_posts(None)
        .await;

    assert!(posts.is_empty());
}

#[rstest]
#[case(ContentApiError::not_found("Post not found"))]
#[case(ContentApiError::transport("connection refused"))]
#[case(ContentApiError::rejected(500_u16, "boom"))]
#[tokio::test]
async fn fetch_post_reports_every_failure_as_not_found(#[case] failure: ContentApiError) {
    let mut api = MockContentApi::new();
    api.expect_fetch_post()
        .times(1)
        .return_once(move |_, _| Err(failure));

    let err = make_client(api, Arc::new(InMemorySessionStore::default()))
        .fetch_post(PostId::new(9))
        .await
        .expect_err("lookup fails");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), POST_NOT_FOUND_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn unauthorized_post_lookup_expires_session_but_reports_not_found(
    signed_in_store: Arc<InMemorySessionStore>,
) {
    let mut api = MockContentApi::new();
    api.expect_fetch_post()
        .withf(|id, credential| id.get() == 9 && carries_stored_token(credential))
        .times(1)
        .return_once(|_, _| Err(ContentApiError::unauthorized("expired")));
    let client = make_client(api, Arc::clone(&signed_in_store));
    let mut events = client.subscribe();

    let err = client
        .fetch_post(PostId::new(9))
        .await
        .expect_err("lookup fails");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Article non trouvé");
    assert_eq!(signed_in_store.credential().expect("read store"), None);
    assert_eq!(
        events.recv().await.expect("expiry event"),
        AuthEvent::Expired {
            operation: "fetch_post",
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
        }
    );
}

#[rstest]
#[tokio::test]
async fn unauthorized_write_clears_store_and_publishes_expiry(
    signed_in_store: Arc<InMemorySessionStore>,
) {
    let mut api = MockContentApi::new();
    api.expect_create_post()
        .times(1)
        .return_once(|_, _| Err(ContentApiError::unauthorized("Could not validate credentials")));
    let client = make_client(api, Arc::clone(&signed_in_store)).with_login_path("/connexion");
    let mut events = client.subscribe();

    let draft = NewPost::new("Titre", "Corps", "Équipe", "news", fixture_today());
    let err = client.create_post(&draft).await.expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "Could not validate credentials");
    assert_eq!(signed_in_store.credential().expect("read store"), None);
    assert_eq!(
        events.recv().await.expect("expiry event"),
        AuthEvent::Expired {
            operation: "create_post",
            login_path: "/connexion".to_owned(),
        }
    );
}

#[rstest]
#[tokio::test]
async fn unauthorized_fail_soft_read_still_clears_store(
    signed_in_store: Arc<InMemorySessionStore>,
) {
    let mut api = MockContentApi::new();
    api.expect_list_categories()
        .times(1)
        .return_once(|_| Err(ContentApiError::unauthorized("expired")));

    let categories = make_client(api, Arc::clone(&signed_in_store))
        .list_categories()
        .await;

    assert_eq!(categories, DEFAULT_CATEGORIES.to_vec());
    assert_eq!(signed_in_store.credential().expect("read store"), None);
}

#[rstest]
#[tokio::test]
async fn forbidden_keeps_the_credential(signed_in_store: Arc<InMemorySessionStore>) {
    let mut api = MockContentApi::new();
    api.expect_delete_post()
        .times(1)
        .return_once(|_, _| Err(ContentApiError::forbidden("Only admin can delete posts")));

    let err = make_client(api, Arc::clone(&signed_in_store))
        .delete_post(PostId::new(3))
        .await
        .expect_err("forbidden");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.status(), Some(403));
    assert!(signed_in_store.credential().expect("read store").is_some());
}

#[tokio::test]
async fn fail_soft_reads_fall_back_to_defaults() {
    let mut api = MockContentApi::new();
    api.expect_list_categories()
        .return_once(|_| Err(ContentApiError::transport("down")));
    api.expect_list_tags()
        .return_once(|_| Err(ContentApiError::transport("down")));
    api.expect_fetch_stats()
        .return_once(|_| Err(ContentApiError::transport("down")));
    let client = make_client(api, Arc::new(InMemorySessionStore::default()));

    assert_eq!(
        client.list_categories().await,
        vec![
            "Formation",
            "Partenariat",
            "Événement",
            "Technologie",
            "Recherche"
        ]
    );
    assert!(client.list_tags().await.is_empty());
    assert_eq!(client.fetch_stats().await, SiteStats::default());
}

#[tokio::test]
async fn login_returns_the_grant_without_storing_it() {
    let mut api = MockContentApi::new();
    api.expect_request_token()
        .withf(|credentials| credentials.username() == "admin")
        .times(1)
        .return_once(|_| {
            Ok(TokenGrant {
                credential: Credential::new("fresh"),
                token_type: "bearer".to_owned(),
            })
        });
    let store = Arc::new(InMemorySessionStore::default());
    let client = make_client(api, Arc::clone(&store));

    let credentials = LoginCredentials::try_from_parts("admin", "password").expect("valid");
    let grant = client.login(&credentials).await.expect("login succeeds");

    assert_eq!(grant.credential.expose(), "fresh");
    assert_eq!(store.credential().expect("read store"), None);
}

#[tokio::test]
async fn fetch_current_user_uses_the_given_credential() {
    let mut api = MockContentApi::new();
    api.expect_current_user()
        .withf(|credential| credential.expose() == "explicit")
        .times(1)
        .return_once(|_| {
            Ok(User {
                username: "admin".to_owned(),
                role: Role::Admin,
            })
        });

    let user = make_client(api, Arc::new(InMemorySessionStore::default()))
        .fetch_current_user(&Credential::new("explicit"))
        .await
        .expect("user resolves");

    assert!(user.is_admin());
}

#[tokio::test]
async fn unreadable_store_sends_request_without_credential() {
    let mut store = MockSessionStore::new();
    store
        .expect_credential()
        .returning(|| Err(SessionStoreError::read("permission denied")));
    let mut api = MockContentApi::new();
    api.expect_list_tags()
        .withf(|credential| credential.is_none())
        .times(1)
        .return_once(|_| Ok(vec!["carto".to_owned()]));

    let tags = make_client(api, Arc::new(store)).list_tags().await;

    assert_eq!(tags, vec!["carto"]);
}

#[tokio::test]
async fn expiry_is_published_even_when_clearing_fails() {
    let mut store = MockSessionStore::new();
    store
        .expect_credential()
        .returning(|| Ok(Some(Credential::new("stored-token"))));
    store
        .expect_clear()
        .times(1)
        .returning(|| Err(SessionStoreError::write("read-only filesystem")));
    let mut api = MockContentApi::new();
    api.expect_fetch_stats()
        .return_once(|_| Err(ContentApiError::unauthorized("expired")));
    let client = make_client(api, Arc::new(store));
    let mut events = client.subscribe();

    assert_eq!(client.fetch_stats().await, SiteStats::default());
    assert!(matches!(
        events.recv().await.expect("expiry event"),
        AuthEvent::Expired {
            operation: "fetch_stats",
            ..
        }
    ));
}

#[rstest]
#[tokio::test]
async fn update_post_returns_the_normalised_record(signed_in_store: Arc<InMemorySessionStore>) {
    let mut api = MockContentApi::new();
    api.expect_update_post()
        .withf(|id, patch, credential| {
            id.get() == 5
                && patch.title.as_deref() == Some("X")
                && carries_stored_token(credential)
        })
        .times(1)
        .return_once(|id, _, _| {
            Ok(PostRecord {
                title: Some("X".to_owned()),
                category: Some("Recherche".to_owned()),
                ..PostRecord::with_id(id.get())
            })
        });

    let patch = PostPatch {
        title: Some("X".to_owned()),
        ..PostPatch::default()
    };
    let post = make_client(api, signed_in_store)
        .update_post(PostId::new(5), &patch)
        .await
        .expect("update succeeds");

    assert_eq!(post.title, "X");
    assert_eq!(post.category, "Recherche");
    assert!(post.tags.is_empty());
}

#[tokio::test]
async fn rejected_contact_message_keeps_server_detail() {
    let mut api = MockContentApi::new();
    api.expect_submit_contact()
        .times(1)
        .return_once(|_, _| Err(ContentApiError::rejected(422_u16, "email: value is not a valid email address")));
    let message = ContactMessage::try_new("Ada", "ada@x", "Recherche", "Sujet", "Bonjour")
        .expect("valid message");

    let err = make_client(api, Arc::new(InMemorySessionStore::default()))
        .submit_contact(&message)
        .await
        .expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::Rejected);
    assert_eq!(err.status(), Some(422));
    assert_eq!(err.message(), "email: value is not a valid email address");
}

#[rstest]
#[tokio::test]
async fn create_account_sends_the_stored_credential(signed_in_store: Arc<InMemorySessionStore>) {
    let mut api = MockContentApi::new();
    api.expect_create_account()
        .withf(|account, credential| {
            account.username() == "lea"
                && account.role() == Role::Admin
                && carries_stored_token(credential)
        })
        .times(1)
        .return_once(|_, _| Ok(()));
    let account = NewAccount::try_new("lea", "lea@example.org", "initial", Role::Admin)
        .expect("valid account");

    make_client(api, signed_in_store)
        .create_account(&account)
        .await
        .expect("account created");
}

#[tokio::test]
async fn forbidden_account_creation_reports_forbidden() {
    let mut api = MockContentApi::new();
    api.expect_create_account()
        .return_once(|_, _| Err(ContentApiError::forbidden("Admins only")));
    let account = NewAccount::try_new("lea", "lea@example.org", "initial", Role::User)
        .expect("valid account");

    let err = make_client(api, Arc::new(InMemorySessionStore::default()))
        .create_account(&account)
        .await
        .expect_err("forbidden");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.to_string(), "Admins only");
}
