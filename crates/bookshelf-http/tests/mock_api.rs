//! Mock API tests for bookshelf-http.
//!
//! These tests use wiremock to stand in for the bookshelf API and exercise
//! the client end to end over real HTTP.

use std::sync::Arc;
use std::time::Duration;

use bookshelf_core::error::{AuthError, TransportError};
use bookshelf_core::models::{BookForm, ProfileUpdate, Registration};
use bookshelf_core::{
    AccessToken, ApiUrl, BookId, ClientConfig, Credentials, Error, FileUpload, MemoryTokenStore,
    ReadingListId, RecordingNavigator, RefreshToken, TokenPair, TokenStore,
};
use bookshelf_http::BookshelfClient;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

struct Harness {
    client: BookshelfClient,
    navigator: Arc<RecordingNavigator>,
}

fn mock_config(server: &MockServer) -> ClientConfig {
    ClientConfig::with_base_url(ApiUrl::new(format!("{}/api", server.uri())).unwrap()).unwrap()
}

fn harness_with(config: ClientConfig) -> Harness {
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let client = BookshelfClient::new(config, store, navigator.clone()).unwrap();
    Harness { client, navigator }
}

fn harness(server: &MockServer) -> Harness {
    harness_with(mock_config(server))
}

fn logged_in(server: &MockServer, access: &str, refresh: &str) -> Harness {
    let h = harness(server);
    h.client
        .session()
        .begin(
            &TokenPair {
                access: AccessToken::new(access),
                refresh: RefreshToken::new(refresh),
            },
            Some("alice"),
        )
        .unwrap();
    h
}

fn book_json(id: u64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "authors": "Ursula K. Le Guin",
        "genre": "Science Fiction",
        "publication_date": "1969-03-01",
        "cover_image": "/media/covers/lhod.png"
    })
}

fn auth_header(request: &Request) -> Option<String> {
    request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_login_stores_tokens_and_username() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "A1", "refresh": "R1"})),
        )
        .mount(&server)
        .await;

    let h = harness(&server);
    h.client
        .login(&Credentials::new("alice", "secret"))
        .await
        .unwrap();

    let session = h.client.session();
    assert_eq!(session.access_token().unwrap(), Some(AccessToken::new("A1")));
    assert_eq!(session.refresh_token().unwrap(), Some(RefreshToken::new("R1")));
    assert_eq!(session.username().unwrap().as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_login_rejected_does_not_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "No active account found"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "X"})))
        .expect(0)
        .mount(&server)
        .await;

    let h = logged_in(&server, "T1", "R1");
    let err = h
        .client
        .login(&Credentials::new("alice", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("No active account found"));
    assert!(h.navigator.redirects().is_empty());
}

#[tokio::test]
async fn test_register_checks_passwords_locally() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/register/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server);
    let registration = Registration {
        username: "bob".to_string(),
        email: "bob@example.com".to_string(),
        phone: String::new(),
        password: "one".to_string(),
        confirm_password: "two".to_string(),
    };

    let err = h.client.register(&registration).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_register_posts_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/register/"))
        .and(body_json(json!({
            "username": "bob",
            "email": "bob@example.com",
            "phone": "555-0100",
            "password": "hunter22",
            "confirm_password": "hunter22"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"username": "bob"})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server);
    let registration = Registration {
        username: "bob".to_string(),
        email: "bob@example.com".to_string(),
        phone: "555-0100".to_string(),
        password: "hunter22".to_string(),
        confirm_password: "hunter22".to_string(),
    };

    h.client.register(&registration).await.unwrap();
    assert!(!h.client.session().is_authenticated().unwrap());
}

#[tokio::test]
async fn test_logout_drops_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "T1", "refresh": "R1"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/books/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let h = harness(&server);
    h.client
        .login(&Credentials::new("alice", "secret"))
        .await
        .unwrap();
    h.client.my_books().await.unwrap();
    h.client.logout().unwrap();
    h.client.my_books().await.unwrap();

    let books: Vec<Request> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/api/books/")
        .collect();
    assert_eq!(books.len(), 2);
    assert_eq!(auth_header(&books[0]).as_deref(), Some("Bearer T1"));
    assert_eq!(auth_header(&books[1]), None);
    assert_eq!(h.client.session().username().unwrap(), None);
}

// ============================================================================
// Refresh and replay
// ============================================================================

#[tokio::test]
async fn test_expired_token_is_refreshed_and_replayed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/books/"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .and(body_json(json!({"refresh": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/books/"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([book_json(1, "Dune")])))
        .expect(1)
        .mount(&server)
        .await;

    let h = logged_in(&server, "T1", "R1");
    let books = h.client.my_books().await.unwrap();

    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Dune");
    assert_eq!(h.client.session().access_token().unwrap(), Some(AccessToken::new("T2")));
    assert_eq!(
        h.client.session().refresh_token().unwrap(),
        Some(RefreshToken::new("R1"))
    );

    let refresh = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.url.path() == "/api/token/refresh/")
        .unwrap();
    assert_eq!(auth_header(&refresh), None);
}

#[tokio::test]
async fn test_refresh_failure_ends_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/profile/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Token is blacklisted"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = logged_in(&server, "T1", "R1");
    let err = h.client.profile().await.unwrap_err();

    assert!(matches!(err, Error::Auth(AuthError::RefreshFailed(_))));
    let session = h.client.session();
    assert_eq!(session.access_token().unwrap(), None);
    assert_eq!(session.refresh_token().unwrap(), None);
    assert_eq!(h.navigator.redirects(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_missing_refresh_token_propagates_401() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reading-lists/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Authentication credentials were not provided."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "X"})))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server);
    let err = h.client.reading_lists().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(h.navigator.redirects().is_empty());
}

#[tokio::test]
async fn test_second_401_is_not_refreshed_again() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/all-books/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})))
        .expect(1)
        .mount(&server)
        .await;

    let h = logged_in(&server, "T1", "R1");
    let err = h.client.catalogue().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(h.navigator.redirects().is_empty());
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": "T2"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/books/"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([book_json(1, "Dune")])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/profile/"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "alice"})))
        .mount(&server)
        .await;

    let h = logged_in(&server, "T1", "R1");
    let (books, profile) = tokio::join!(h.client.my_books(), h.client.profile());

    assert_eq!(books.unwrap().len(), 1);
    assert_eq!(profile.unwrap().username, "alice");
}

#[tokio::test]
async fn test_stale_token_replays_without_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/books/"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/books/"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([book_json(1, "Dune")])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "T3"})))
        .expect(0)
        .mount(&server)
        .await;

    let h = logged_in(&server, "T1", "R1");
    let (books, ()) = tokio::join!(h.client.my_books(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        h.client.session().replace_access_token(&AccessToken::new("T2")).unwrap();
    });

    assert_eq!(books.unwrap().len(), 1);

    let requests = server.received_requests().await.unwrap();
    let replay = requests
        .iter()
        .rfind(|r| r.url.path() == "/api/books/")
        .unwrap();
    assert_eq!(auth_header(replay).as_deref(), Some("Bearer T2"));
    assert_eq!(h.client.session().access_token().unwrap(), Some(AccessToken::new("T2")));
}

#[tokio::test]
async fn test_concurrent_refresh_failure_is_shared() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Token is invalid or expired"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = logged_in(&server, "T1", "R1");
    let (books, profile, lists) = tokio::join!(
        h.client.my_books(),
        h.client.profile(),
        h.client.reading_lists()
    );

    assert!(matches!(books, Err(Error::Auth(AuthError::RefreshFailed(_)))));
    assert!(matches!(profile, Err(Error::Auth(AuthError::RefreshFailed(_)))));
    assert!(matches!(lists, Err(Error::Auth(AuthError::RefreshFailed(_)))));

    assert_eq!(h.navigator.redirects(), vec!["/login".to_string()]);
    let session = h.client.session();
    assert_eq!(session.access_token().unwrap(), None);
    assert_eq!(session.refresh_token().unwrap(), None);
}

#[tokio::test]
async fn test_non_auth_errors_pass_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/books/99/detail/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "X"})))
        .expect(0)
        .mount(&server)
        .await;

    let h = logged_in(&server, "T1", "R1");
    let err = h.client.book_detail(BookId::new(99)).await.unwrap_err();

    assert!(err.is_not_found());
    match err {
        Error::Protocol(protocol) => assert_eq!(protocol.detail().as_deref(), Some("Not found.")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/books/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let mut config = mock_config(&server);
    config.timeout = Duration::from_millis(200);
    let h = harness_with(config);

    let err = h.client.my_books().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::Timeout { duration_ms: 200 })
    ));
}

// ============================================================================
// Resources
// ============================================================================

#[tokio::test]
async fn test_create_book_uploads_multipart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/books/"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(book_json(7, "The Dispossessed")))
        .expect(1)
        .mount(&server)
        .await;

    let h = logged_in(&server, "T1", "R1");
    let form = BookForm {
        title: "The Dispossessed".to_string(),
        authors: "Ursula K. Le Guin".to_string(),
        genre: "Science Fiction".to_string(),
        cover_image: Some(FileUpload::new("cover.png", vec![0x89, b'P', b'N', b'G'])),
        ..Default::default()
    };

    let book = h.client.create_book(&form).await.unwrap();
    assert_eq!(book.id, BookId::new(7));
    assert_eq!(
        book.cover_url(&bookshelf_core::MediaBaseUrl::new(server.uri()).unwrap()),
        Some(format!("{}/media/covers/lhod.png", server.uri()))
    );

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"title\""));
    assert!(body.contains("The Dispossessed"));
    assert!(body.contains("filename=\"cover.png\""));
}

#[tokio::test]
async fn test_multipart_replay_resends_form() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/profile/"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/profile/"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "alice",
            "bio": "Reads a lot",
            "favorite_genre": "Fantasy"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = logged_in(&server, "T1", "R1");
    let update = ProfileUpdate {
        bio: "Reads a lot".to_string(),
        favorite_genre: "Fantasy".to_string(),
        ..Default::default()
    };

    let profile = h.client.update_profile(&update).await.unwrap();
    assert_eq!(profile.bio.as_deref(), Some("Reads a lot"));

    let replay = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .rfind(|r| r.url.path() == "/api/profile/")
        .unwrap();
    assert!(String::from_utf8_lossy(&replay.body).contains("Reads a lot"));
}

#[tokio::test]
async fn test_reading_list_operations() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reading-lists/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 3,
            "name": "Summer",
            "books": [
                {"id": 11, "order": 2, "book_details": book_json(2, "Second")},
                {"id": 10, "order": 1, "book_details": book_json(1, "First")}
            ]
        }])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/reading-lists/"))
        .and(body_json(json!({"name": "Winter"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 4})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/reading-lists/3/add/5/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/reading-lists/3/remove/5/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/reading-lists/3/reorder/"))
        .and(body_json(json!({"books": [
            {"id": 11, "order": 0},
            {"id": 10, "order": 1}
        ]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/reading-lists/3/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let h = logged_in(&server, "T1", "R1");
    let list_id = ReadingListId::new(3);

    let mut lists = h.client.reading_lists().await.unwrap();
    let summer = &mut lists[0];
    assert_eq!(summer.books[0].title(), "First");

    h.client.create_reading_list("Winter").await.unwrap();
    h.client
        .add_to_reading_list(list_id, BookId::new(5))
        .await
        .unwrap();
    h.client
        .remove_from_reading_list(list_id, BookId::new(5))
        .await
        .unwrap();

    summer.move_entry(1, 0).unwrap();
    h.client
        .reorder_reading_list(list_id, &summer.reorder_request())
        .await
        .unwrap();
    h.client.delete_reading_list(list_id).await.unwrap();
}

#[tokio::test]
async fn test_validation_error_detail() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/books/7/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"title": ["This field may not be blank."]})),
        )
        .mount(&server)
        .await;

    let h = logged_in(&server, "T1", "R1");
    let err = h
        .client
        .update_book(BookId::new(7), &BookForm::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    match err {
        Error::Protocol(protocol) => assert_eq!(
            protocol.detail().as_deref(),
            Some("This field may not be blank.")
        ),
        other => panic!("unexpected error: {other:?}"),
    }
}
