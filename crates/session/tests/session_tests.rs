//! Session lifecycle against a mocked API

use async_trait::async_trait;
use batteries_core::testing::RecordingNotifier;
use batteries_core::{AccessToken, CredentialStore, MemoryStorage};
use batteries_http::ApiClientFactory;
use batteries_session::{Navigator, Rehydration, SessionError, SessionManager, SessionState};
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate(&self, path: &str) -> anyhow::Result<()> {
        self.visits.lock().unwrap().push(path.to_string());
        Ok(())
    }
}

struct Harness {
    manager: SessionManager,
    credentials: CredentialStore,
    notifier: Arc<RecordingNotifier>,
    navigator: Arc<RecordingNavigator>,
}

fn harness(server: &MockServer) -> Harness {
    let credentials = CredentialStore::new(Arc::new(MemoryStorage::new()));
    let notifier = Arc::new(RecordingNotifier::new());
    let navigator = Arc::new(RecordingNavigator::default());

    let factory = ApiClientFactory::builder()
        .base_url(server.uri())
        .credentials(credentials.clone())
        .notifier(notifier.clone())
        .build()
        .unwrap();

    Harness {
        manager: SessionManager::new(factory, navigator.clone()),
        credentials,
        notifier,
        navigator,
    }
}

fn user_body() -> serde_json::Value {
    json!({
        "id": "usr_1",
        "email": "ada@example.com",
        "firstName": "Ada",
        "lastName": "LOVELACE",
        "isSuperuser": false,
        "phoneNumber": "06 11 22 33 44"
    })
}

async fn mount_me(server: &MockServer, token: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_success_caches_profile() {
    let server = MockServer::start().await;
    mount_me(&server, "T1", ResponseTemplate::new(200).set_body_json(user_body())).await;
    let h = harness(&server);

    let user = h.manager.login(&AccessToken::bearer("T1")).await.unwrap();

    assert_eq!(user.email, "ada@example.com");
    assert_eq!(h.credentials.token().as_deref(), Some("T1"));
    assert_eq!(
        h.manager.state(),
        SessionState::Authenticated {
            profile: Some(user.clone())
        }
    );
    assert_eq!(h.notifier.success_titles(), vec!["You are connected"]);
    assert_eq!(h.navigator.visits(), vec!["/badges"]);
}

#[tokio::test]
async fn login_failure_keeps_credential_without_profile() {
    let server = MockServer::start().await;
    mount_me(
        &server,
        "T1",
        ResponseTemplate::new(500).set_body_json(json!({
            "errors": {"general": ["An unknown error has occurred. Please contact an administrator."]}
        })),
    )
    .await;
    let h = harness(&server);

    let err = h.manager.login(&AccessToken::bearer("T1")).await.unwrap_err();

    assert!(matches!(err, SessionError::Client(_)));
    assert_eq!(err.client_error().and_then(|e| e.status()).map(|s| s.as_u16()), Some(500));
    assert!(h.credentials.has());
    assert_eq!(h.manager.profile(), None);
    assert_eq!(h.manager.state(), SessionState::Authenticated { profile: None });
    assert_eq!(
        h.notifier.error_descriptions(),
        vec!["An unknown error has occurred. Please contact an administrator."]
    );
    assert!(h.notifier.success_titles().is_empty());
    assert!(h.navigator.visits().is_empty());
}

#[tokio::test]
async fn logout_clears_everything_from_any_state() {
    let server = MockServer::start().await;
    mount_me(&server, "T1", ResponseTemplate::new(200).set_body_json(user_body())).await;
    let h = harness(&server);

    h.manager.login(&AccessToken::bearer("T1")).await.unwrap();
    h.manager.logout(true).await.unwrap();

    assert!(!h.credentials.has());
    assert_eq!(h.manager.profile(), None);
    assert_eq!(h.manager.state(), SessionState::Anonymous);
    assert_eq!(
        h.notifier.success_titles(),
        vec!["You are connected", "You have been disconnected"]
    );

    // Idempotent: nothing stored, still clears and still navigates
    h.manager.logout(true).await.unwrap();
    assert!(!h.credentials.has());
    assert_eq!(h.navigator.visits(), vec!["/badges", "/badges", "/badges"]);
}

#[tokio::test]
async fn logout_can_skip_confirmation() {
    let server = MockServer::start().await;
    let h = harness(&server);
    h.credentials.set("T1").unwrap();

    h.manager.logout(false).await.unwrap();

    assert!(!h.credentials.has());
    assert!(h.notifier.is_empty());
    assert_eq!(h.navigator.visits(), vec!["/badges"]);
}

#[tokio::test]
async fn rehydrate_restores_profile() {
    let server = MockServer::start().await;
    mount_me(&server, "T1", ResponseTemplate::new(200).set_body_json(user_body())).await;
    let h = harness(&server);
    h.credentials.set("T1").unwrap();

    let mut view = h.manager.view();
    let outcome = h.manager.rehydrate().await.unwrap();

    let Rehydration::Restored(user) = outcome else {
        panic!("expected restored session, got {outcome:?}");
    };
    assert_eq!(user.phone_number.as_deref(), Some("06 11 22 33 44"));
    assert_eq!(view.changed().await, Some(user.clone()));
    assert_eq!(view.profile(), Some(user));
    assert!(view.is_authenticated());
    assert!(h.notifier.is_empty());
    assert!(h.navigator.visits().is_empty());
}

#[tokio::test]
async fn rehydrate_without_credential_does_nothing() {
    let server = MockServer::start().await;
    let h = harness(&server);

    assert_eq!(h.manager.rehydrate().await.unwrap(), Rehydration::Anonymous);
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(h.navigator.visits().is_empty());
}

#[tokio::test]
async fn rehydrate_runs_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(1)
        .mount(&server)
        .await;
    let h = harness(&server);
    h.credentials.set("T1").unwrap();

    assert!(matches!(
        h.manager.rehydrate().await.unwrap(),
        Rehydration::Restored(_)
    ));
    assert_eq!(h.manager.rehydrate().await.unwrap(), Rehydration::Skipped);
}

#[tokio::test]
async fn rehydrate_with_unknown_user_ends_anonymous_silently() {
    let server = MockServer::start().await;
    mount_me(&server, "T1", ResponseTemplate::new(404)).await;
    let h = harness(&server);
    h.credentials.set("T1").unwrap();

    let outcome = h.manager.rehydrate().await.unwrap();

    assert_eq!(outcome, Rehydration::Expired);
    assert_eq!(h.manager.state(), SessionState::Anonymous);
    assert!(!h.credentials.has());
    assert_eq!(h.manager.profile(), None);
    assert!(h.notifier.is_empty());
    assert_eq!(h.navigator.visits(), vec!["/badges"]);
}

#[tokio::test]
async fn rehydrate_with_rejected_token_shows_only_server_message() {
    let server = MockServer::start().await;
    mount_me(
        &server,
        "stale",
        ResponseTemplate::new(403).set_body_json(json!({
            "errors": {"general": ["Could not validate existing credentials. Please log in again."]}
        })),
    )
    .await;
    let h = harness(&server);
    h.credentials.set("stale").unwrap();

    assert_eq!(h.manager.rehydrate().await.unwrap(), Rehydration::Expired);
    assert!(!h.credentials.has());
    assert_eq!(
        h.notifier.error_descriptions(),
        vec!["Could not validate existing credentials. Please log in again."]
    );
    assert!(h.notifier.success_titles().is_empty());
}
