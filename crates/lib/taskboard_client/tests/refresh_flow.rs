//! 401 recovery against a live mock API.

mod common;

use common::{MockApi, RENEWED_TOKEN};
use futures::future::join_all;
use serde_json::Value;
use std::sync::atomic::Ordering;
use taskboard_client::routes;
use taskboard_client::transport::RequestOptions;
use taskboard_client::{ErrorKind, RequestOutcome, SessionEvent};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_401s_share_one_refresh() {
    let api = MockApi::spawn().await;
    let client = api.client_with_expired_token();
    let mut events = client.session_events();

    let outcomes = join_all((0..6).map(|_| {
        client
            .transport()
            .get::<Value>(routes::TASKS, RequestOptions::new())
    }))
    .await;

    assert_eq!(api.state.refresh_calls(), 1);
    assert!(outcomes.iter().all(RequestOutcome::is_success));
    assert_eq!(client.credentials().access_token().as_deref(), Some(RENEWED_TOKEN));

    let retried: Vec<_> = api
        .state
        .seen_tokens()
        .into_iter()
        .filter(|token| token == RENEWED_TOKEN)
        .collect();
    assert_eq!(retried.len(), 6);
    assert_eq!(events.recv().await.unwrap(), SessionEvent::Refreshed);
}

#[tokio::test]
async fn concurrent_store_fetches_share_one_refresh() {
    let api = MockApi::spawn().await;
    let client = api.client_with_expired_token();

    let (tasks, team) = tokio::join!(
        client.tasks().fetch(Default::default()),
        client.teams().fetch_by_owner(),
    );

    assert_eq!((tasks, team), (200, 200));
    assert_eq!(api.state.refresh_calls(), 1);
}

#[tokio::test]
async fn failed_refresh_logs_out_without_retrying() {
    let api = MockApi::spawn().await;
    api.state.refresh_succeeds.store(false, Ordering::SeqCst);
    let client = api.client_with_expired_token();
    let mut events = client.session_events();

    let outcome = client
        .transport()
        .get::<Value>(routes::TASKS, RequestOptions::new())
        .await;

    assert_eq!(
        outcome,
        RequestOutcome::Failure {
            status_code: 401,
            kind: ErrorKind::Auth
        }
    );
    assert_eq!(api.state.refresh_calls(), 1);
    assert_eq!(api.state.task_requests(), 1);
    assert!(!client.credentials().is_logged_in());
    assert!(client.credentials().access_token().is_none());
    assert!(client.credentials().refresh_token().is_none());
    assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);
}

#[tokio::test]
async fn second_401_after_refresh_is_final() {
    let api = MockApi::spawn().await;
    let client = api.client_with_expired_token();

    let status = client.users().fetch(Default::default()).await;

    assert_eq!(status, 401);
    assert_eq!(client.users().last_error(), Some(ErrorKind::Auth));
    assert_eq!(api.state.refresh_calls(), 1);
    assert_eq!(api.state.user_requests.load(Ordering::SeqCst), 2);
    // The renewed token is kept; only a failed refresh ends the session.
    assert!(client.credentials().is_logged_in());
}

#[tokio::test]
async fn failed_login_does_not_trigger_refresh() {
    let api = MockApi::spawn().await;
    let client = api.client_with_expired_token();

    let wrong_password = client.auth().log_in("ada@example.com", "wrong").await;
    let locked = client.auth().log_in("locked@example.com", "wrong").await;

    assert_eq!(wrong_password, 409);
    assert_eq!(locked, 401);
    assert_eq!(api.state.refresh_calls(), 0);
}
