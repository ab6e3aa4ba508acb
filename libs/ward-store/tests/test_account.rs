//! Sign-in, profile and sign-out through the coordinating store

mod test_support;

use serde_json::json;
use test_support::{session, CountingSessionStore, Harness, SENTINEL};
use ward_client::{Method, Role, SessionStore};
use ward_store::{OpError, SessionManager};

fn session_body(id: &str, role: i64, token: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "name": "Pat",
        "email": "pat@example.org",
        "role": role,
        "token": token,
        "ward": "B2"
    })
}

#[tokio::test]
async fn test_sign_in_establishes_and_persists_session() {
    let h = Harness::signed_out();
    h.transport
        .ok(Method::POST, "signin", session_body("p7", 2, "fresh"));

    let established = h.store.sign_in("pat@example.org", "pw").await.unwrap();

    assert_eq!(established.id, "p7");
    assert_eq!(established.role, Role::Patient);
    assert_eq!(h.store.session().unwrap().token, "fresh");

    let persisted = h.sessions.load().unwrap().unwrap();
    assert_eq!(persisted.extra.get("ward"), Some(&json!("B2")));

    let request = &h.transport.requests()[0];
    assert!(request.authorization.is_none());
    assert_eq!(
        request.body,
        Some(json!({"email": "pat@example.org", "password": "pw"}))
    );

    let account = h.store.sessions().account();
    assert!(!account.status.loading);
    assert!(!account.status.success);
}

#[tokio::test]
async fn test_failed_sign_in_keeps_signed_out() {
    let h = Harness::signed_out();
    h.transport
        .fail(Method::POST, "signin", 401, "Invalid email or password");

    let err = h.store.sign_in("pat@example.org", "nope").await.unwrap_err();

    assert_eq!(err, OpError::Failed("Invalid email or password".to_string()));
    assert!(h.store.session().is_none());
    assert_eq!(
        h.store.sessions().account().status.error.as_deref(),
        Some("Invalid email or password")
    );
}

#[tokio::test]
async fn test_sign_up_replaces_existing_session() {
    let h = Harness::signed_in(Role::Admin);
    h.transport
        .ok(Method::POST, "signup", session_body("n1", 2, "new-tok"));

    h.store
        .sign_up("New", "new@example.org", "pw")
        .await
        .unwrap();

    assert_eq!(h.store.session().unwrap().id, "n1");
    assert_eq!(h.sessions.load().unwrap().unwrap().token, "new-tok");
}

#[tokio::test]
async fn test_profile_update_becomes_the_session() {
    let h = Harness::signed_in(Role::Doctor);
    h.transport.ok(
        Method::PUT,
        "user/u1",
        json!({"_id": "u1", "name": "Renamed", "email": "user@example.org", "role": 1, "token": "tok2"}),
    );

    let updated = h
        .store
        .update_profile(json!({"name": "Renamed"}))
        .await
        .unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(h.store.session().unwrap().token, "tok2");
    assert_eq!(h.sessions.load().unwrap().unwrap().name, "Renamed");
    assert!(h.store.sessions().account().status.success);
}

#[tokio::test]
async fn test_profile_update_token_rejection_signs_out() {
    let h = Harness::signed_in(Role::Doctor);
    h.transport.fail(Method::PUT, "user/u1", 401, SENTINEL);

    let err = h
        .store
        .update_profile(json!({"name": "Renamed"}))
        .await
        .unwrap_err();

    assert!(err.is_auth_error());
    assert!(h.store.session().is_none());
    assert_eq!(h.sessions.clear_count(), 1);
}

#[tokio::test]
async fn test_current_user_failure_keeps_session() {
    let h = Harness::signed_in(Role::Patient);
    h.transport.fail(Method::GET, "user/u1", 401, SENTINEL);
    h.transport
        .ok(Method::GET, "user/u1", json!({"_id": "u1", "name": "Test User"}));

    let err = h.store.load_current_user().await.unwrap_err();
    assert!(!err.is_auth_error());
    assert!(h.store.session().is_some());

    h.store.load_current_user().await.unwrap();
    let account = h.store.sessions().account();
    assert_eq!(
        account.current_user,
        Some(json!({"_id": "u1", "name": "Test User"}))
    );
    assert_eq!(account.status.error, None);
}

#[tokio::test]
async fn test_sign_out_is_idempotent() {
    let h = Harness::signed_in(Role::Admin);

    assert!(h.store.sign_out());
    assert!(!h.store.sign_out());

    assert!(h.store.session().is_none());
    assert!(h.sessions.load().unwrap().is_none());
    assert_eq!(h.sessions.clear_count(), 2);
}

#[test]
fn test_restore_reads_persisted_session() {
    let store = std::sync::Arc::new(CountingSessionStore::with(session(Role::Nurse)));
    let manager = SessionManager::new(store);

    assert!(manager.current().is_none());
    let restored = manager.restore().unwrap();
    assert_eq!(restored.role, Role::Nurse);
    assert!(manager.context().is_signed_in());
}
