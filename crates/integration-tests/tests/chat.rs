//! Chat bridge absorption tests.
//!
//! Chat is the one flow where failures become data instead of errors: a
//! missing credential or failed call must surface as a model turn in the
//! conversation, never as a raised error.

use tempfile::TempDir;

use labflow_client::{ApiClient, SessionStore, Store};
use labflow_core::ChatRole;
use labflow_integration_tests::MockBackend;

fn store_for(backend: &MockBackend, dir: &TempDir) -> Store {
    // No chat client configured: the bridge must absorb that too.
    Store::new(
        ApiClient::new(backend.api_url()),
        SessionStore::at_path(dir.path().join("session.json")),
        None,
    )
}

#[tokio::test]
async fn test_chat_without_credentials_appends_error_turn() {
    let backend = MockBackend::spawn().await;
    backend.seed_account("admin@admin.com", "admin", "admin").await;

    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = store_for(&backend, &dir);
    store.initialize().await;
    store
        .login("admin@admin.com", "admin")
        .await
        .expect("login succeeds");

    store.send_chat_message("¿Cuántas órdenes hay?").await;

    let state = store.state();
    assert!(!state.is_chat_loading);
    assert_eq!(state.chat_messages.len(), 2);

    assert_eq!(state.chat_messages.first().map(|m| m.role), Some(ChatRole::User));
    let reply = state.chat_messages.last().expect("error turn present");
    assert_eq!(reply.role, ChatRole::Model);
    assert!(reply.content.starts_with("Error: "));
}

#[tokio::test]
async fn test_chat_is_noop_when_logged_out() {
    let backend = MockBackend::spawn().await;

    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = store_for(&backend, &dir);
    store.initialize().await;

    store.send_chat_message("hola").await;
    assert!(store.state().chat_messages.is_empty());
}

#[tokio::test]
async fn test_toggle_chat_visibility() {
    let backend = MockBackend::spawn().await;

    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = store_for(&backend, &dir);

    assert!(!store.state().is_chat_open);
    store.toggle_chat();
    assert!(store.state().is_chat_open);
    store.toggle_chat();
    assert!(!store.state().is_chat_open);
}
