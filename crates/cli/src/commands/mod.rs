//! CLI command implementations.
//!
//! Each module is a thin presentation wrapper: parse arguments, call one
//! store operation, print the result. All business behavior lives in
//! `labflow-core` and `labflow-client`.

pub mod auth;
pub mod chat;
pub mod clients;
pub mod orders;
pub mod products;
pub mod reports;
pub mod suppliers;

use labflow_client::Store;

/// Command error type; messages surface directly to the user.
pub type CommandError = Box<dyn std::error::Error>;

/// Fail with a hint when no session was restored.
pub fn ensure_session(store: &Store) -> Result<(), CommandError> {
    if store.state().is_authenticated {
        Ok(())
    } else {
        Err("no active session; run `labflow login` first".into())
    }
}
