//! LabFlow Client - Synchronization between the backend API and local state.
//!
//! This crate owns every I/O concern of the LabFlow client:
//!
//! - [`api`] - Typed REST client for the backend (auth + entity CRUD)
//! - [`store`] - The dependency-injected state store applying reducer
//!   transitions after the backend acknowledges each write
//! - [`session`] - The persisted `{token, user}` pair restored on startup
//! - [`chat`] - Bridge to the chat completion service, feeding replies back
//!   into the conversation state
//! - [`config`] - Environment-based configuration
//!
//! # Synchronization contract
//!
//! Every write follows the same two-phase discipline: perform the network
//! call, await the authoritative server response, then apply exactly one
//! state transition carrying that response. The store is never mutated
//! speculatively, so a failed call needs no rollback - the error simply
//! propagates to the caller.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod chat;
pub mod config;
pub mod session;
pub mod store;

pub use api::{ApiClient, ApiError};
pub use chat::{ChatClient, ChatError};
pub use config::{ChatConfig, ClientConfig, ConfigError};
pub use session::{SessionError, SessionStore};
pub use store::{Store, StoreError};
