//! Domain entities mirrored from the backend.
//!
//! Every entity carries a server-assigned identifier; the `New*` companion
//! types are the create payloads (identifier omitted, the server mints one).
//! Field names serialize in camelCase to match the backend's JSON documents.

mod chat;
mod client;
mod order;
mod product;
mod supplier;
mod user;

pub use chat::*;
pub use client::*;
pub use order::*;
pub use product::*;
pub use supplier::*;
pub use user::*;

use serde::{Deserialize, Serialize};

/// The four entity collections, as loaded by the bootstrap fetch.
///
/// This is the payload of the bulk-load state transition and the data
/// snapshot embedded into the chat system prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    pub clients: Vec<Client>,
    pub products: Vec<Product>,
    pub suppliers: Vec<Supplier>,
    pub orders: Vec<WorkOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collections_default_is_empty() {
        let collections = Collections::default();
        assert!(collections.clients.is_empty());
        assert!(collections.products.is_empty());
        assert!(collections.suppliers.is_empty());
        assert!(collections.orders.is_empty());
    }
}
