//! Dental clinic clients (the dentists commissioning work orders).

use serde::{Deserialize, Serialize};

use crate::types::ClientId;

/// A client of the laboratory.
///
/// Work orders reference clients by [`ClientId`]; deleting a client does not
/// cascade to its orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub clinic: String,
    pub phone: String,
    pub email: String,
}

/// Create payload for a client; the server assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub clinic: String,
    pub phone: String,
    pub email: String,
}
