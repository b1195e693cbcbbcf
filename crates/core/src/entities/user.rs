//! Authenticated users and session material.

use serde::{Deserialize, Serialize};

use crate::types::{UserId, UserRole};

/// The authenticated user, as embedded in the login response.
///
/// Users are session-scoped on the client: there is no in-app user list and
/// the password never appears in client state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
}

impl User {
    /// Whether this user may write clients, products, and suppliers.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }
}

/// A bearer token paired with its user.
///
/// This is both the login response body and the single value persisted to
/// durable local storage between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_session_round_trip() {
        let json = r#"{"token":"eyJhbGc.abc.def","user":{"id":"u1","email":"admin@admin.com","role":"admin"}}"#;
        let session: AuthSession = serde_json::from_str(json).expect("deserialize");
        assert!(session.user.is_admin());

        let back = serde_json::to_string(&session).expect("serialize");
        let again: AuthSession = serde_json::from_str(&back).expect("round trip");
        assert_eq!(again, session);
    }
}
