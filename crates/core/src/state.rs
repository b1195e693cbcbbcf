//! Application state and the action reducer.
//!
//! The whole client-side world lives in one [`AppState`] value. State only
//! changes through [`AppState::apply`], a total function from (state, action)
//! to the next state: no transition fails, unknown identifiers are silent
//! no-ops, and the previous state is consumed so it can never be observed
//! after the transition.
//!
//! The reducer is deliberately I/O-free. The two transitions that the
//! application pairs with durable storage ([`Action::LoginSuccess`] and
//! [`Action::Logout`]) get that side effect from the owning store in the
//! client crate, not from this module.

use serde::{Deserialize, Serialize};

use crate::entities::{
    AuthSession, ChatMessage, Client, Collections, Product, Supplier, User, WorkOrder,
};
use crate::types::{ClientId, OrderId, ProductId, SupplierId};

/// The complete client-side application state.
///
/// Entity collections mirror the backend and are only mutated after the
/// backend has acknowledged a write; there is never a client-only,
/// unconfirmed record in here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub clients: Vec<Client>,
    pub products: Vec<Product>,
    pub suppliers: Vec<Supplier>,
    pub orders: Vec<WorkOrder>,
    /// One-way gate distinguishing "still bootstrapping" from "ready".
    pub is_initialized: bool,
    // Chat state
    pub is_chat_open: bool,
    pub is_chat_loading: bool,
    pub chat_messages: Vec<ChatMessage>,
    // Auth state
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
    pub auth_error: Option<String>,
}

/// A discrete state transition.
///
/// One variant per transition family: session, bulk load, initialization,
/// per-entity CRUD, and chat.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Authentication succeeded; store the session and clear any prior error.
    LoginSuccess(AuthSession),
    /// Drop the session and reset every collection.
    Logout,
    /// Authentication failed; record the message, keep collections intact.
    AuthError(String),
    /// Replace all four entity collections wholesale.
    SetInitialState(Collections),
    /// Flip the one-way initialization gate.
    InitializationComplete,

    AddClient(Client),
    UpdateClient(Client),
    DeleteClient(ClientId),

    AddProduct(Product),
    UpdateProduct(Product),
    DeleteProduct(ProductId),

    AddSupplier(Supplier),
    UpdateSupplier(Supplier),
    DeleteSupplier(SupplierId),

    AddOrder(WorkOrder),
    UpdateOrder(WorkOrder),
    DeleteOrder(OrderId),

    /// Flip chat panel visibility.
    ToggleChat,
    /// Append the operator's turn and raise the loading flag.
    ChatMessageStart(String),
    /// Append the model's reply and clear the loading flag.
    ChatMessageSuccess(String),
    /// Append an error as a visible model turn and clear the loading flag.
    ChatMessageError(String),
}

impl AppState {
    /// Apply one action, producing the next state.
    ///
    /// Total: every action on every state yields a state. Deleting or
    /// updating an identifier with no matching record is a no-op, so
    /// replaying an action is harmless.
    #[must_use]
    pub fn apply(mut self, action: Action) -> Self {
        match action {
            Action::LoginSuccess(session) => {
                self.is_authenticated = true;
                self.user = Some(session.user);
                self.token = Some(session.token);
                self.auth_error = None;
                self
            }
            Action::Logout => Self {
                // The initialization gate is one-way; it survives logout.
                is_initialized: self.is_initialized,
                ..Self::default()
            },
            Action::AuthError(message) => {
                self.is_authenticated = false;
                self.user = None;
                self.token = None;
                self.auth_error = Some(message);
                self
            }
            Action::SetInitialState(collections) => {
                self.clients = collections.clients;
                self.products = collections.products;
                self.suppliers = collections.suppliers;
                self.orders = collections.orders;
                self
            }
            Action::InitializationComplete => {
                self.is_initialized = true;
                self
            }

            Action::AddClient(client) => {
                self.clients.push(client);
                self
            }
            Action::UpdateClient(client) => {
                replace_by_id(&mut self.clients, client, |c| &c.id);
                self
            }
            Action::DeleteClient(id) => {
                self.clients.retain(|c| c.id != id);
                self
            }

            Action::AddProduct(product) => {
                self.products.push(product);
                self
            }
            Action::UpdateProduct(product) => {
                replace_by_id(&mut self.products, product, |p| &p.id);
                self
            }
            Action::DeleteProduct(id) => {
                self.products.retain(|p| p.id != id);
                self
            }

            Action::AddSupplier(supplier) => {
                self.suppliers.push(supplier);
                self
            }
            Action::UpdateSupplier(supplier) => {
                replace_by_id(&mut self.suppliers, supplier, |s| &s.id);
                self
            }
            Action::DeleteSupplier(id) => {
                self.suppliers.retain(|s| s.id != id);
                self
            }

            Action::AddOrder(order) => {
                self.orders.push(order);
                self
            }
            Action::UpdateOrder(order) => {
                replace_by_id(&mut self.orders, order, |o| &o.id);
                self
            }
            Action::DeleteOrder(id) => {
                self.orders.retain(|o| o.id != id);
                self
            }

            Action::ToggleChat => {
                self.is_chat_open = !self.is_chat_open;
                self
            }
            Action::ChatMessageStart(text) => {
                self.is_chat_loading = true;
                self.chat_messages.push(ChatMessage::user(text));
                self
            }
            Action::ChatMessageSuccess(text) => {
                self.is_chat_loading = false;
                self.chat_messages.push(ChatMessage::model(text));
                self
            }
            Action::ChatMessageError(message) => {
                self.is_chat_loading = false;
                self.chat_messages
                    .push(ChatMessage::model(format!("Error: {message}")));
                self
            }
        }
    }

    /// The four entity collections as one snapshot value.
    #[must_use]
    pub fn collections(&self) -> Collections {
        Collections {
            clients: self.clients.clone(),
            products: self.products.clone(),
            suppliers: self.suppliers.clone(),
            orders: self.orders.clone(),
        }
    }
}

/// Replace the record whose identifier matches; no match is a silent no-op.
fn replace_by_id<T, I: PartialEq>(records: &mut [T], replacement: T, id_of: impl Fn(&T) -> &I) {
    let matched = records
        .iter()
        .position(|record| id_of(record) == id_of(&replacement));
    if let Some(slot) = matched.and_then(|index| records.get_mut(index)) {
        *slot = replacement;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatRole, UserId, UserRole};

    fn sample_client(id: &str) -> Client {
        Client {
            id: ClientId::new(id),
            name: "Dr. Moreno".to_string(),
            clinic: "Clínica Norte".to_string(),
            phone: "011-4555-0001".to_string(),
            email: "moreno@clinicanorte.example".to_string(),
        }
    }

    fn sample_session() -> AuthSession {
        AuthSession {
            token: "tok-1".to_string(),
            user: User {
                id: UserId::new("u1"),
                email: "admin@admin.com".to_string(),
                role: UserRole::Admin,
            },
        }
    }

    #[test]
    fn test_login_success_sets_session_and_clears_error() {
        let state = AppState {
            auth_error: Some("Credenciales inválidas".to_string()),
            ..AppState::default()
        };
        let state = state.apply(Action::LoginSuccess(sample_session()));

        assert!(state.is_authenticated);
        assert_eq!(state.token.as_deref(), Some("tok-1"));
        assert_eq!(state.auth_error, None);
    }

    #[test]
    fn test_logout_resets_collections_but_keeps_init_gate() {
        let state = AppState::default()
            .apply(Action::LoginSuccess(sample_session()))
            .apply(Action::AddClient(sample_client("c1")))
            .apply(Action::InitializationComplete)
            .apply(Action::Logout);

        assert!(!state.is_authenticated);
        assert!(state.clients.is_empty());
        assert!(state.chat_messages.is_empty());
        assert!(state.is_initialized);
    }

    #[test]
    fn test_auth_error_keeps_collections() {
        let state = AppState::default()
            .apply(Action::AddClient(sample_client("c1")))
            .apply(Action::AuthError("El token no es válido".to_string()));

        assert_eq!(state.clients.len(), 1);
        assert!(!state.is_authenticated);
        assert_eq!(state.auth_error.as_deref(), Some("El token no es válido"));
    }

    #[test]
    fn test_set_initial_state_replaces_wholesale() {
        let state = AppState::default()
            .apply(Action::AddClient(sample_client("old")))
            .apply(Action::SetInitialState(Collections {
                clients: vec![sample_client("new")],
                ..Collections::default()
            }));

        assert_eq!(state.clients.len(), 1);
        assert_eq!(state.clients.first().map(|c| c.id.as_str()), Some("new"));
    }

    #[test]
    fn test_update_replaces_matching_record_only() {
        let mut updated = sample_client("c1");
        updated.name = "Dra. Vidal".to_string();

        let state = AppState::default()
            .apply(Action::AddClient(sample_client("c1")))
            .apply(Action::AddClient(sample_client("c2")))
            .apply(Action::UpdateClient(updated));

        let names: Vec<&str> = state.clients.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Dra. Vidal", "Dr. Moreno"]);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let state = AppState::default()
            .apply(Action::AddClient(sample_client("c1")))
            .apply(Action::UpdateClient(sample_client("ghost")));

        assert_eq!(state.clients.len(), 1);
        assert_eq!(state.clients.first().map(|c| c.id.as_str()), Some("c1"));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let once = AppState::default()
            .apply(Action::AddClient(sample_client("c1")))
            .apply(Action::DeleteClient(ClientId::new("c1")));
        let twice = once.clone().apply(Action::DeleteClient(ClientId::new("c1")));

        assert_eq!(once, twice);
        assert!(twice.clients.is_empty());
    }

    #[test]
    fn test_toggle_chat_flips_visibility() {
        let state = AppState::default().apply(Action::ToggleChat);
        assert!(state.is_chat_open);
        let state = state.apply(Action::ToggleChat);
        assert!(!state.is_chat_open);
    }

    #[test]
    fn test_chat_message_lifecycle() {
        let state = AppState::default()
            .apply(Action::ChatMessageStart("¿Cuántas órdenes hay?".to_string()))
            .apply(Action::ChatMessageSuccess("Hay 12 órdenes.".to_string()));

        assert!(!state.is_chat_loading);
        assert_eq!(state.chat_messages.len(), 2);
        assert_eq!(
            state.chat_messages.first().map(|m| m.role),
            Some(ChatRole::User)
        );
        assert_eq!(
            state.chat_messages.last().map(|m| m.role),
            Some(ChatRole::Model)
        );
    }

    #[test]
    fn test_chat_error_becomes_prefixed_model_turn() {
        let state = AppState::default()
            .apply(Action::ChatMessageStart("hola".to_string()))
            .apply(Action::ChatMessageError("service unreachable".to_string()));

        assert!(!state.is_chat_loading);
        assert_eq!(
            state.chat_messages.last().map(|m| m.content.as_str()),
            Some("Error: service unreachable")
        );
        assert_eq!(
            state.chat_messages.last().map(|m| m.role),
            Some(ChatRole::Model)
        );
    }

    #[test]
    fn test_initialization_gate_is_one_way() {
        let state = AppState::default()
            .apply(Action::InitializationComplete)
            .apply(Action::AuthError("x".to_string()))
            .apply(Action::ToggleChat);
        assert!(state.is_initialized);
    }
}
