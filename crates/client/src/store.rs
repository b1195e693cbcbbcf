//! The application state store.
//!
//! [`Store`] is an explicitly owned object: whoever drives the application
//! (the CLI, a test) constructs one and passes it around - there is no
//! process-wide singleton. It owns the [`AppState`] value, the API client,
//! the session file, and the optional chat bridge.
//!
//! Every operation follows the acknowledge-then-mirror discipline: the
//! backend call completes first, then exactly one reducer transition applies
//! the server's authoritative result. A failed call leaves state untouched
//! and propagates to the caller - except during session bootstrap (absorbed
//! into a logout) and chat (absorbed into an error turn).

use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument, warn};

use labflow_core::{
    Action, AppState, Client, ClientId, EmptyOrderError, NewClient, NewProduct, NewSupplier,
    NewWorkOrder, OrderId, Product, ProductId, Supplier, SupplierId, UserRole, WorkOrder,
};

use crate::api::{ApiClient, ApiError};
use crate::chat::{ChatClient, prompt};
use crate::config::ClientConfig;
use crate::session::{SessionError, SessionStore};

/// Shown as the chat error turn when no chat credentials are configured.
const CHAT_UNAVAILABLE: &str = "La configuración de la API de IA no está disponible.";

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or never received the request.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// An order draft had no usable line items; nothing was sent.
    #[error(transparent)]
    EmptyOrder(#[from] EmptyOrderError),

    /// The operation requires a logged-in session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Building the store's session persistence failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Building the chat bridge failed.
    #[error(transparent)]
    Chat(#[from] crate::chat::ChatError),
}

/// The state store plus its collaborators.
pub struct Store {
    state: AppState,
    api: ApiClient,
    session: SessionStore,
    chat: Option<ChatClient>,
}

impl Store {
    /// Build a store from configuration: API client, platform session file,
    /// and chat bridge when credentials are present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Session`] when no config directory exists, or
    /// [`StoreError::Chat`] when the configured chat credentials are
    /// malformed.
    pub fn from_config(config: &ClientConfig) -> Result<Self, StoreError> {
        let chat = config
            .chat
            .as_ref()
            .map(ChatClient::new)
            .transpose()?;
        Ok(Self::new(
            ApiClient::new(config.api_url.clone()),
            SessionStore::from_project_dirs()?,
            chat,
        ))
    }

    /// Build a store from explicit collaborators (dependency injection).
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore, chat: Option<ChatClient>) -> Self {
        Self {
            state: AppState::default(),
            api,
            session,
            chat,
        }
    }

    /// The current application state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply one reducer transition.
    ///
    /// This is also where the two storage-coupled transitions get their side
    /// effect: `LoginSuccess` persists the session pair, `Logout` removes
    /// it. Persistence failures are logged and absorbed - transitions are
    /// total and cannot fail.
    pub fn dispatch(&mut self, action: Action) {
        match &action {
            Action::LoginSuccess(session) => {
                if let Err(error) = self.session.save(session) {
                    warn!(%error, "failed to persist session");
                }
            }
            Action::Logout => {
                if let Err(error) = self.session.clear() {
                    warn!(%error, "failed to remove persisted session");
                }
            }
            _ => {}
        }
        self.state = std::mem::take(&mut self.state).apply(action);
    }

    fn token(&self) -> Result<String, StoreError> {
        self.state
            .token
            .clone()
            .ok_or(StoreError::NotAuthenticated)
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Restore a persisted session, if any, then mark initialization done.
    ///
    /// When a session exists, the four collections are fetched concurrently;
    /// any failure - expired token, unreachable backend, anything - is
    /// treated as an authentication failure and absorbed into a logout. The
    /// caller never learns the cause.
    #[instrument(skip_all)]
    pub async fn initialize(&mut self) {
        if let Some(session) = self.session.load() {
            let token = session.token.clone();
            self.dispatch(Action::LoginSuccess(session));

            match self.api.fetch_collections(&token).await {
                Ok(collections) => {
                    info!("session restored, collections loaded");
                    self.dispatch(Action::SetInitialState(collections));
                }
                Err(error) => {
                    warn!(%error, "session restore failed, logging out");
                    self.dispatch(Action::Logout);
                }
            }
        }
        self.dispatch(Action::InitializationComplete);
    }

    /// Log in, then load all four collections.
    ///
    /// # Errors
    ///
    /// Re-raises the underlying [`ApiError`] after recording it in state, so
    /// the presentation layer can render the message.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), StoreError> {
        let session = match self.api.login(email, password).await {
            Ok(session) => session,
            Err(error) => {
                self.dispatch(Action::AuthError(error.to_string()));
                return Err(error.into());
            }
        };

        let token = session.token.clone();
        self.dispatch(Action::LoginSuccess(session));

        match self.api.fetch_collections(&token).await {
            Ok(collections) => {
                self.dispatch(Action::SetInitialState(collections));
                Ok(())
            }
            Err(error) => {
                self.dispatch(Action::AuthError(error.to_string()));
                Err(error.into())
            }
        }
    }

    /// Drop the session and reset all collections.
    pub fn logout(&mut self) {
        self.dispatch(Action::Logout);
    }

    /// Register a new account. Returns the server's confirmation message.
    ///
    /// Registration does not touch state: the new user still has to log in.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the register endpoint.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Option<UserRole>,
    ) -> Result<String, StoreError> {
        Ok(self.api.register(email, password, role).await?)
    }

    /// Change the authenticated user's password.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotAuthenticated`] without a session, otherwise any
    /// [`ApiError`].
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), StoreError> {
        let token = self.token()?;
        Ok(self
            .api
            .change_password(&token, current_password, new_password)
            .await?)
    }

    // =========================================================================
    // Clients
    // =========================================================================

    /// # Errors
    ///
    /// Propagates the [`ApiError`] uncaught; state is untouched on failure.
    pub async fn add_client(&mut self, client: NewClient) -> Result<Client, StoreError> {
        let token = self.token()?;
        let created = self.api.create_client(&token, &client).await?;
        self.dispatch(Action::AddClient(created.clone()));
        Ok(created)
    }

    /// # Errors
    ///
    /// Propagates the [`ApiError`] uncaught; state is untouched on failure.
    pub async fn update_client(&mut self, client: Client) -> Result<Client, StoreError> {
        let token = self.token()?;
        let updated = self.api.update_client(&token, &client).await?;
        self.dispatch(Action::UpdateClient(updated.clone()));
        Ok(updated)
    }

    /// # Errors
    ///
    /// Propagates the [`ApiError`] uncaught; state is untouched on failure.
    pub async fn delete_client(&mut self, id: ClientId) -> Result<(), StoreError> {
        let token = self.token()?;
        self.api.delete_client(&token, &id).await?;
        self.dispatch(Action::DeleteClient(id));
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// # Errors
    ///
    /// Propagates the [`ApiError`] uncaught; state is untouched on failure.
    pub async fn add_product(&mut self, product: NewProduct) -> Result<Product, StoreError> {
        let token = self.token()?;
        let created = self.api.create_product(&token, &product).await?;
        self.dispatch(Action::AddProduct(created.clone()));
        Ok(created)
    }

    /// # Errors
    ///
    /// Propagates the [`ApiError`] uncaught; state is untouched on failure.
    pub async fn update_product(&mut self, product: Product) -> Result<Product, StoreError> {
        let token = self.token()?;
        let updated = self.api.update_product(&token, &product).await?;
        self.dispatch(Action::UpdateProduct(updated.clone()));
        Ok(updated)
    }

    /// Delete a product from the catalog.
    ///
    /// Orders referencing it are intentionally left alone; their totals
    /// simply lose that item's contribution.
    ///
    /// # Errors
    ///
    /// Propagates the [`ApiError`] uncaught; state is untouched on failure.
    pub async fn delete_product(&mut self, id: ProductId) -> Result<(), StoreError> {
        let token = self.token()?;
        self.api.delete_product(&token, &id).await?;
        self.dispatch(Action::DeleteProduct(id));
        Ok(())
    }

    // =========================================================================
    // Suppliers
    // =========================================================================

    /// # Errors
    ///
    /// Propagates the [`ApiError`] uncaught; state is untouched on failure.
    pub async fn add_supplier(&mut self, supplier: NewSupplier) -> Result<Supplier, StoreError> {
        let token = self.token()?;
        let created = self.api.create_supplier(&token, &supplier).await?;
        self.dispatch(Action::AddSupplier(created.clone()));
        Ok(created)
    }

    /// # Errors
    ///
    /// Propagates the [`ApiError`] uncaught; state is untouched on failure.
    pub async fn update_supplier(&mut self, supplier: Supplier) -> Result<Supplier, StoreError> {
        let token = self.token()?;
        let updated = self.api.update_supplier(&token, &supplier).await?;
        self.dispatch(Action::UpdateSupplier(updated.clone()));
        Ok(updated)
    }

    /// # Errors
    ///
    /// Propagates the [`ApiError`] uncaught; state is untouched on failure.
    pub async fn delete_supplier(&mut self, id: SupplierId) -> Result<(), StoreError> {
        let token = self.token()?;
        self.api.delete_supplier(&token, &id).await?;
        self.dispatch(Action::DeleteSupplier(id));
        Ok(())
    }

    // =========================================================================
    // Work orders
    // =========================================================================

    /// Create a work order.
    ///
    /// The draft is normalized first: line items with an empty product
    /// reference are stripped, and a draft with none left is rejected before
    /// any network call.
    ///
    /// # Errors
    ///
    /// [`StoreError::EmptyOrder`] for an unusable draft, otherwise any
    /// [`ApiError`]; state is untouched on failure.
    pub async fn add_order(&mut self, order: NewWorkOrder) -> Result<WorkOrder, StoreError> {
        let order = order.normalized()?;
        let token = self.token()?;
        let created = self.api.create_order(&token, &order).await?;
        self.dispatch(Action::AddOrder(created.clone()));
        Ok(created)
    }

    /// Update a work order (same normalization as [`Store::add_order`]).
    ///
    /// # Errors
    ///
    /// [`StoreError::EmptyOrder`] for an unusable draft, otherwise any
    /// [`ApiError`]; state is untouched on failure.
    pub async fn update_order(&mut self, order: WorkOrder) -> Result<WorkOrder, StoreError> {
        let order = order.normalized()?;
        let token = self.token()?;
        let updated = self.api.update_order(&token, &order).await?;
        self.dispatch(Action::UpdateOrder(updated.clone()));
        Ok(updated)
    }

    /// # Errors
    ///
    /// Propagates the [`ApiError`] uncaught; state is untouched on failure.
    pub async fn delete_order(&mut self, id: OrderId) -> Result<(), StoreError> {
        let token = self.token()?;
        self.api.delete_order(&token, &id).await?;
        self.dispatch(Action::DeleteOrder(id));
        Ok(())
    }

    // =========================================================================
    // Chat
    // =========================================================================

    /// Flip chat panel visibility.
    pub fn toggle_chat(&mut self) {
        self.dispatch(Action::ToggleChat);
    }

    /// Send a chat message and append the reply to the conversation.
    ///
    /// Failures never propagate: missing credentials, transport errors, and
    /// service errors all become a visible error turn in the conversation.
    /// A no-op when not logged in.
    #[instrument(skip_all)]
    pub async fn send_chat_message(&mut self, text: &str) {
        if !self.state.is_authenticated {
            return;
        }
        self.dispatch(Action::ChatMessageStart(text.to_string()));

        let Some(chat) = self.chat.clone() else {
            self.dispatch(Action::ChatMessageError(CHAT_UNAVAILABLE.to_string()));
            return;
        };

        let system = prompt::system_prompt(&self.state.collections(), Utc::now().date_naive());
        let messages = prompt::conversation(&self.state.chat_messages);

        match chat.complete(system, messages).await {
            Ok(reply) => self.dispatch(Action::ChatMessageSuccess(reply)),
            Err(error) => {
                warn!(%error, "chat completion failed");
                self.dispatch(Action::ChatMessageError(error.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labflow_core::{AuthSession, User, UserId};
    use url::Url;

    fn test_store(dir: &tempfile::TempDir) -> Store {
        Store::new(
            ApiClient::new(Url::parse("http://127.0.0.1:9/api").expect("url")),
            SessionStore::at_path(dir.path().join("session.json")),
            None,
        )
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
    fn test_login_and_logout_are_the_only_persisting_transitions() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = test_store(&dir);
        let session_file = SessionStore::at_path(dir.path().join("session.json"));

        // LoginSuccess persists the pair.
        store.dispatch(Action::LoginSuccess(sample_session()));
        assert!(session_file.load().is_some());

        // Other transitions leave the file alone - including AuthError,
        // which clears in-memory auth state but not durable storage.
        store.dispatch(Action::ToggleChat);
        store.dispatch(Action::AuthError("El token no es válido".to_string()));
        store.dispatch(Action::InitializationComplete);
        assert!(session_file.load().is_some());

        // Logout removes it.
        store.dispatch(Action::Logout);
        assert!(session_file.load().is_none());
    }

    #[test]
    fn test_dispatch_applies_reducer() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = test_store(&dir);

        store.dispatch(Action::LoginSuccess(sample_session()));
        assert!(store.state().is_authenticated);
        assert_eq!(store.state().token.as_deref(), Some("tok-1"));

        store.dispatch(Action::Logout);
        assert!(!store.state().is_authenticated);
        assert!(store.state().token.is_none());
    }
}
