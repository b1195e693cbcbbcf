//! Typed REST client for the LabFlow backend API.
//!
//! One method per (entity × CRUD verb) plus the auth endpoints and the
//! four-way bootstrap fetch. Every call is fire-and-forward: a non-success
//! response becomes an [`ApiError`] immediately, with no retry. Writes
//! return the server's authoritative representation, which is what callers
//! must feed into the state store - never the locally-built payload.

mod error;

pub use error::ApiError;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use labflow_core::{
    AuthSession, Client, ClientId, Collections, NewClient, NewProduct, NewSupplier, NewWorkOrder,
    OrderId, Product, ProductId, Supplier, SupplierId, UserRole, WorkOrder,
};

/// Backend API client.
///
/// Cheap to clone; all clones share one connection pool. The bearer token is
/// deliberately not held here - the state store owns the canonical session
/// and passes the token per call.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

/// Acknowledgement body returned by auth endpoints (`{"msg": ...}`).
#[derive(Debug, serde::Deserialize)]
struct Acknowledgement {
    #[serde(alias = "message")]
    msg: String,
}

/// Register payload; role defaults server-side to `user` when omitted.
#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<UserRole>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

impl ApiClient {
    /// Create a new API client for the given base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{path}",
            self.inner.base_url.as_str().trim_end_matches('/')
        )
    }

    /// Send a request and decode the response.
    ///
    /// Success bodies decode into `T`; failure bodies are captured as raw
    /// JSON and classified by status code.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        auth_endpoint: bool,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| ApiError::Parse(format!("failed to decode response: {e}")))
        } else {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            Err(ApiError::from_response(status, body, auth_endpoint))
        }
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Authenticate and obtain a bearer token.
    ///
    /// # Errors
    ///
    /// `ApiError::Authentication` on bad credentials; transport and server
    /// errors as usual.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let request = self
            .inner
            .client
            .post(self.endpoint("auth/login"))
            .json(&LoginRequest { email, password });
        self.send(request, true).await
    }

    /// Register a new account. Returns the server's confirmation message.
    ///
    /// # Errors
    ///
    /// `ApiError::Authentication` when the email is already taken (the
    /// backend answers 400 on the auth route).
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Option<UserRole>,
    ) -> Result<String, ApiError> {
        let request = self
            .inner
            .client
            .post(self.endpoint("auth/register"))
            .json(&RegisterRequest {
                email,
                password,
                role,
            });
        let ack: Acknowledgement = self.send(request, true).await?;
        Ok(ack.msg)
    }

    /// Change the authenticated user's password.
    ///
    /// # Errors
    ///
    /// `ApiError::Authentication` when the current password does not match.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .post(self.endpoint("auth/change-password"))
            .bearer_auth(token)
            .json(&ChangePasswordRequest {
                current_password,
                new_password,
            });
        let _: Acknowledgement = self.send(request, true).await?;
        Ok(())
    }

    /// Public liveness probe.
    ///
    /// # Errors
    ///
    /// Transport or server errors when the backend is unreachable/unhealthy.
    pub async fn health(&self) -> Result<(), ApiError> {
        let request = self.inner.client.get(self.endpoint("health"));
        let _: serde_json::Value = self.send(request, false).await?;
        Ok(())
    }

    // =========================================================================
    // Generic CRUD plumbing
    // =========================================================================

    async fn list<T: DeserializeOwned>(
        &self,
        token: &str,
        collection: &str,
    ) -> Result<Vec<T>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.endpoint(collection))
            .bearer_auth(token);
        self.send(request, false).await
    }

    async fn create<T: DeserializeOwned>(
        &self,
        token: &str,
        collection: &str,
        payload: &impl Serialize,
    ) -> Result<T, ApiError> {
        let request = self
            .inner
            .client
            .post(self.endpoint(collection))
            .bearer_auth(token)
            .json(payload);
        self.send(request, false).await
    }

    async fn update<T: DeserializeOwned>(
        &self,
        token: &str,
        collection: &str,
        id: &str,
        payload: &impl Serialize,
    ) -> Result<T, ApiError> {
        let request = self
            .inner
            .client
            .put(self.endpoint(&format!("{collection}/{id}")))
            .bearer_auth(token)
            .json(payload);
        self.send(request, false).await
    }

    async fn delete(&self, token: &str, collection: &str, id: &str) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .delete(self.endpoint(&format!("{collection}/{id}")))
            .bearer_auth(token);
        // The backend acknowledges deletes with a message body; discard it.
        let _: serde_json::Value = self.send(request, false).await?;
        Ok(())
    }

    // =========================================================================
    // Clients
    // =========================================================================

    /// # Errors
    ///
    /// Any [`ApiError`]; requires a valid token.
    pub async fn list_clients(&self, token: &str) -> Result<Vec<Client>, ApiError> {
        self.list(token, "clients").await
    }

    /// # Errors
    ///
    /// `ApiError::Authorization` unless the user is an admin.
    #[instrument(skip(self, token, client))]
    pub async fn create_client(&self, token: &str, client: &NewClient) -> Result<Client, ApiError> {
        self.create(token, "clients", client).await
    }

    /// # Errors
    ///
    /// `ApiError::Authorization` unless the user is an admin.
    #[instrument(skip(self, token, client), fields(id = %client.id))]
    pub async fn update_client(&self, token: &str, client: &Client) -> Result<Client, ApiError> {
        self.update(token, "clients", client.id.as_str(), client)
            .await
    }

    /// # Errors
    ///
    /// `ApiError::Authorization` unless the user is an admin.
    #[instrument(skip(self, token))]
    pub async fn delete_client(&self, token: &str, id: &ClientId) -> Result<(), ApiError> {
        self.delete(token, "clients", id.as_str()).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// # Errors
    ///
    /// Any [`ApiError`]; requires a valid token.
    pub async fn list_products(&self, token: &str) -> Result<Vec<Product>, ApiError> {
        self.list(token, "products").await
    }

    /// # Errors
    ///
    /// `ApiError::Authorization` unless the user is an admin.
    #[instrument(skip(self, token, product))]
    pub async fn create_product(
        &self,
        token: &str,
        product: &NewProduct,
    ) -> Result<Product, ApiError> {
        self.create(token, "products", product).await
    }

    /// # Errors
    ///
    /// `ApiError::Authorization` unless the user is an admin.
    #[instrument(skip(self, token, product), fields(id = %product.id))]
    pub async fn update_product(&self, token: &str, product: &Product) -> Result<Product, ApiError> {
        self.update(token, "products", product.id.as_str(), product)
            .await
    }

    /// # Errors
    ///
    /// `ApiError::Authorization` unless the user is an admin.
    #[instrument(skip(self, token))]
    pub async fn delete_product(&self, token: &str, id: &ProductId) -> Result<(), ApiError> {
        self.delete(token, "products", id.as_str()).await
    }

    // =========================================================================
    // Suppliers
    // =========================================================================

    /// # Errors
    ///
    /// Any [`ApiError`]; requires a valid token.
    pub async fn list_suppliers(&self, token: &str) -> Result<Vec<Supplier>, ApiError> {
        self.list(token, "suppliers").await
    }

    /// # Errors
    ///
    /// `ApiError::Authorization` unless the user is an admin.
    #[instrument(skip(self, token, supplier))]
    pub async fn create_supplier(
        &self,
        token: &str,
        supplier: &NewSupplier,
    ) -> Result<Supplier, ApiError> {
        self.create(token, "suppliers", supplier).await
    }

    /// # Errors
    ///
    /// `ApiError::Authorization` unless the user is an admin.
    #[instrument(skip(self, token, supplier), fields(id = %supplier.id))]
    pub async fn update_supplier(
        &self,
        token: &str,
        supplier: &Supplier,
    ) -> Result<Supplier, ApiError> {
        self.update(token, "suppliers", supplier.id.as_str(), supplier)
            .await
    }

    /// # Errors
    ///
    /// `ApiError::Authorization` unless the user is an admin.
    #[instrument(skip(self, token))]
    pub async fn delete_supplier(&self, token: &str, id: &SupplierId) -> Result<(), ApiError> {
        self.delete(token, "suppliers", id.as_str()).await
    }

    // =========================================================================
    // Work orders
    // =========================================================================

    /// # Errors
    ///
    /// Any [`ApiError`]; requires a valid token.
    pub async fn list_orders(&self, token: &str) -> Result<Vec<WorkOrder>, ApiError> {
        self.list(token, "orders").await
    }

    /// # Errors
    ///
    /// `ApiError::Authorization` unless the user is an admin.
    #[instrument(skip(self, token, order))]
    pub async fn create_order(
        &self,
        token: &str,
        order: &NewWorkOrder,
    ) -> Result<WorkOrder, ApiError> {
        self.create(token, "orders", order).await
    }

    /// Update a work order. Both roles may do this (status moves along the
    /// pipeline are everyday work, not an admin action).
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; requires a valid token.
    #[instrument(skip(self, token, order), fields(id = %order.id))]
    pub async fn update_order(&self, token: &str, order: &WorkOrder) -> Result<WorkOrder, ApiError> {
        self.update(token, "orders", order.id.as_str(), order).await
    }

    /// # Errors
    ///
    /// `ApiError::Authorization` unless the user is an admin.
    #[instrument(skip(self, token))]
    pub async fn delete_order(&self, token: &str, id: &OrderId) -> Result<(), ApiError> {
        self.delete(token, "orders", id.as_str()).await
    }

    // =========================================================================
    // Bootstrap
    // =========================================================================

    /// Fetch all four collections concurrently.
    ///
    /// All four requests are in flight at once; the first failure aborts the
    /// whole fetch. Callers treat any failure as an authentication problem
    /// (there is no partial bootstrap).
    ///
    /// # Errors
    ///
    /// The first [`ApiError`] among the four requests.
    #[instrument(skip_all)]
    pub async fn fetch_collections(&self, token: &str) -> Result<Collections, ApiError> {
        let (clients, products, suppliers, orders) = tokio::try_join!(
            self.list_clients(token),
            self.list_products(token),
            self.list_suppliers(token),
            self.list_orders(token),
        )?;

        Ok(Collections {
            clients,
            products,
            suppliers,
            orders,
        })
    }
}
