//! Integration test support for LabFlow.
//!
//! Provides [`MockBackend`], an in-process HTTP server implementing the
//! backend API contract the client expects: token-authenticated CRUD on the
//! four entity collections, the auth endpoint pair, and role-based write
//! authorization. Tests drive the real `Store` against it over real HTTP.
//!
//! The mock stores documents as raw JSON (the real backend is schemaless
//! too); the typed layer under test lives entirely in the client.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use url::Url;

const COLLECTIONS: [&str; 4] = ["clients", "products", "suppliers", "orders"];

/// A registered account on the mock backend.
#[derive(Debug, Clone)]
struct Account {
    id: String,
    email: String,
    password: String,
    role: String,
}

impl Account {
    fn as_user(&self) -> Value {
        json!({ "id": self.id, "email": self.email, "role": self.role })
    }
}

#[derive(Debug, Default)]
struct BackendData {
    accounts: Vec<Account>,
    /// token -> account id
    tokens: HashMap<String, String>,
    /// collection name -> documents
    collections: HashMap<&'static str, Vec<Value>>,
}

type Shared = Arc<Mutex<BackendData>>;

/// In-process mock of the backend API.
///
/// The server task is aborted when this handle drops.
pub struct MockBackend {
    addr: SocketAddr,
    data: Shared,
    server: tokio::task::JoinHandle<()>,
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

impl MockBackend {
    /// Bind an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics on bind failure; tests cannot proceed without the server.
    pub async fn spawn() -> Self {
        let data: Shared = Shared::default();

        let app = Router::new()
            .route("/api/health", get(health))
            .route("/api/auth/register", post(register))
            .route("/api/auth/login", post(login))
            .route("/api/auth/change-password", post(change_password))
            .route("/api/{collection}", get(list_docs).post(create_doc))
            .route(
                "/api/{collection}/{id}",
                axum::routing::put(update_doc).delete(delete_doc),
            )
            .with_state(Arc::clone(&data));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock backend");
        });

        Self { addr, data, server }
    }

    /// Base URL for the client (`http://127.0.0.1:{port}/api`).
    ///
    /// # Panics
    ///
    /// Never in practice; the formatted URL is always valid.
    #[must_use]
    pub fn api_url(&self) -> Url {
        Url::parse(&format!("http://{}/api", self.addr)).expect("valid url")
    }

    /// Create an account directly (bypassing the register endpoint).
    pub async fn seed_account(&self, email: &str, password: &str, role: &str) {
        let mut data = self.data.lock().await;
        let id = uuid::Uuid::new_v4().to_string();
        data.accounts.push(Account {
            id,
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        });
    }

    /// Insert a document with a server-assigned id; returns the id.
    pub async fn seed_doc(&self, collection: &'static str, mut doc: Value) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        doc["id"] = json!(id.clone());
        let mut data = self.data.lock().await;
        data.collections.entry(collection).or_default().push(doc);
        id
    }

    /// Snapshot of one collection's documents.
    pub async fn docs(&self, collection: &str) -> Vec<Value> {
        let data = self.data.lock().await;
        COLLECTIONS
            .iter()
            .find(|name| ***name == *collection)
            .and_then(|name| data.collections.get(name))
            .cloned()
            .unwrap_or_default()
    }

    /// Invalidate every issued token (simulates expiry across restarts).
    pub async fn revoke_tokens(&self) {
        self.data.lock().await.tokens.clear();
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn error(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "msg": msg }))).into_response()
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn register(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
    let Some(email) = body["email"].as_str() else {
        return error(StatusCode::BAD_REQUEST, "El email es requerido");
    };
    let Some(password) = body["password"].as_str() else {
        return error(StatusCode::BAD_REQUEST, "La contraseña es requerida");
    };
    let role = body["role"].as_str().unwrap_or("user").to_string();

    let mut data = data.lock().await;
    if data.accounts.iter().any(|a| a.email == email) {
        return error(StatusCode::BAD_REQUEST, "El usuario ya existe");
    }
    data.accounts.push(Account {
        id: uuid::Uuid::new_v4().to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role,
    });
    (
        StatusCode::CREATED,
        Json(json!({ "msg": "Usuario registrado exitosamente" })),
    )
        .into_response()
}

async fn login(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let mut data = data.lock().await;
    let Some(account) = data
        .accounts
        .iter()
        .find(|a| a.email == email && a.password == password)
        .cloned()
    else {
        return error(StatusCode::BAD_REQUEST, "Credenciales inválidas");
    };

    let token = uuid::Uuid::new_v4().to_string();
    data.tokens.insert(token.clone(), account.id.clone());
    Json(json!({ "token": token, "user": account.as_user() })).into_response()
}

async fn change_password(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut data = data.lock().await;
    let account_id = match authenticate(&data, &headers) {
        Ok(account) => account.id,
        Err(response) => return response,
    };

    let current = body["currentPassword"].as_str().unwrap_or_default();
    let new = body["newPassword"].as_str().unwrap_or_default();

    let Some(account) = data.accounts.iter_mut().find(|a| a.id == account_id) else {
        return error(StatusCode::UNAUTHORIZED, "El token no es válido");
    };
    if account.password != current {
        return error(StatusCode::BAD_REQUEST, "La contraseña actual es incorrecta");
    }
    account.password = new.to_string();
    Json(json!({ "msg": "Contraseña actualizada" })).into_response()
}

/// Resolve the bearer token to an account.
fn authenticate(data: &BackendData, headers: &HeaderMap) -> Result<Account, Response> {
    let Some(header) = headers.get("authorization").and_then(|v| v.to_str().ok()) else {
        return Err(error(
            StatusCode::UNAUTHORIZED,
            "No hay token, autorización denegada",
        ));
    };
    let Some(token) = header.strip_prefix("Bearer ") else {
        return Err(error(
            StatusCode::UNAUTHORIZED,
            "Formato de token no válido, autorización denegada",
        ));
    };
    data.tokens
        .get(token)
        .and_then(|account_id| data.accounts.iter().find(|a| a.id == *account_id))
        .cloned()
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "El token no es válido"))
}

/// Role rules: writes need admin, except order updates (admin or user).
fn authorize_write(account: &Account, collection: &str, is_update: bool) -> Result<(), Response> {
    let allowed = account.role == "admin" || (collection == "orders" && is_update);
    if allowed {
        Ok(())
    } else {
        Err(error(
            StatusCode::FORBIDDEN,
            "Acceso prohibido. No tienes los permisos necesarios.",
        ))
    }
}

fn known_collection(collection: &str) -> Result<&'static str, Response> {
    COLLECTIONS
        .iter()
        .find(|name| ***name == *collection)
        .copied()
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "colección desconocida"))
}

async fn list_docs(
    State(data): State<Shared>,
    Path(collection): Path<String>,
    headers: HeaderMap,
) -> Response {
    let data = data.lock().await;
    if let Err(response) = authenticate(&data, &headers) {
        return response;
    }
    let collection = match known_collection(&collection) {
        Ok(name) => name,
        Err(response) => return response,
    };
    Json(json!(
        data.collections.get(collection).cloned().unwrap_or_default()
    ))
    .into_response()
}

async fn create_doc(
    State(data): State<Shared>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(mut doc): Json<Value>,
) -> Response {
    let mut data = data.lock().await;
    let account = match authenticate(&data, &headers) {
        Ok(account) => account,
        Err(response) => return response,
    };
    let collection = match known_collection(&collection) {
        Ok(name) => name,
        Err(response) => return response,
    };
    if let Err(response) = authorize_write(&account, collection, false) {
        return response;
    }

    doc["id"] = json!(uuid::Uuid::new_v4().to_string());
    data.collections
        .entry(collection)
        .or_default()
        .push(doc.clone());
    (StatusCode::CREATED, Json(doc)).into_response()
}

async fn update_doc(
    State(data): State<Shared>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(mut doc): Json<Value>,
) -> Response {
    let mut data = data.lock().await;
    let account = match authenticate(&data, &headers) {
        Ok(account) => account,
        Err(response) => return response,
    };
    let collection = match known_collection(&collection) {
        Ok(name) => name,
        Err(response) => return response,
    };
    if let Err(response) = authorize_write(&account, collection, true) {
        return response;
    }

    let id_value = json!(id);
    doc["id"] = id_value.clone();
    let docs = data.collections.entry(collection).or_default();
    let Some(slot) = docs.iter_mut().find(|existing| existing["id"] == id_value) else {
        return error(StatusCode::NOT_FOUND, "documento no encontrado");
    };
    *slot = doc.clone();
    Json(doc).into_response()
}

async fn delete_doc(
    State(data): State<Shared>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let mut data = data.lock().await;
    let account = match authenticate(&data, &headers) {
        Ok(account) => account,
        Err(response) => return response,
    };
    let collection = match known_collection(&collection) {
        Ok(name) => name,
        Err(response) => return response,
    };
    if let Err(response) = authorize_write(&account, collection, false) {
        return response;
    }

    let id_value = json!(id);
    let docs = data.collections.entry(collection).or_default();
    docs.retain(|existing| existing["id"] != id_value);
    Json(json!({ "message": "eliminado" })).into_response()
}
