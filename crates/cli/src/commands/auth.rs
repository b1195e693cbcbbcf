//! Session commands: login, logout, register, change-password.

use labflow_client::Store;
use labflow_core::UserRole;

use super::{CommandError, ensure_session};

/// Log in and persist the session for subsequent commands.
pub async fn login(store: &mut Store, email: &str, password: &str) -> Result<(), CommandError> {
    store.login(email, password).await?;

    let state = store.state();
    let user = state
        .user
        .as_ref()
        .ok_or("login succeeded but no user in state")?;
    println!("logged in as {} ({})", user.email, user.role);
    println!(
        "loaded {} clients, {} products, {} suppliers, {} orders",
        state.clients.len(),
        state.products.len(),
        state.suppliers.len(),
        state.orders.len()
    );
    Ok(())
}

/// Log out and remove the persisted session.
pub fn logout(store: &mut Store) {
    store.logout();
    println!("logged out");
}

/// Register a new account.
pub async fn register(
    store: &Store,
    email: &str,
    password: &str,
    role: Option<&str>,
) -> Result<(), CommandError> {
    let role = role.map(str::parse::<UserRole>).transpose()?;
    let message = store.register(email, password, role).await?;
    println!("{message}");
    Ok(())
}

/// Change the current account's password.
pub async fn change_password(
    store: &Store,
    current: &str,
    new: &str,
) -> Result<(), CommandError> {
    ensure_session(store)?;
    if new.chars().count() < 6 {
        return Err("the new password must be at least 6 characters".into());
    }
    store.change_password(current, new).await?;
    println!("password updated");
    Ok(())
}
