//! Client management commands.

use clap::Subcommand;

use labflow_client::Store;
use labflow_core::{Client, ClientId, NewClient};

use super::{CommandError, ensure_session};

#[derive(Subcommand)]
pub enum ClientAction {
    /// List all clients
    List,
    /// Add a client (admin role)
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        clinic: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
    },
    /// Update a client (admin role); omitted fields keep their value
    Update {
        /// Client identifier
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        clinic: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a client (admin role)
    Rm {
        /// Client identifier
        id: String,
    },
}

pub async fn run(store: &mut Store, action: ClientAction) -> Result<(), CommandError> {
    ensure_session(store)?;
    match action {
        ClientAction::List => {
            for client in &store.state().clients {
                println!(
                    "{}  {}  {}  {}  {}",
                    client.id, client.name, client.clinic, client.phone, client.email
                );
            }
        }
        ClientAction::Add {
            name,
            clinic,
            phone,
            email,
        } => {
            let created = store
                .add_client(NewClient {
                    name,
                    clinic,
                    phone,
                    email,
                })
                .await?;
            println!("created client {}", created.id);
        }
        ClientAction::Update {
            id,
            name,
            clinic,
            phone,
            email,
        } => {
            let existing = find(store, &id)?;
            let updated = Client {
                id: existing.id.clone(),
                name: name.unwrap_or_else(|| existing.name.clone()),
                clinic: clinic.unwrap_or_else(|| existing.clinic.clone()),
                phone: phone.unwrap_or_else(|| existing.phone.clone()),
                email: email.unwrap_or_else(|| existing.email.clone()),
            };
            let updated = store.update_client(updated).await?;
            println!("updated client {}", updated.id);
        }
        ClientAction::Rm { id } => {
            store.delete_client(ClientId::new(id.as_str())).await?;
            println!("deleted client {id}");
        }
    }
    Ok(())
}

fn find(store: &Store, id: &str) -> Result<Client, CommandError> {
    store
        .state()
        .clients
        .iter()
        .find(|c| c.id.as_str() == id)
        .cloned()
        .ok_or_else(|| format!("no client with id {id}").into())
}
