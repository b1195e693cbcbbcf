//! Supplier management commands.

use clap::Subcommand;

use labflow_client::Store;
use labflow_core::{NewSupplier, Supplier, SupplierId};

use super::{CommandError, ensure_session};

#[derive(Subcommand)]
pub enum SupplierAction {
    /// List all suppliers
    List,
    /// Add a supplier (admin role)
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        website: String,
    },
    /// Update a supplier (admin role); omitted fields keep their value
    Update {
        /// Supplier identifier
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        website: Option<String>,
    },
    /// Delete a supplier (admin role)
    Rm {
        /// Supplier identifier
        id: String,
    },
}

pub async fn run(store: &mut Store, action: SupplierAction) -> Result<(), CommandError> {
    ensure_session(store)?;
    match action {
        SupplierAction::List => {
            for supplier in &store.state().suppliers {
                println!(
                    "{}  {}  {}  {}  {}",
                    supplier.id,
                    supplier.name,
                    supplier.contact_person,
                    supplier.phone,
                    supplier.website
                );
            }
        }
        SupplierAction::Add {
            name,
            contact,
            phone,
            website,
        } => {
            let created = store
                .add_supplier(NewSupplier {
                    name,
                    contact_person: contact,
                    phone,
                    website,
                })
                .await?;
            println!("created supplier {}", created.id);
        }
        SupplierAction::Update {
            id,
            name,
            contact,
            phone,
            website,
        } => {
            let existing = find(store, &id)?;
            let updated = Supplier {
                id: existing.id.clone(),
                name: name.unwrap_or_else(|| existing.name.clone()),
                contact_person: contact.unwrap_or_else(|| existing.contact_person.clone()),
                phone: phone.unwrap_or_else(|| existing.phone.clone()),
                website: website.unwrap_or_else(|| existing.website.clone()),
            };
            let updated = store.update_supplier(updated).await?;
            println!("updated supplier {}", updated.id);
        }
        SupplierAction::Rm { id } => {
            store.delete_supplier(SupplierId::new(id.as_str())).await?;
            println!("deleted supplier {id}");
        }
    }
    Ok(())
}

fn find(store: &Store, id: &str) -> Result<Supplier, CommandError> {
    store
        .state()
        .suppliers
        .iter()
        .find(|s| s.id.as_str() == id)
        .cloned()
        .ok_or_else(|| format!("no supplier with id {id}").into())
}
