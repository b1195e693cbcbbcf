//! Product catalog commands.

use clap::Subcommand;
use rust_decimal::Decimal;

use labflow_client::Store;
use labflow_core::{NewProduct, Product, ProductId};

use super::{CommandError, ensure_session};

#[derive(Subcommand)]
pub enum ProductAction {
    /// List the catalog
    List,
    /// Add a product (admin role)
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        material: String,
        /// Unit price, e.g. 150.00
        #[arg(long)]
        price: Decimal,
    },
    /// Update a product (admin role); omitted fields keep their value
    Update {
        /// Product identifier
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        material: Option<String>,
        #[arg(long)]
        price: Option<Decimal>,
    },
    /// Delete a product (admin role); existing orders keep their reference
    Rm {
        /// Product identifier
        id: String,
    },
}

pub async fn run(store: &mut Store, action: ProductAction) -> Result<(), CommandError> {
    ensure_session(store)?;
    match action {
        ProductAction::List => {
            for product in &store.state().products {
                println!(
                    "{}  {}  {}  ${}",
                    product.id,
                    product.name,
                    product.material,
                    product.price.round_dp(2)
                );
            }
        }
        ProductAction::Add {
            name,
            material,
            price,
        } => {
            if price.is_sign_negative() {
                return Err("price must be non-negative".into());
            }
            let created = store
                .add_product(NewProduct {
                    name,
                    material,
                    price,
                })
                .await?;
            println!("created product {}", created.id);
        }
        ProductAction::Update {
            id,
            name,
            material,
            price,
        } => {
            let existing = find(store, &id)?;
            if price.is_some_and(|p| p.is_sign_negative()) {
                return Err("price must be non-negative".into());
            }
            let updated = Product {
                id: existing.id.clone(),
                name: name.unwrap_or_else(|| existing.name.clone()),
                material: material.unwrap_or_else(|| existing.material.clone()),
                price: price.unwrap_or(existing.price),
            };
            let updated = store.update_product(updated).await?;
            println!("updated product {}", updated.id);
        }
        ProductAction::Rm { id } => {
            store.delete_product(ProductId::new(id.as_str())).await?;
            println!("deleted product {id}");
        }
    }
    Ok(())
}

fn find(store: &Store, id: &str) -> Result<Product, CommandError> {
    store
        .state()
        .products
        .iter()
        .find(|p| p.id.as_str() == id)
        .cloned()
        .ok_or_else(|| format!("no product with id {id}").into())
}
