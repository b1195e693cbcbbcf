//! Laboratory products (prosthetic pieces offered to clients).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A product in the laboratory's catalog.
///
/// The price is a non-negative, currency-agnostic decimal. It serializes as
/// a JSON number to match the backend's documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub material: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Create payload for a product; the server assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub material: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn test_price_serializes_as_number() {
        let product = Product {
            id: ProductId::new("p1"),
            name: "Corona".to_string(),
            material: "Zirconia".to_string(),
            price: price("150.00"),
        };
        let json = serde_json::to_value(&product).expect("serialize");
        assert!(json["price"].is_number());
    }

    #[test]
    fn test_price_deserializes_from_number() {
        let json = r#"{"id":"p1","name":"Corona","material":"Zirconia","price":150.5}"#;
        let product: Product = serde_json::from_str(json).expect("deserialize");
        assert_eq!(product.price, price("150.5"));
    }
}
