//! Material suppliers.

use serde::{Deserialize, Serialize};

use crate::types::SupplierId;

/// A supplier of laboratory materials.
///
/// Suppliers stand alone; nothing references them and they reference nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub website: String,
}

/// Create payload for a supplier; the server assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub website: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplier_wire_names_are_camel_case() {
        let supplier = Supplier {
            id: SupplierId::new("s1"),
            name: "Dental Import SRL".to_string(),
            contact_person: "Laura Paz".to_string(),
            phone: "011-4000-1234".to_string(),
            website: "https://dentalimport.example".to_string(),
        };
        let json = serde_json::to_value(&supplier).expect("serialize");
        assert!(json.get("contactPerson").is_some());
        assert!(json.get("contact_person").is_none());
    }
}
