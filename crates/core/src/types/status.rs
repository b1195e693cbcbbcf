//! Status and role enums.
//!
//! Wire strings match the backend's stored values exactly: the order pipeline
//! labels are Spanish (the lab operates in Spanish), roles and chat roles are
//! lowercase English.

use serde::{Deserialize, Serialize};

/// Work order pipeline status.
///
/// The five stages form a fixed, ordered production pipeline; `Ord` follows
/// pipeline position. No other value is valid on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "Recibido")]
    Received,
    #[serde(rename = "En Proceso")]
    InProcess,
    #[serde(rename = "Control de Calidad")]
    QualityControl,
    #[serde(rename = "Listo para Entrega")]
    ReadyForDelivery,
    #[serde(rename = "Entregado")]
    Delivered,
}

impl OrderStatus {
    /// All statuses in pipeline order.
    pub const ALL: [Self; 5] = [
        Self::Received,
        Self::InProcess,
        Self::QualityControl,
        Self::ReadyForDelivery,
        Self::Delivered,
    ];

    /// The backend wire label for this status.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Received => "Recibido",
            Self::InProcess => "En Proceso",
            Self::QualityControl => "Control de Calidad",
            Self::ReadyForDelivery => "Listo para Entrega",
            Self::Delivered => "Entregado",
        }
    }

    /// Whether the order has left the pipeline.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Recibido" | "received" => Ok(Self::Received),
            "En Proceso" | "in-process" => Ok(Self::InProcess),
            "Control de Calidad" | "quality-control" => Ok(Self::QualityControl),
            "Listo para Entrega" | "ready" => Ok(Self::ReadyForDelivery),
            "Entregado" | "delivered" => Ok(Self::Delivered),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// User role with different permission levels.
///
/// Admins can write every collection; regular users can only read and update
/// work orders (the backend enforces this with 403 responses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full read/write access to all collections.
    Admin,
    /// Read access plus work order updates.
    User,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Chat message role.
///
/// The conversation alternates between the operator (`User`) and the
/// assistant (`Model`); the wire names follow the chat service convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_wire_labels() {
        let json = serde_json::to_string(&OrderStatus::QualityControl).expect("serialize");
        assert_eq!(json, "\"Control de Calidad\"");

        let back: OrderStatus = serde_json::from_str("\"Listo para Entrega\"").expect("deserialize");
        assert_eq!(back, OrderStatus::ReadyForDelivery);
    }

    #[test]
    fn test_order_status_rejects_unknown_value() {
        let result: Result<OrderStatus, _> = serde_json::from_str("\"Archivado\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_order_status_pipeline_order() {
        assert!(OrderStatus::Received < OrderStatus::InProcess);
        assert!(OrderStatus::ReadyForDelivery < OrderStatus::Delivered);
    }

    #[test]
    fn test_order_status_from_str_accepts_cli_aliases() {
        assert_eq!(
            "quality-control".parse::<OrderStatus>().expect("parse"),
            OrderStatus::QualityControl
        );
        assert_eq!(
            "Entregado".parse::<OrderStatus>().expect("parse"),
            OrderStatus::Delivered
        );
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_user_role_wire_names() {
        assert_eq!(
            serde_json::to_string(&UserRole::Admin).expect("serialize"),
            "\"admin\""
        );
        let back: UserRole = serde_json::from_str("\"user\"").expect("deserialize");
        assert_eq!(back, UserRole::User);
    }

    #[test]
    fn test_chat_role_wire_names() {
        assert_eq!(
            serde_json::to_string(&ChatRole::Model).expect("serialize"),
            "\"model\""
        );
    }
}
