//! System prompt construction for the lab assistant.
//!
//! The assistant answers from a snapshot of the application's data: the four
//! entity collections are serialized into the system prompt on every request
//! (the conversation itself carries no data).

use chrono::NaiveDate;

use labflow_core::{ChatMessage, ChatRole, Collections};

use super::types::Message;

/// Build the system instruction: behavioral preamble plus the data snapshot.
#[must_use]
pub fn system_prompt(collections: &Collections, today: NaiveDate) -> String {
    let clients = pretty(&collections.clients);
    let products = pretty(&collections.products);
    let suppliers = pretty(&collections.suppliers);
    let orders = pretty(&collections.orders);

    format!(
        "You are an expert dental laboratory assistant integrated into a lab \
         management application.\n\
         Your two primary functions are:\n\
         1. Answer questions by querying the application's data. The current \
         data is provided below as JSON. Use it to answer questions about \
         clients, orders, products, and suppliers. Be concise and precise.\n\
         2. Act as an expert on general dentistry and dental mechanics \
         topics. Provide knowledgeable and helpful answers on these \
         subjects.\n\n\
         Today's date is {today}.\n\n\
         Here is the current data from the application:\n\
         Clients: {clients}\n\
         Products: {products}\n\
         Suppliers: {suppliers}\n\
         Work Orders: {orders}\n"
    )
}

/// Map the conversation history to wire messages, preserving order and role.
#[must_use]
pub fn conversation(history: &[ChatMessage]) -> Vec<Message> {
    history
        .iter()
        .map(|turn| Message {
            role: match turn.role {
                ChatRole::User => "user".to_string(),
                ChatRole::Model => "assistant".to_string(),
            },
            content: turn.content.clone(),
        })
        .collect()
}

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use labflow_core::{Client, ClientId};

    #[test]
    fn test_system_prompt_embeds_data_and_date() {
        let collections = Collections {
            clients: vec![Client {
                id: ClientId::new("c1"),
                name: "Dr. Moreno".to_string(),
                clinic: "Clínica Norte".to_string(),
                phone: String::new(),
                email: String::new(),
            }],
            ..Collections::default()
        };
        let today = "2024-03-15".parse().expect("date");

        let prompt = system_prompt(&collections, today);
        assert!(prompt.contains("Today's date is 2024-03-15"));
        assert!(prompt.contains("Dr. Moreno"));
        assert!(prompt.contains("Work Orders: []"));
    }

    #[test]
    fn test_conversation_preserves_order_and_maps_roles() {
        let history = vec![
            ChatMessage::user("¿Cuántas órdenes hay?"),
            ChatMessage::model("Hay 12 órdenes."),
            ChatMessage::user("¿Y clientes?"),
        ];

        let messages = conversation(&history);
        let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "assistant", "user"]);
        assert_eq!(messages.last().map(|m| m.content.as_str()), Some("¿Y clientes?"));
    }
}
