//! Lab assistant chat command.

use labflow_client::Store;
use labflow_core::ChatRole;

/// Send one message and print the reply (or the absorbed error turn).
pub async fn send(store: &mut Store, message: &str) {
    if !store.state().is_authenticated {
        println!("no active session; run `labflow login` first");
        return;
    }

    store.send_chat_message(message).await;

    // The reply - or the error turn the bridge absorbed - is the last model
    // message in the conversation.
    if let Some(turn) = store
        .state()
        .chat_messages
        .iter()
        .rev()
        .find(|m| m.role == ChatRole::Model)
    {
        println!("{}", turn.content);
    }
}
