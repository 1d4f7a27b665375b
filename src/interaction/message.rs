//! The message acknowledgement handler.

use tracing::{Instrument, error, info, instrument};

use crate::{base::types::Void, service::chat::ChatClient};

/// Handles an inbound message event.
///
/// Spawns a task that logs the sender and text, then sends exactly one
/// acknowledgement reply. Failures are logged and swallowed; delivery retries
/// belong to the chat platform.
#[instrument(skip_all)]
pub fn handle_message(text: Option<String>, sender: Option<String>, channel_id: String, chat: ChatClient) {
    tokio::spawn(async move {
        // Process the event.
        let result = handle_message_internal(text, sender, &channel_id, &chat).in_current_span().await;

        // Log any errors.
        if let Err(err) = &result {
            error!("Error while handling: {}", err);
        }
    });
}

#[instrument(skip_all)]
async fn handle_message_internal(text: Option<String>, sender: Option<String>, channel_id: &str, chat: &ChatClient) -> Void {
    let text = text.unwrap_or_default();
    let sender = sender.as_deref().unwrap_or("unknown");

    info!("Received message from {}: {}", sender, text);

    chat.send_message(channel_id, &format!("Message received: {text}")).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use mockall::{mock, predicate};

    use crate::{
        base::types::Void,
        service::chat::{ChatClient, GenericChatClient},
    };

    use super::handle_message_internal;

    mock! {
        pub Chat {}

        #[async_trait]
        impl GenericChatClient for Chat {
            fn bot_user_id(&self) -> &str;
            async fn start(&self) -> Void;
            async fn send_message(&self, channel_id: &str, text: &str) -> Void;
        }
    }

    #[tokio::test]
    async fn acknowledges_with_the_original_text() {
        let mut mock = MockChat::new();
        mock.expect_send_message()
            .with(predicate::eq("C01TEST"), predicate::eq("Message received: hello there"))
            .times(1)
            .returning(|_, _| Ok(()));

        let chat = ChatClient::new(Arc::new(mock));

        handle_message_internal(Some("hello there".to_string()), Some("U54321".to_string()), "C01TEST", &chat)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn absent_text_and_sender_still_acknowledge() {
        let mut mock = MockChat::new();
        mock.expect_send_message()
            .with(predicate::eq("C01TEST"), predicate::eq("Message received: "))
            .times(1)
            .returning(|_, _| Ok(()));

        let chat = ChatClient::new(Arc::new(mock));

        handle_message_internal(None, None, "C01TEST", &chat).await.unwrap();
    }

    #[tokio::test]
    async fn reply_failures_propagate_to_the_caller() {
        let mut mock = MockChat::new();
        mock.expect_send_message().times(1).returning(|_, _| Err(anyhow::anyhow!("channel_not_found")));

        let chat = ChatClient::new(Arc::new(mock));

        let result = handle_message_internal(Some("hi".to_string()), None, "C0MISSING", &chat).await;

        assert!(result.is_err());
    }
}
