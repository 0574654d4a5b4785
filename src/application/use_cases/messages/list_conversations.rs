use uuid::Uuid;

use crate::application::ports::message_repository::MessageRepository;
use crate::domain::messages::message::ConversationSummary;

pub struct ListConversations<'a, M: MessageRepository + ?Sized> {
    pub messages: &'a M,
}

impl<'a, M: MessageRepository + ?Sized> ListConversations<'a, M> {
    pub async fn execute(&self, user_id: Uuid) -> anyhow::Result<Vec<ConversationSummary>> {
        self.messages.list_conversations(user_id).await
    }
}
