use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::messages::message::{ConversationSummary, Message};

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, sender_id: Uuid, recipient_id: Uuid, body: &str)
    -> anyhow::Result<Message>;
    /// Newest first, strictly older than `before` when given.
    async fn list_between(
        &self,
        a: Uuid,
        b: Uuid,
        before: Option<DateTime<Utc>>,
        limit: i64,
    ) -> anyhow::Result<Vec<Message>>;
    async fn mark_read(&self, recipient_id: Uuid, sender_id: Uuid) -> anyhow::Result<u64>;
    async fn list_conversations(&self, user_id: Uuid)
    -> anyhow::Result<Vec<ConversationSummary>>;
}
