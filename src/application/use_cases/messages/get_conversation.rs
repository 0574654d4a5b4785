use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{DEFAULT_CONVERSATION_PAGE, MAX_CONVERSATION_PAGE};
use crate::application::ports::message_repository::MessageRepository;
use crate::domain::errors::DomainError;
use crate::domain::messages::message::Message;

pub struct GetConversation<'a, M: MessageRepository + ?Sized> {
    pub messages: &'a M,
}

impl<'a, M: MessageRepository + ?Sized> GetConversation<'a, M> {
    /// Newest first. Marks everything received from `with_user` as read.
    pub async fn execute(
        &self,
        user_id: Uuid,
        with_user: Uuid,
        before: Option<DateTime<Utc>>,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<Message>> {
        if user_id == with_user {
            return Err(DomainError::validation("cannot open a conversation with yourself").into());
        }
        let limit = limit
            .unwrap_or(DEFAULT_CONVERSATION_PAGE)
            .clamp(1, MAX_CONVERSATION_PAGE);
        let page = self
            .messages
            .list_between(user_id, with_user, before, limit)
            .await?;
        let marked = self.messages.mark_read(user_id, with_user).await?;
        if marked > 0 {
            tracing::debug!(user_id = %user_id, with_user = %with_user, marked, "messages_marked_read");
        }
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryStore;
    use crate::domain::enums::Role;

    #[tokio::test]
    async fn pages_backwards_and_marks_read() {
        let store = InMemoryStore::default();
        let a = store.seed_user("A", "a@example.com", Role::User).await.id;
        let b = store.seed_user("B", "b@example.com", Role::User).await.id;
        for i in 0..5 {
            let (from, to) = if i % 2 == 0 { (b, a) } else { (a, b) };
            store.create(from, to, &format!("m{i}")).await.unwrap();
        }
        let uc = GetConversation { messages: &store };
        let first = uc.execute(a, b, None, Some(2)).await.unwrap();
        let bodies: Vec<&str> = first.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["m4", "m3"]);

        let older = uc
            .execute(a, b, Some(first[1].created_at), Some(10))
            .await
            .unwrap();
        let bodies: Vec<&str> = older.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["m2", "m1", "m0"]);

        let all = store.list_between(a, b, None, 10).await.unwrap();
        assert!(
            all.iter()
                .filter(|m| m.recipient_id == a)
                .all(|m| m.read_at.is_some())
        );
        assert!(
            all.iter()
                .filter(|m| m.recipient_id == b)
                .all(|m| m.read_at.is_none())
        );
    }

    #[tokio::test]
    async fn limit_is_clamped() {
        let store = InMemoryStore::default();
        let a = store.seed_user("A", "a@example.com", Role::User).await.id;
        let b = store.seed_user("B", "b@example.com", Role::User).await.id;
        store.create(a, b, "hi").await.unwrap();
        let uc = GetConversation { messages: &store };
        assert_eq!(uc.execute(a, b, None, Some(0)).await.unwrap().len(), 1);
        assert!(uc.execute(a, a, None, None).await.is_err());
    }
}
