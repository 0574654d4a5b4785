use uuid::Uuid;

use crate::application::ports::message_repository::MessageRepository;
use crate::application::ports::realtime_port::{MessageEvent, RealtimeEvent, RealtimePort};
use crate::application::ports::user_repository::UserRepository;
use crate::domain::errors::DomainError;
use crate::domain::messages::message::{Message, validate_body};

pub struct SendMessage<'a, U, M, N>
where
    U: UserRepository + ?Sized,
    M: MessageRepository + ?Sized,
    N: RealtimePort + ?Sized,
{
    pub users: &'a U,
    pub messages: &'a M,
    pub realtime: &'a N,
}

impl<'a, U, M, N> SendMessage<'a, U, M, N>
where
    U: UserRepository + ?Sized,
    M: MessageRepository + ?Sized,
    N: RealtimePort + ?Sized,
{
    /// Persists first, then pushes to both parties' live sockets.
    pub async fn execute(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        body: &str,
    ) -> anyhow::Result<Message> {
        let body = validate_body(sender_id, recipient_id, body)?;
        if self.users.find_by_id(recipient_id).await?.is_none() {
            return Err(DomainError::NotFound("recipient").into());
        }
        let msg = self.messages.create(sender_id, recipient_id, &body).await?;

        let event = RealtimeEvent::Message(MessageEvent::from(&msg));
        let delivered = self.realtime.send_to_user(recipient_id, event.clone()).await;
        self.realtime.send_to_user(sender_id, event).await;
        tracing::debug!(
            message_id = %msg.id,
            sender_id = %sender_id,
            recipient_id = %recipient_id,
            delivered,
            "message_sent"
        );
        Ok(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{InMemoryStore, RecordingRealtime};
    use crate::domain::enums::Role;

    #[tokio::test]
    async fn persists_then_pushes_to_both_parties() {
        let store = InMemoryStore::default();
        let rt = RecordingRealtime::default();
        let a = store.seed_user("A", "a@example.com", Role::User).await.id;
        let b = store.seed_user("B", "b@example.com", Role::User).await.id;
        let uc = SendMessage {
            users: &store,
            messages: &store,
            realtime: &rt,
        };
        let m = uc.execute(a, b, "  hello ").await.unwrap();
        assert_eq!(m.body, "hello");
        assert_eq!(store.list_between(a, b, None, 10).await.unwrap().len(), 1);

        let sent = rt.sent.lock().await;
        let targets: Vec<Uuid> = sent.iter().map(|(u, _)| *u).collect();
        assert_eq!(targets, vec![b, a]);
        assert!(matches!(&sent[0].1, RealtimeEvent::Message(e) if e.id == m.id));
    }

    #[tokio::test]
    async fn invalid_messages_are_not_stored_or_pushed() {
        let store = InMemoryStore::default();
        let rt = RecordingRealtime::default();
        let a = store.seed_user("A", "a@example.com", Role::User).await.id;
        let uc = SendMessage {
            users: &store,
            messages: &store,
            realtime: &rt,
        };
        assert!(uc.execute(a, a, "hi").await.is_err());
        assert!(uc.execute(a, Uuid::new_v4(), "   ").await.is_err());
        let err = uc.execute(a, Uuid::new_v4(), "hi").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound(_))
        ));
        assert!(rt.sent.lock().await.is_empty());
    }
}
