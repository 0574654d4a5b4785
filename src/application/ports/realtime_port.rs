use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::messages::message::Message;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Message> for MessageEvent {
    fn from(m: &Message) -> Self {
        Self {
            id: m.id,
            sender_id: m.sender_id,
            recipient_id: m.recipient_id,
            body: m.body.clone(),
            created_at: m.created_at,
        }
    }
}

/// Server-to-client frames on the realtime channel.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RealtimeEvent {
    Message(MessageEvent),
    #[serde(rename_all = "camelCase")]
    Presence { user_id: Uuid, online: bool },
    #[serde(rename_all = "camelCase")]
    Notification {
        kind: String,
        title: String,
        body: String,
        data: serde_json::Value,
    },
    Pong,
    #[serde(rename_all = "camelCase")]
    Error { message: String },
}

/// Best-effort, at-most-once push to connected sockets.
#[async_trait]
pub trait RealtimePort: Send + Sync {
    /// Returns how many sockets accepted the event.
    async fn send_to_user(&self, user_id: Uuid, event: RealtimeEvent) -> usize;
    async fn is_online(&self, user_id: Uuid) -> bool;
}
