use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::message_repository::MessageRepository;
use crate::domain::messages::message::{ConversationSummary, Message};
use crate::infrastructure::db::PgPool;

pub struct SqlxMessageRepository {
    pub pool: PgPool,
}

impl SqlxMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn message_from_row(r: &PgRow) -> Message {
    Message {
        id: r.get("id"),
        sender_id: r.get("sender_id"),
        recipient_id: r.get("recipient_id"),
        body: r.get("body"),
        created_at: r.get("created_at"),
        read_at: r.get("read_at"),
    }
}

#[async_trait]
impl MessageRepository for SqlxMessageRepository {
    async fn create(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        body: &str,
    ) -> anyhow::Result<Message> {
        let row = sqlx::query(
            "INSERT INTO messages (sender_id, recipient_id, body) VALUES ($1, $2, $3)
             RETURNING id, sender_id, recipient_id, body, created_at, read_at",
        )
        .bind(sender_id)
        .bind(recipient_id)
        .bind(body)
        .fetch_one(&self.pool)
        .await?;
        Ok(message_from_row(&row))
    }

    async fn list_between(
        &self,
        a: Uuid,
        b: Uuid,
        before: Option<DateTime<Utc>>,
        limit: i64,
    ) -> anyhow::Result<Vec<Message>> {
        let rows = sqlx::query(
            r#"SELECT id, sender_id, recipient_id, body, created_at, read_at
               FROM messages
               WHERE LEAST(sender_id, recipient_id) = LEAST($1::uuid, $2::uuid)
                 AND GREATEST(sender_id, recipient_id) = GREATEST($1::uuid, $2::uuid)
                 AND ($3::timestamptz IS NULL OR created_at < $3)
               ORDER BY created_at DESC, id DESC
               LIMIT $4"#,
        )
        .bind(a)
        .bind(b)
        .bind(before)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(message_from_row).collect())
    }

    async fn mark_read(&self, recipient_id: Uuid, sender_id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query(
            "UPDATE messages SET read_at = now()
             WHERE recipient_id = $1 AND sender_id = $2 AND read_at IS NULL",
        )
        .bind(recipient_id)
        .bind(sender_id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }

    async fn list_conversations(
        &self,
        user_id: Uuid,
    ) -> anyhow::Result<Vec<ConversationSummary>> {
        let rows = sqlx::query(
            r#"WITH mine AS (
                   SELECT m.*,
                          CASE WHEN m.sender_id = $1 THEN m.recipient_id ELSE m.sender_id END
                              AS counterpart_id
                   FROM messages m
                   WHERE m.sender_id = $1 OR m.recipient_id = $1
               ),
               latest AS (
                   SELECT DISTINCT ON (counterpart_id) *
                   FROM mine
                   ORDER BY counterpart_id, created_at DESC, id DESC
               )
               SELECT l.id, l.sender_id, l.recipient_id, l.body, l.created_at, l.read_at,
                      l.counterpart_id, u.name AS counterpart_name, u.image AS counterpart_image,
                      (SELECT COUNT(*) FROM messages x
                        WHERE x.sender_id = l.counterpart_id AND x.recipient_id = $1
                          AND x.read_at IS NULL) AS unread_count
               FROM latest l JOIN users u ON u.id = l.counterpart_id
               ORDER BY l.created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|r| ConversationSummary {
                counterpart_id: r.get("counterpart_id"),
                counterpart_name: r.get("counterpart_name"),
                counterpart_image: r.get("counterpart_image"),
                last_message: message_from_row(r),
                unread_count: r.get("unread_count"),
            })
            .collect())
    }
}
