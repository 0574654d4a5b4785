use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainError;

pub const MAX_BODY_LEN: usize = 5000;

#[derive(Debug, Clone)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Latest message exchanged with one counterpart.
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub counterpart_id: Uuid,
    pub counterpart_name: String,
    pub counterpart_image: Option<String>,
    pub last_message: Message,
    pub unread_count: i64,
}

pub fn validate_body(sender: Uuid, recipient: Uuid, body: &str) -> Result<String, DomainError> {
    if sender == recipient {
        return Err(DomainError::validation("cannot message yourself"));
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("message must not be empty"));
    }
    if trimmed.chars().count() > MAX_BODY_LEN {
        return Err(DomainError::validation("message is too long"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_rules() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(validate_body(a, b, "  hi ").unwrap(), "hi");
        assert!(validate_body(a, b, "   ").is_err());
        assert!(validate_body(a, a, "hi").is_err());
        assert!(validate_body(a, b, &"x".repeat(MAX_BODY_LEN + 1)).is_err());
    }
}
