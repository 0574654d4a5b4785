pub mod get_conversation;
pub mod list_conversations;
pub mod send_message;

pub const DEFAULT_CONVERSATION_PAGE: i64 = 50;
pub const MAX_CONVERSATION_PAGE: i64 = 200;
