use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::ports::realtime_port::RealtimePort;
use crate::application::use_cases::messages::get_conversation::GetConversation;
use crate::application::use_cases::messages::list_conversations::ListConversations;
use crate::application::use_cases::messages::send_message::SendMessage;
use crate::bootstrap::app_context::AppContext;
use crate::domain::messages::message::{ConversationSummary, Message};
use crate::presentation::http::auth::Session;
use crate::presentation::http::error::{ApiJson, ApiQuery, ApiResult, ErrorBody};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            sender_id: m.sender_id,
            recipient_id: m.recipient_id,
            body: m.body,
            created_at: m.created_at,
            read_at: m.read_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub user_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub online: bool,
    pub last_message: MessageResponse,
    pub unread_count: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub to_user_id: Uuid,
    pub body: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ConversationQuery {
    pub with_user_id: Uuid,
    /// Only messages strictly older than this instant.
    pub before: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/rpc/message.send", post(send_message))
        .route("/rpc/message.getConversation", get(get_conversation))
        .route("/rpc/message.getConversations", get(get_conversations))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/rpc/message.send", tag = "Messages", request_body = SendMessageRequest, responses(
    (status = 200, body = MessageResponse),
    (status = 400, body = ErrorBody),
    (status = 404, body = ErrorBody)
))]
pub async fn send_message(
    State(ctx): State<AppContext>,
    Session(user_id): Session,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> ApiResult<MessageResponse> {
    let users = ctx.user_repo();
    let messages = ctx.message_repo();
    let realtime = ctx.realtime_port();
    let uc = SendMessage {
        users: users.as_ref(),
        messages: messages.as_ref(),
        realtime: realtime.as_ref(),
    };
    let msg = uc.execute(user_id, req.to_user_id, &req.body).await?;
    Ok(Json(msg.into()))
}

#[utoipa::path(get, path = "/api/rpc/message.getConversation", tag = "Messages", params(ConversationQuery), responses(
    (status = 200, body = [MessageResponse]),
    (status = 400, body = ErrorBody)
))]
pub async fn get_conversation(
    State(ctx): State<AppContext>,
    Session(user_id): Session,
    ApiQuery(q): ApiQuery<ConversationQuery>,
) -> ApiResult<Vec<MessageResponse>> {
    let repo = ctx.message_repo();
    let uc = GetConversation {
        messages: repo.as_ref(),
    };
    let items = uc
        .execute(user_id, q.with_user_id, q.before, q.limit)
        .await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(get, path = "/api/rpc/message.getConversations", tag = "Messages", responses(
    (status = 200, body = [ConversationResponse])
))]
pub async fn get_conversations(
    State(ctx): State<AppContext>,
    Session(user_id): Session,
) -> ApiResult<Vec<ConversationResponse>> {
    let repo = ctx.message_repo();
    let uc = ListConversations {
        messages: repo.as_ref(),
    };
    let realtime = ctx.realtime_port();
    let mut out = Vec::new();
    for c in uc.execute(user_id).await? {
        let online = realtime.is_online(c.counterpart_id).await;
        out.push(conversation_response(c, online));
    }
    Ok(Json(out))
}

fn conversation_response(c: ConversationSummary, online: bool) -> ConversationResponse {
    ConversationResponse {
        user_id: c.counterpart_id,
        name: c.counterpart_name,
        image: c.counterpart_image,
        online,
        last_message: c.last_message.into(),
        unread_count: c.unread_count,
    }
}
