use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

use crate::application::ports::realtime_port::RealtimeEvent;
use crate::application::use_cases::messages::send_message::SendMessage;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth;
use crate::presentation::http::error::ApiError;

#[derive(Debug, Deserialize, Clone)]
pub struct AuthQuery {
    pub token: Option<String>,
    pub access_token: Option<String>,
}

/// Client-to-server frames.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientFrame {
    #[serde(rename_all = "camelCase")]
    Message { to_user_id: Uuid, body: String },
    Ping,
}

#[utoipa::path(
    get,
    path = "/api/ws",
    params(
        ("token" = Option<String>, Query, description = "JWT access token"),
        ("Authorization" = Option<String>, Header, description = "Bearer token")
    ),
    responses(
        (status = 101, description = "Switching Protocols (WebSocket upgrade)"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Realtime"
)]
pub async fn ws_entry(
    ws: WebSocketUpgrade,
    Query(query): Query<AuthQuery>,
    headers: HeaderMap,
    State(ctx): State<AppContext>,
) -> Result<impl IntoResponse, StatusCode> {
    let token = query
        .token
        .or(query.access_token)
        .or_else(|| auth::token_from_headers(&headers));
    let user_id = token
        .as_deref()
        .and_then(|t| auth::validate_token(&ctx.cfg, t))
        .ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(ws.on_upgrade(move |socket| serve_socket(socket, ctx, user_id)))
}

async fn serve_socket(socket: WebSocket, ctx: AppContext, user_id: Uuid) {
    let hub = ctx.hub().clone();
    let sub = hub.connect(user_id).await;
    let conn_id = sub.conn_id;
    let (mut sink, mut stream) = socket.split();
    let mut events = UnboundedReceiverStream::new(sub.rx);

    loop {
        tokio::select! {
            event = events.next() => {
                let Some(event) = event else { break };
                let Ok(text) = serde_json::to_string(&event) else { continue };
                if sink.send(WsMessage::Text(text)).await.is_err() {
                    break;
                }
            }
            frame = stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        if let Some(reply) = handle_frame(&ctx, user_id, &text).await {
                            let Ok(text) = serde_json::to_string(&reply) else { continue };
                            if sink.send(WsMessage::Text(text)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(user_id = %user_id, error = %e, "ws_receive_failed");
                        break;
                    }
                }
            }
        }
    }

    hub.disconnect(user_id, conn_id).await;
}

/// Returns a frame to send straight back to this socket, if any. Delivered
/// messages reach the sender through the hub like any other event.
async fn handle_frame(ctx: &AppContext, user_id: Uuid, text: &str) -> Option<RealtimeEvent> {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(f) => f,
        Err(_) => {
            return Some(RealtimeEvent::Error {
                message: "unrecognized frame".into(),
            });
        }
    };
    match frame {
        ClientFrame::Ping => Some(RealtimeEvent::Pong),
        ClientFrame::Message { to_user_id, body } => {
            let users = ctx.user_repo();
            let messages = ctx.message_repo();
            let realtime = ctx.realtime_port();
            let uc = SendMessage {
                users: users.as_ref(),
                messages: messages.as_ref(),
                realtime: realtime.as_ref(),
            };
            match uc.execute(user_id, to_user_id, &body).await {
                Ok(_) => None,
                Err(e) => Some(RealtimeEvent::Error {
                    message: ApiError::from(e).message,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_client_frames() {
        let id = Uuid::new_v4();
        let f: ClientFrame =
            serde_json::from_str(&format!(r#"{{"type":"message","toUserId":"{id}","body":"hey"}}"#))
                .unwrap();
        assert_eq!(
            f,
            ClientFrame::Message {
                to_user_id: id,
                body: "hey".into()
            }
        );
        let p: ClientFrame = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(p, ClientFrame::Ping);
        assert!(serde_json::from_str::<ClientFrame>(r#"{"type":"shout"}"#).is_err());
    }

    #[test]
    fn server_frames_are_tagged() {
        let v = serde_json::to_value(RealtimeEvent::Pong).unwrap();
        assert_eq!(v["type"], "pong");
    }
}
