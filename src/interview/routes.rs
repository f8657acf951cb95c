//! HTTP surface: WebSocket chat, transcript download, health.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, warn};

use crate::error::ChannelError;
use crate::llm::Role;
use crate::store::TranscriptStore;

use super::manager::{SessionId, SessionManager};
use super::model::Reply;

// ── JSON Protocol ───────────────────────────────────────────────────────

/// Frame from chat client → server.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Message { content: String },
    Clear,
}

/// Frame from server → chat client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    Response { role: Role, content: String },
    Error { message: String },
}

impl From<Reply> for ServerMessage {
    fn from(reply: Reply) -> Self {
        Self::Response {
            role: reply.role,
            content: reply.content,
        }
    }
}

/// Shared state for interview routes.
#[derive(Clone)]
pub struct InterviewRouteState {
    pub manager: Arc<SessionManager>,
    pub store: Arc<dyn TranscriptStore>,
}

/// Build the interview routes.
pub fn interview_routes(state: InterviewRouteState) -> Router {
    Router::new()
        .route("/ws/chat", get(ws_chat_handler))
        .route("/api/transcripts", get(download_transcripts))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /api/transcripts
///
/// All saved transcripts as one JSON array, served as a file download.
async fn download_transcripts(State(state): State<InterviewRouteState>) -> impl IntoResponse {
    match state.store.load_all().await {
        Ok(records) => (
            [(
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"responses.json\"",
            )],
            Json(records),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to load transcripts");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

/// GET /api/health
async fn health(State(state): State<InterviewRouteState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "active_sessions": state.manager.active_sessions().await,
    }))
}

// ── WebSocket Handler ───────────────────────────────────────────────────

async fn ws_chat_handler(
    ws: WebSocketUpgrade,
    State(state): State<InterviewRouteState>,
) -> impl IntoResponse {
    debug!("Chat client connecting");
    ws.on_upgrade(move |socket| handle_chat_socket(socket, state.manager))
}

async fn send(socket: &mut WebSocket, msg: ServerMessage) -> Result<(), ChannelError> {
    let json = serde_json::to_string(&msg).map_err(|e| ChannelError::SendFailed {
        name: "ws".to_string(),
        reason: e.to_string(),
    })?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| ChannelError::SendFailed {
            name: "ws".to_string(),
            reason: e.to_string(),
        })
}

/// Reply for one client frame.
async fn respond_to(manager: &SessionManager, id: SessionId, text: &str) -> ServerMessage {
    let result = match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Message { content }) => manager.handle(id, &content).await,
        Ok(ClientMessage::Clear) => manager.clear(id).await,
        Err(e) => {
            debug!(error = %e, text = %text, "Invalid JSON from chat client");
            return ServerMessage::Error {
                message: ChannelError::InvalidMessage(e.to_string()).to_string(),
            };
        }
    };
    match result {
        Ok(reply) => reply.into(),
        Err(e) => ServerMessage::Error {
            message: e.to_string(),
        },
    }
}

async fn handle_chat_socket(mut socket: WebSocket, manager: Arc<SessionManager>) {
    let (id, greeting) = manager.open().await;
    info!(session = %id, "Chat client connected");

    if let Err(e) = send(&mut socket, greeting.into()).await {
        debug!(session = %id, error = %e, "Chat client left before greeting");
        manager.close(id).await;
        return;
    }

    loop {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) => {
                let reply = respond_to(&manager, id, text.as_str()).await;
                if let Err(e) = send(&mut socket, reply).await {
                    debug!(session = %id, error = %e, "Chat client disconnected during send");
                    break;
                }
            }
            Some(Ok(Message::Ping(data))) => {
                if socket.send(Message::Pong(data)).await.is_err() {
                    break;
                }
            }
            Some(Ok(Message::Close(_))) | None => {
                info!(session = %id, "Chat client disconnected");
                break;
            }
            Some(Err(e)) => {
                warn!(session = %id, error = %e, "Chat WebSocket error");
                break;
            }
            _ => {}
        }
    }

    manager.close(id).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_frames_parse() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type": "message", "content": "Alice"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Message { ref content } if content == "Alice"));

        let clear: ClientMessage = serde_json::from_str(r#"{"type": "clear"}"#).unwrap();
        assert!(matches!(clear, ClientMessage::Clear));

        assert!(serde_json::from_str::<ClientMessage>(r#"{"type": "shout"}"#).is_err());
    }

    #[test]
    fn server_frames_serialize() {
        let response: ServerMessage = Reply::assistant("hello").into();
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            serde_json::json!({"type": "response", "role": "assistant", "content": "hello"})
        );

        let error = ServerMessage::Error {
            message: "nope".to_string(),
        };
        assert_eq!(
            serde_json::to_value(error).unwrap(),
            serde_json::json!({"type": "error", "message": "nope"})
        );
    }
}
