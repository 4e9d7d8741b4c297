//! WebSocket Routes
//!
//! 실시간 원장 이벤트 스트리밍 WebSocket 엔드포인트
//!
//! # Endpoints
//! - `GET /ws` - WebSocket 연결 (기본 구독: all_events + pool_status)
//!
//! # Client Messages
//! ```json
//! {"action":"Subscribe","channel":"account:0x…"}
//! {"action":"Unsubscribe","channel":"all_events"}
//! {"action":"Ping"}
//! ```

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast::error::RecvError, mpsc};

use crate::services::websocket::{
    parse_client_message, serialize_message, ClientMessage, SubscriptionConfirm, WsError,
};
use crate::services::{Channel, ConnectionInfo, Subscriptions, WsHub, WsMessage};
use crate::AppState;

/// 수신 태스크 → 송신 태스크 제어 메시지
#[derive(Debug)]
enum Control {
    Subscribe(Channel),
    Unsubscribe(Channel),
    Reply(WsMessage),
}

/// WebSocket 업그레이드 핸들러
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let hub = state.ws_hub.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// WebSocket 연결 처리
async fn handle_socket(socket: WebSocket, hub: Arc<WsHub>) {
    let (mut sender, mut receiver) = socket.split();

    // 원장 이벤트 구독 (연결 쪽에서 필터링)
    let mut rx = hub.subscribe();

    // 연결 ID 생성
    let conn_id = uuid::Uuid::new_v4().to_string();
    let mut subscriptions = Subscriptions::all();

    // 연결 등록
    let now = unix_now();
    hub.register_connection(ConnectionInfo {
        id: conn_id.clone(),
        connected_at: now,
        subscriptions: subscriptions.channels(),
        last_activity: now,
    })
    .await;
    tracing::debug!(conn_id = %conn_id, "websocket connected");

    let (ctl_tx, mut ctl_rx) = mpsc::channel::<Control>(32);

    // 수신 태스크
    let conn_id_recv = conn_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    let control = handle_client_message(&conn_id_recv, &text);
                    if ctl_tx.send(control).await.is_err() {
                        break;
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // 송신 태스크
    let hub_send = hub.clone();
    let conn_id_send = conn_id.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            let outgoing = tokio::select! {
                msg = rx.recv() => match msg {
                    Ok(msg) if subscriptions.accepts(&msg) => msg,
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(conn_id = %conn_id_send, skipped, "websocket client lagging");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
                control = ctl_rx.recv() => match control {
                    Some(Control::Subscribe(channel)) => {
                        subscriptions.insert(channel);
                        hub_send.update_subscriptions(&conn_id_send, &subscriptions, unix_now()).await;
                        confirm(channel, true)
                    }
                    Some(Control::Unsubscribe(channel)) => {
                        subscriptions.remove(&channel);
                        hub_send.update_subscriptions(&conn_id_send, &subscriptions, unix_now()).await;
                        confirm(channel, false)
                    }
                    Some(Control::Reply(msg)) => msg,
                    None => break,
                },
            };

            match serialize_message(&outgoing) {
                Ok(json) => {
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(e) => tracing::error!("failed to serialize ws message: {:?}", e),
            }
        }
    });

    // 연결이 종료될 때까지 대기
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    }

    // 연결 해제
    hub.unregister_connection(&conn_id).await;
    tracing::debug!(conn_id = %conn_id, "websocket disconnected");
}

fn confirm(channel: Channel, subscribed: bool) -> WsMessage {
    WsMessage::Subscribed(SubscriptionConfirm {
        channel: channel.to_string(),
        subscribed,
    })
}

/// 클라이언트 메시지 처리
fn handle_client_message(conn_id: &str, text: &str) -> Control {
    let msg = match parse_client_message(text) {
        Ok(msg) => msg,
        Err(e) => {
            return Control::Reply(WsMessage::Error(WsError {
                code: 400,
                message: format!("invalid message: {}", e),
            }))
        }
    };

    match msg {
        ClientMessage::Subscribe { channel } => match Channel::parse(&channel) {
            Some(parsed) => {
                tracing::info!("Connection {} subscribed to {}", conn_id, parsed);
                Control::Subscribe(parsed)
            }
            None => unknown_channel(&channel),
        },
        ClientMessage::Unsubscribe { channel } => match Channel::parse(&channel) {
            Some(parsed) => {
                tracing::info!("Connection {} unsubscribed from {}", conn_id, parsed);
                Control::Unsubscribe(parsed)
            }
            None => unknown_channel(&channel),
        },
        ClientMessage::Ping => Control::Reply(WsMessage::Pong),
    }
}

fn unknown_channel(channel: &str) -> Control {
    Control::Reply(WsMessage::Error(WsError {
        code: 404,
        message: format!("unknown channel: {}", channel),
    }))
}
