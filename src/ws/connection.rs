//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! applying subscription commands and forwarding filtered events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{RegistryEvent, ServiceIdentity};

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads subscription commands from the client.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(socket: WebSocket, mut event_rx: broadcast::Receiver<RegistryEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(registry_event) => {
                        if let Some(json) = forward_event(&subs, &registry_event)
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Returns the envelope to send for `event`, or `None` when the
/// connection is not subscribed to its instance.
fn forward_event(subs: &SubscriptionManager, event: &RegistryEvent) -> Option<String> {
    if !subs.matches(event.identity()) {
        return None;
    }
    event_message(event)
}

/// Serializes an event into an `event` envelope.
fn event_message(event: &RegistryEvent) -> Option<String> {
    let payload = serde_json::to_value(event).ok()?;
    let msg = WsMessage::new(uuid::Uuid::new_v4().to_string(), WsMessageType::Event, payload);
    serde_json::to_string(&msg).ok()
}

/// Splits requested names into parsed identities, a wildcard flag and the
/// names that could not be parsed.
fn parse_names(names: &[String]) -> (Vec<ServiceIdentity>, bool, Vec<String>) {
    let mut identities = Vec::new();
    let mut wildcard = false;
    let mut rejected = Vec::new();
    for name in names {
        if name == "*" {
            wildcard = true;
        } else if let Ok(identity) = name.parse::<ServiceIdentity>() {
            identities.push(identity);
        } else {
            rejected.push(name.clone());
        }
    }
    (identities, wildcard, rejected)
}

/// Handles a text message from the client, returning an optional JSON
/// response.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        let err = WsMessage::new(
            String::new(),
            WsMessageType::Error,
            serde_json::json!({
                "code": 400,
                "message": "malformed JSON"
            }),
        );
        return serde_json::to_string(&err).ok();
    };

    let response = match serde_json::from_value::<WsCommand>(msg.payload) {
        Ok(WsCommand::Subscribe { instances }) => {
            let (identities, wildcard, rejected) = parse_names(&instances);
            subs.subscribe(&identities, wildcard);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": identities.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "rejected": rejected,
                    "count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        Ok(WsCommand::Unsubscribe { instances }) => {
            let (identities, _, rejected) = parse_names(&instances);
            subs.unsubscribe(&identities);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "unsubscribed": identities.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "rejected": rejected,
                    "remaining_count": subs.count(),
                }),
            )
        }
        Err(_) => WsMessage::new(
            msg.id,
            WsMessageType::Error,
            serde_json::json!({
                "code": 404,
                "message": "unknown command"
            }),
        ),
    };
    serde_json::to_string(&response).ok()
}
