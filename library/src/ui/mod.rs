//! Push channel towards the host's widget layer.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::error::NodeError;

#[derive(Debug, Clone, PartialEq)]
pub struct UiMessage {
    pub topic: String,
    pub payload: Value,
}

impl UiMessage {
    pub fn new(topic: &str, payload: &impl Serialize) -> Result<Self, NodeError> {
        Ok(Self {
            topic: topic.to_string(),
            payload: serde_json::to_value(payload)?,
        })
    }
}

/// Fire-and-forget outbound notifications. Implementations must not block.
pub trait UiChannel: Send + Sync {
    fn send(&self, message: UiMessage) -> Result<(), NodeError>;
}

/// Channel backed by an unbounded tokio mpsc queue; the host drains the receiver.
pub struct TokioUiChannel {
    sender: UnboundedSender<UiMessage>,
}

impl TokioUiChannel {
    pub fn new() -> (Self, UnboundedReceiver<UiMessage>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl UiChannel for TokioUiChannel {
    fn send(&self, message: UiMessage) -> Result<(), NodeError> {
        self.sender
            .send(message)
            .map_err(|e| NodeError::UiPush(format!("receiver closed, dropped '{}'", e.0.topic)))
    }
}

/// Keeps every message in memory. Used when no host UI is attached.
#[derive(Default)]
pub struct RecordingUiChannel {
    messages: Mutex<Vec<UiMessage>>,
}

impl RecordingUiChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<UiMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl UiChannel for RecordingUiChannel {
    fn send(&self, message: UiMessage) -> Result<(), NodeError> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tokio_channel_delivers_without_runtime() {
        let (channel, mut rx) = TokioUiChannel::new();
        channel
            .send(UiMessage::new("topic", &json!({ "a": 1 })).unwrap())
            .unwrap();
        let msg = rx.try_recv().unwrap();
        assert_eq!(msg.topic, "topic");
        assert_eq!(msg.payload["a"], 1);
    }

    #[test]
    fn closed_receiver_is_an_error() {
        let (channel, rx) = TokioUiChannel::new();
        drop(rx);
        let result = channel.send(UiMessage::new("topic", &json!({})).unwrap());
        assert!(matches!(result, Err(NodeError::UiPush(_))));
    }
}
