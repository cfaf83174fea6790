use serde_json::Value;
use tokio::sync::mpsc;

use crate::protocol::execute_message;
use crate::types::RawAttribute;
use crate::{Error, Result};

/// Outbound side of the hub connection. Calls must not block; delivery
/// is confirmed later by an inbound delta, never by the return value.
pub trait Transport: Send + Sync {
    fn set_attribute(&self, device_id: &str, attr: &RawAttribute) -> Result<()>;

    /// Write several attributes in one request so the hub applies them together.
    fn set_attributes(&self, device_id: &str, attrs: &[RawAttribute]) -> Result<()>;
}

/// A write queued for the network task.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub device_id: String,
    pub attrs: Vec<RawAttribute>,
    pub atomic: bool,
    pub payload: Value,
}

/// Queues writes on an unbounded tokio channel drained by the host's connection task.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn push(&self, device_id: &str, attrs: &[RawAttribute], atomic: bool) -> Result<()> {
        let msg = OutboundMessage {
            device_id: device_id.to_string(),
            attrs: attrs.to_vec(),
            atomic,
            payload: execute_message(device_id, attrs),
        };
        self.tx.send(msg).map_err(|_| Error::TransportClosed)
    }
}

impl Transport for ChannelTransport {
    fn set_attribute(&self, device_id: &str, attr: &RawAttribute) -> Result<()> {
        self.push(device_id, std::slice::from_ref(attr), false)
    }

    fn set_attributes(&self, device_id: &str, attrs: &[RawAttribute]) -> Result<()> {
        self.push(device_id, attrs, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queues_single_and_batch() {
        let (transport, mut rx) = ChannelTransport::new();
        transport
            .set_attribute("dev-1", &RawAttribute::new("acRunning", 0))
            .unwrap();
        transport
            .set_attributes(
                "dev-1",
                &[
                    RawAttribute::new("acRunning", 1),
                    RawAttribute::new("acMode", 1),
                ],
            )
            .unwrap();

        let single = rx.recv().await.unwrap();
        assert!(!single.atomic);
        assert_eq!(single.attrs.len(), 1);
        assert_eq!(single.payload["entities"][0]["id"], "dev-1");

        let batch = rx.recv().await.unwrap();
        assert!(batch.atomic);
        assert_eq!(batch.attrs.len(), 2);
        assert_eq!(batch.payload["entities"][0]["attributes"][1]["attr"], "acMode");
    }

    #[test]
    fn closed_channel_is_error() {
        let (transport, rx) = ChannelTransport::new();
        drop(rx);
        let err = transport
            .set_attribute("dev-1", &RawAttribute::new("on", 1))
            .unwrap_err();
        assert!(matches!(err, Error::TransportClosed));
    }
}
