//! The unit of data moved through the fabric.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A packet travelling through the router.
///
/// The router itself only accounts for packets; it never inspects the
/// payload. Delivery layers are free to put anything JSON-shaped in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    /// Sequence number assigned by the producer.
    pub seq: u64,
    /// Opaque payload.
    #[serde(default)]
    pub payload: Value,
}

impl Packet {
    pub fn new(seq: u64) -> Self {
        Self {
            seq,
            payload: Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_packet_carries_payload() {
        let packet = Packet::new(7).with_payload(json!({"level": 0.5}));
        assert_eq!(packet.seq, 7);
        assert_eq!(packet.payload["level"], 0.5);
    }
}
