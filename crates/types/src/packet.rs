use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Binary;

/// Unique identity of one packet on the chain that sent it
#[cw_serde]
#[derive(Eq, Hash, PartialOrd, Ord)]
pub struct PacketId {
    pub port_id: String,
    pub channel_id: String,
    pub sequence: u64,
}

impl PacketId {
    pub fn new(port_id: impl Into<String>, channel_id: impl Into<String>, sequence: u64) -> Self {
        Self {
            port_id: port_id.into(),
            channel_id: channel_id.into(),
            sequence,
        }
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.port_id, self.channel_id, self.sequence)
    }
}

/// A cross-chain packet as delivered by the transport layer
#[cw_serde]
pub struct Packet {
    pub sequence: u64,
    pub source_port: String,
    pub source_channel: String,
    pub destination_port: String,
    pub destination_channel: String,
    pub data: Binary,
    pub timeout_timestamp: u64,
}

impl Packet {
    /// Identity on the sending chain; fees are escrowed under this id
    pub fn source_id(&self) -> PacketId {
        PacketId::new(&self.source_port, &self.source_channel, self.sequence)
    }

    /// Identity on the receiving chain; used for the async relayer stash
    pub fn destination_id(&self) -> PacketId {
        PacketId::new(
            &self.destination_port,
            &self.destination_channel,
            self.sequence,
        )
    }
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum Order {
    Unordered,
    Ordered,
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum ChannelState {
    Init,
    TryOpen,
    Open,
    Flushing,
    Closed,
}

#[cw_serde]
#[derive(Eq)]
pub struct Counterparty {
    pub port_id: String,
    pub channel_id: String,
}

impl Counterparty {
    pub fn new(port_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            port_id: port_id.into(),
            channel_id: channel_id.into(),
        }
    }
}

/// Channel as stored by the transport layer
#[cw_serde]
pub struct ChannelEnd {
    pub state: ChannelState,
    pub ordering: Order,
    pub counterparty: Counterparty,
    pub connection_hops: Vec<String>,
    pub version: String,
}

/// Acknowledgement produced by an application on packet receipt
#[cw_serde]
pub struct Acknowledgement {
    pub data: Binary,
    pub success: bool,
}

impl Acknowledgement {
    pub fn ok(data: impl Into<Binary>) -> Self {
        Self {
            data: data.into(),
            success: true,
        }
    }

    /// Error acknowledgement with the conventional `{"error": ...}` body
    pub fn err(message: impl Into<String>) -> Self {
        let body = serde_json::json!({ "error": message.into() });
        Self {
            data: Binary::from(body.to_string().into_bytes()),
            success: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_ids() {
        let packet = Packet {
            sequence: 7,
            source_port: "transfer".to_string(),
            source_channel: "channel-0".to_string(),
            destination_port: "transfer".to_string(),
            destination_channel: "channel-9".to_string(),
            data: Binary::default(),
            timeout_timestamp: 0,
        };
        assert_eq!(packet.source_id().to_string(), "transfer/channel-0/7");
        assert_eq!(packet.destination_id().to_string(), "transfer/channel-9/7");
    }

    #[test]
    fn test_error_ack_body() {
        let ack = Acknowledgement::err("boom");
        assert!(!ack.success);
        assert_eq!(ack.data.as_slice(), br#"{"error":"boom"}"#);
    }
}
