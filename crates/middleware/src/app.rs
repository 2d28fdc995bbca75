//! Interface of the wrapped application.
//!
//! Optional capabilities are discovered through explicit queries returning
//! `Option`, never through downcasting.

use cosmwasm_std::{Addr, Storage};
use relay_fee_types::{Acknowledgement, Counterparty, Order, Packet};

pub type AppResult<T> = anyhow::Result<T>;

/// Channel parameters shared by the open-init and open-try steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOpen {
    pub order: Order,
    pub connection_hops: Vec<String>,
    pub port_id: String,
    pub channel_id: String,
    pub counterparty: Counterparty,
}

/// Decoded packet data together with the application version that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct PacketData {
    pub data: serde_json::Value,
    pub version: String,
}

pub trait IbcModule {
    /// Returns the application version to propose; `version` may be empty
    fn on_chan_open_init(
        &mut self,
        storage: &mut dyn Storage,
        channel: &ChannelOpen,
        version: &str,
    ) -> AppResult<String>;

    fn on_chan_open_try(
        &mut self,
        storage: &mut dyn Storage,
        channel: &ChannelOpen,
        counterparty_version: &str,
    ) -> AppResult<String>;

    fn on_chan_open_ack(
        &mut self,
        storage: &mut dyn Storage,
        port_id: &str,
        channel_id: &str,
        counterparty_channel_id: &str,
        counterparty_version: &str,
    ) -> AppResult<()>;

    fn on_chan_open_confirm(
        &mut self,
        storage: &mut dyn Storage,
        port_id: &str,
        channel_id: &str,
    ) -> AppResult<()>;

    fn on_chan_close_init(
        &mut self,
        storage: &mut dyn Storage,
        port_id: &str,
        channel_id: &str,
    ) -> AppResult<()>;

    fn on_chan_close_confirm(
        &mut self,
        storage: &mut dyn Storage,
        port_id: &str,
        channel_id: &str,
    ) -> AppResult<()>;

    /// `None` means the acknowledgement will be written asynchronously
    fn on_recv_packet(
        &mut self,
        storage: &mut dyn Storage,
        channel_version: &str,
        packet: &Packet,
        relayer: &Addr,
    ) -> Option<Acknowledgement>;

    fn on_acknowledgement_packet(
        &mut self,
        storage: &mut dyn Storage,
        channel_version: &str,
        packet: &Packet,
        acknowledgement: &[u8],
        relayer: &Addr,
    ) -> AppResult<()>;

    fn on_timeout_packet(
        &mut self,
        storage: &mut dyn Storage,
        channel_version: &str,
        packet: &Packet,
        relayer: &Addr,
    ) -> AppResult<()>;

    fn upgradable(&mut self) -> Option<&mut dyn UpgradableModule> {
        None
    }

    fn packet_data_unmarshaler(&self) -> Option<&dyn PacketDataUnmarshaler> {
        None
    }
}

/// Channel upgrade callbacks, for applications that support upgrades
pub trait UpgradableModule {
    fn on_chan_upgrade_init(
        &mut self,
        storage: &mut dyn Storage,
        port_id: &str,
        channel_id: &str,
        order: Order,
        connection_hops: &[String],
        version: &str,
    ) -> AppResult<String>;

    fn on_chan_upgrade_try(
        &mut self,
        storage: &mut dyn Storage,
        port_id: &str,
        channel_id: &str,
        order: Order,
        connection_hops: &[String],
        counterparty_version: &str,
    ) -> AppResult<String>;

    fn on_chan_upgrade_ack(
        &mut self,
        storage: &mut dyn Storage,
        port_id: &str,
        channel_id: &str,
        counterparty_version: &str,
    ) -> AppResult<()>;

    fn on_chan_upgrade_open(
        &mut self,
        storage: &mut dyn Storage,
        port_id: &str,
        channel_id: &str,
        order: Order,
        connection_hops: &[String],
        version: &str,
    );
}

pub trait PacketDataUnmarshaler {
    fn unmarshal_packet_data(
        &self,
        storage: &dyn Storage,
        port_id: &str,
        channel_id: &str,
        data: &[u8],
    ) -> AppResult<PacketData>;
}
