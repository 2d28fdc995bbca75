//! Bookkeeping of fees held per in-flight packet.
//!
//! Nothing here moves funds. Callers move tokens into the escrow account
//! before recording them and out of it before deleting the record.

use cosmwasm_std::{Order, StdResult, Storage};
use relay_fee_types::{IdentifiedPacketFees, PacketFee, PacketFees, PacketId};

use crate::state::FEES_IN_ESCROW;

fn key(packet_id: &PacketId) -> (&str, &str, u64) {
    (
        packet_id.port_id.as_str(),
        packet_id.channel_id.as_str(),
        packet_id.sequence,
    )
}

/// Append `packet_fees` to whatever is already escrowed for the packet
pub fn escrow(
    storage: &mut dyn Storage,
    packet_id: &PacketId,
    packet_fees: Vec<PacketFee>,
) -> StdResult<PacketFees> {
    let mut fees = get(storage, packet_id)?.unwrap_or_default();
    fees.packet_fees.extend(packet_fees);
    set(storage, packet_id, &fees)?;
    Ok(fees)
}

pub fn has(storage: &dyn Storage, packet_id: &PacketId) -> bool {
    FEES_IN_ESCROW.has(storage, key(packet_id))
}

pub fn get(storage: &dyn Storage, packet_id: &PacketId) -> StdResult<Option<PacketFees>> {
    FEES_IN_ESCROW.may_load(storage, key(packet_id))
}

/// Overwrite the record; an empty list removes it
pub fn set(storage: &mut dyn Storage, packet_id: &PacketId, fees: &PacketFees) -> StdResult<()> {
    if fees.is_empty() {
        delete(storage, packet_id);
        return Ok(());
    }
    FEES_IN_ESCROW.save(storage, key(packet_id), fees)
}

pub fn delete(storage: &mut dyn Storage, packet_id: &PacketId) {
    FEES_IN_ESCROW.remove(storage, key(packet_id));
}

/// Every record on one channel, ordered by sequence
pub fn for_channel(
    storage: &dyn Storage,
    port_id: &str,
    channel_id: &str,
) -> StdResult<Vec<IdentifiedPacketFees>> {
    FEES_IN_ESCROW
        .prefix((port_id, channel_id))
        .range(storage, None, None, Order::Ascending)
        .map(|item| {
            let (sequence, fees) = item?;
            Ok(IdentifiedPacketFees {
                packet_id: PacketId::new(port_id, channel_id, sequence),
                packet_fees: fees.packet_fees,
            })
        })
        .collect()
}

pub fn all(storage: &dyn Storage) -> StdResult<Vec<IdentifiedPacketFees>> {
    FEES_IN_ESCROW
        .range(storage, None, None, Order::Ascending)
        .map(|item| {
            let ((port_id, channel_id, sequence), fees) = item?;
            Ok(IdentifiedPacketFees {
                packet_id: PacketId::new(port_id, channel_id, sequence),
                packet_fees: fees.packet_fees,
            })
        })
        .collect()
}
