//! Relayer identity and payout-address bookkeeping.

use cosmwasm_std::{Order, StdResult, Storage};
use relay_fee_types::PacketId;

use crate::state::{ASYNC_RELAYERS, COUNTERPARTY_PAYEES, PAYEES};

fn packet_key(packet_id: &PacketId) -> (&str, &str, u64) {
    (
        packet_id.port_id.as_str(),
        packet_id.channel_id.as_str(),
        packet_id.sequence,
    )
}

pub fn set_payee(
    storage: &mut dyn Storage,
    relayer: &str,
    channel_id: &str,
    payee: &str,
) -> StdResult<()> {
    PAYEES.save(storage, (relayer, channel_id), &payee.to_string())
}

pub fn payee(storage: &dyn Storage, relayer: &str, channel_id: &str) -> StdResult<Option<String>> {
    PAYEES.may_load(storage, (relayer, channel_id))
}

pub fn set_counterparty_payee(
    storage: &mut dyn Storage,
    relayer: &str,
    channel_id: &str,
    counterparty_payee: &str,
) -> StdResult<()> {
    COUNTERPARTY_PAYEES.save(
        storage,
        (relayer, channel_id),
        &counterparty_payee.to_string(),
    )
}

pub fn counterparty_payee(
    storage: &dyn Storage,
    relayer: &str,
    channel_id: &str,
) -> StdResult<Option<String>> {
    COUNTERPARTY_PAYEES.may_load(storage, (relayer, channel_id))
}

/// (relayer, channel, payee) for every registered payee
pub fn all_payees(storage: &dyn Storage) -> StdResult<Vec<(String, String, String)>> {
    PAYEES
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|((relayer, channel), payee)| (relayer, channel, payee)))
        .collect()
}

/// (relayer, channel, counterparty payee) for every registration
pub fn all_counterparty_payees(storage: &dyn Storage) -> StdResult<Vec<(String, String, String)>> {
    COUNTERPARTY_PAYEES
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|((relayer, channel), payee)| (relayer, channel, payee)))
        .collect()
}

/// Address the counterparty should credit when `relayer` delivers a packet
/// on `channel_id`. Empty when the relayer registered nothing.
pub fn forward_relayer(storage: &dyn Storage, relayer: &str, channel_id: &str) -> StdResult<String> {
    Ok(counterparty_payee(storage, relayer, channel_id)?.unwrap_or_default())
}

pub fn set_async_relayer(
    storage: &mut dyn Storage,
    packet_id: &PacketId,
    relayer: &str,
) -> StdResult<()> {
    ASYNC_RELAYERS.save(storage, packet_key(packet_id), &relayer.to_string())
}

pub fn async_relayer(storage: &dyn Storage, packet_id: &PacketId) -> StdResult<Option<String>> {
    ASYNC_RELAYERS.may_load(storage, packet_key(packet_id))
}

pub fn delete_async_relayer(storage: &mut dyn Storage, packet_id: &PacketId) {
    ASYNC_RELAYERS.remove(storage, packet_key(packet_id));
}
