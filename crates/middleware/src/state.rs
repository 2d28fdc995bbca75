use cw_storage_plus::{Item, Map};
use relay_fee_types::PacketFees;

/// Escrowed fees keyed by (port, channel, sequence) of the sending side
pub const FEES_IN_ESCROW: Map<(&str, &str, u64), PacketFees> = Map::new("fees_in_escrow");

/// Channels that finished negotiating fees, keyed by (port, channel)
pub const FEE_ENABLED: Map<(&str, &str), bool> = Map::new("fee_enabled");

/// Local payout address, keyed by (relayer, channel)
pub const PAYEES: Map<(&str, &str), String> = Map::new("payees");

/// Address on this chain the counterparty should pay, keyed by
/// (relayer, channel)
pub const COUNTERPARTY_PAYEES: Map<(&str, &str), String> = Map::new("counterparty_payees");

/// Relayer that delivered a packet whose acknowledgement is still pending,
/// keyed by (port, channel, sequence) of the receiving side
pub const ASYNC_RELAYERS: Map<(&str, &str, u64), String> = Map::new("async_relayers");

pub const MODULE_LOCKED: Item<bool> = Item::new("module_locked");
