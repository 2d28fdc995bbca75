//! Collaborators the middleware consumes but does not own.
//!
//! Account resolution, channel lookups and funds movement all belong to the
//! host chain. Everything a callback may touch is threaded through one
//! [`FeeDeps`] per transaction.

use cosmwasm_std::{Addr, Api, Binary, Coin, Storage};
use relay_fee_types::ChannelEnd;
use thiserror::Error;

/// Failures reported by the funds-movement collaborator.
///
/// `BlockedAddress` and `SendDisabled` are policy rejections; the distributor
/// redirects around them. `InsufficientFunds` on the escrow account means the
/// ledger and balances disagree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error("insufficient funds in {address}: need {required}")]
    InsufficientFunds { address: String, required: String },

    #[error("{0} is not allowed to receive funds")]
    BlockedAddress(String),

    #[error("sending {0} is disabled")]
    SendDisabled(String),

    #[error("account {0} does not exist")]
    UnknownAccount(String),
}

impl BankError {
    /// True when the transfer was refused by policy rather than by balances
    pub fn is_policy(&self) -> bool {
        matches!(self, BankError::BlockedAddress(_) | BankError::SendDisabled(_))
    }
}

pub trait AccountKeeper {
    /// Address of the named module account
    fn module_address(&self, module: &str) -> Addr;

    fn has_account(&self, addr: &Addr) -> bool;
}

pub trait ChannelKeeper {
    fn channel(&self, port_id: &str, channel_id: &str) -> Option<ChannelEnd>;

    fn has_channel(&self, port_id: &str, channel_id: &str) -> bool {
        self.channel(port_id, channel_id).is_some()
    }

    fn next_sequence_send(&self, port_id: &str, channel_id: &str) -> Option<u64>;

    fn packet_commitment(&self, port_id: &str, channel_id: &str, sequence: u64)
        -> Option<Binary>;

    /// Version string stored for the channel, fee metadata included
    fn app_version(&self, port_id: &str, channel_id: &str) -> Option<String> {
        self.channel(port_id, channel_id).map(|channel| channel.version)
    }
}

pub trait BankKeeper {
    fn has_balance(&self, addr: &Addr, coins: &[Coin]) -> bool;

    fn send_coins_from_account_to_module(
        &mut self,
        sender: &Addr,
        module: &str,
        coins: &[Coin],
    ) -> Result<(), BankError>;

    fn send_coins_from_module_to_account(
        &mut self,
        module: &str,
        recipient: &Addr,
        coins: &[Coin],
    ) -> Result<(), BankError>;

    fn is_blocked(&self, addr: &Addr) -> bool;

    fn is_send_enabled(&self, coins: &[Coin]) -> bool;
}

/// Per-transaction context handed to every callback
pub struct FeeDeps<'a> {
    pub storage: &'a mut dyn Storage,
    pub api: &'a dyn Api,
    pub bank: &'a mut dyn BankKeeper,
    pub accounts: &'a dyn AccountKeeper,
    pub channels: &'a dyn ChannelKeeper,
}
