use cosmwasm_std::StdError;
use relay_fee_types::DecodeError;
use thiserror::Error;

use crate::keepers::BankError;

#[derive(Error, Debug)]
pub enum FeeError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("invalid fee version: expected {expected}, got {got}")]
    InvalidVersion { expected: String, got: String },

    #[error("the fee module is locked and requires manual intervention")]
    ModuleLocked,

    #[error("fee is not enabled on channel {port_id}/{channel_id}")]
    FeeNotEnabled { port_id: String, channel_id: String },

    #[error("unsupported action: {0}")]
    UnsupportedAction(String),

    #[error("invalid {role} address {address:?}: {reason}")]
    InvalidAddress {
        role: &'static str,
        address: String,
        reason: String,
    },

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("channel not found: {port_id}/{channel_id}")]
    ChannelNotFound { port_id: String, channel_id: String },

    #[error("next sequence send not found for {port_id}/{channel_id}")]
    SequenceSendNotFound { port_id: String, channel_id: String },

    #[error("packet {packet_id} has not been sent")]
    PacketNotFound { packet_id: String },

    #[error("packet commitment not found for {packet_id}: already acknowledged or timed out")]
    PacketCommitmentNotFound { packet_id: String },

    #[error("refund account not found: {address}")]
    RefundAccountNotFound { address: String },

    #[error("invalid fee: {0}")]
    InvalidFee(String),

    #[error("relayer allow-lists are not supported")]
    RelayersNotEmpty,

    #[error("counterparty payee must not be empty")]
    CounterpartyPayeeEmpty,

    #[error("counterparty payee exceeds {max} bytes")]
    CounterpartyPayeeTooLong { max: usize },

    #[error("no relayer recorded for async acknowledgement of packet {packet_id}")]
    RelayerNotFoundForAsyncAck { packet_id: String },

    #[error("invalid identifier {id:?}: {reason}")]
    InvalidIdentifier { id: String, reason: String },

    #[error("bank error: {0}")]
    Bank(#[from] BankError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Application(#[from] anyhow::Error),
}

impl FeeError {
    pub(crate) fn invalid_address(role: &'static str, address: &str, err: StdError) -> Self {
        FeeError::InvalidAddress {
            role,
            address: address.to_string(),
            reason: err.to_string(),
        }
    }
}
