use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Coin;
use relay_fee_types::{Fee, IdentifiedPacketFees, PacketFee, PacketId};

use crate::error::FeeError;

const IDENTIFIER_MIN_LENGTH: usize = 2;
const IDENTIFIER_MAX_LENGTH: usize = 128;

#[cw_serde]
pub enum ExecuteMsg {
    /// Redirect the sender's payouts on a channel to another local address
    RegisterPayee {
        port_id: String,
        channel_id: String,
        relayer: String,
        payee: String,
    },
    /// Tell the counterparty chain where to pay the sender for packets it
    /// delivers on this channel
    RegisterCounterpartyPayee {
        port_id: String,
        channel_id: String,
        relayer: String,
        counterparty_payee: String,
    },
    /// Incentivize the next packet sent on the channel; the sender is the
    /// refund address
    PayPacketFee {
        fee: Fee,
        source_port_id: String,
        source_channel_id: String,
        #[serde(default)]
        relayers: Vec<String>,
    },
    /// Incentivize a packet that was already sent
    PayPacketFeeAsync {
        packet_id: PacketId,
        packet_fee: PacketFee,
    },
}

impl ExecuteMsg {
    /// Checks that need no state
    pub fn validate(&self) -> Result<(), FeeError> {
        match self {
            ExecuteMsg::RegisterPayee {
                port_id,
                channel_id,
                ..
            }
            | ExecuteMsg::RegisterCounterpartyPayee {
                port_id,
                channel_id,
                ..
            } => {
                validate_identifier(port_id)?;
                validate_identifier(channel_id)
            }
            ExecuteMsg::PayPacketFee {
                fee,
                source_port_id,
                source_channel_id,
                relayers,
            } => {
                validate_identifier(source_port_id)?;
                validate_identifier(source_channel_id)?;
                validate_packet_fee(fee, relayers)
            }
            ExecuteMsg::PayPacketFeeAsync {
                packet_id,
                packet_fee,
            } => {
                validate_identifier(&packet_id.port_id)?;
                validate_identifier(&packet_id.channel_id)?;
                if packet_id.sequence == 0 {
                    return Err(FeeError::InvalidIdentifier {
                        id: packet_id.to_string(),
                        reason: "packet sequence cannot be 0".to_string(),
                    });
                }
                validate_packet_fee(&packet_fee.fee, &packet_fee.relayers)
            }
        }
    }
}

fn validate_packet_fee(fee: &Fee, relayers: &[String]) -> Result<(), FeeError> {
    fee.validate()
        .map_err(|e| FeeError::InvalidFee(e.to_string()))?;
    if !relayers.is_empty() {
        return Err(FeeError::RelayersNotEmpty);
    }
    Ok(())
}

/// Port and channel identifiers: 2 to 128 characters of `[a-zA-Z0-9._+\-#[]<>]`
pub fn validate_identifier(id: &str) -> Result<(), FeeError> {
    let invalid = |reason: &str| FeeError::InvalidIdentifier {
        id: id.to_string(),
        reason: reason.to_string(),
    };

    if id.trim().is_empty() {
        return Err(invalid("identifier cannot be blank"));
    }
    if !(IDENTIFIER_MIN_LENGTH..=IDENTIFIER_MAX_LENGTH).contains(&id.len()) {
        return Err(invalid("identifier length out of range"));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "._+-#[]<>".contains(c))
    {
        return Err(invalid("identifier contains invalid characters"));
    }
    Ok(())
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(IncentivizedPacketResponse)]
    IncentivizedPacket { packet_id: PacketId },

    #[returns(IncentivizedPacketsResponse)]
    IncentivizedPackets { limit: Option<u32> },

    #[returns(IncentivizedPacketsResponse)]
    IncentivizedPacketsForChannel {
        port_id: String,
        channel_id: String,
        limit: Option<u32>,
    },

    #[returns(FeesResponse)]
    TotalRecvFees { packet_id: PacketId },

    #[returns(FeesResponse)]
    TotalAckFees { packet_id: PacketId },

    #[returns(FeesResponse)]
    TotalTimeoutFees { packet_id: PacketId },

    #[returns(PayeeResponse)]
    Payee { channel_id: String, relayer: String },

    #[returns(CounterpartyPayeeResponse)]
    CounterpartyPayee { channel_id: String, relayer: String },

    #[returns(FeeEnabledChannelsResponse)]
    FeeEnabledChannels { limit: Option<u32> },

    #[returns(FeeEnabledChannelResponse)]
    FeeEnabledChannel { port_id: String, channel_id: String },

    #[returns(ModuleLockedResponse)]
    ModuleLocked {},
}

#[cw_serde]
pub struct IncentivizedPacketResponse {
    pub incentivized_packet: IdentifiedPacketFees,
}

#[cw_serde]
pub struct IncentivizedPacketsResponse {
    pub incentivized_packets: Vec<IdentifiedPacketFees>,
}

#[cw_serde]
pub struct FeesResponse {
    pub fees: Vec<Coin>,
}

#[cw_serde]
pub struct PayeeResponse {
    pub payee_address: String,
}

#[cw_serde]
pub struct CounterpartyPayeeResponse {
    pub counterparty_payee: String,
}

#[cw_serde]
pub struct FeeEnabledChannel {
    pub port_id: String,
    pub channel_id: String,
}

#[cw_serde]
pub struct FeeEnabledChannelsResponse {
    pub fee_enabled_channels: Vec<FeeEnabledChannel>,
}

#[cw_serde]
pub struct FeeEnabledChannelResponse {
    pub fee_enabled: bool,
}

#[cw_serde]
pub struct ModuleLockedResponse {
    pub locked: bool,
}
