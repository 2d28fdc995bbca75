use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Coin, StdResult};

use crate::{
    coins::{is_zero, sum_coins, validate_coins},
    FeeValidationError, PacketId,
};

/// Fees offered to relayers for each step of a packet lifecycle
#[cw_serde]
#[derive(Default)]
pub struct Fee {
    /// Paid to the relayer that delivers the packet to the counterparty
    pub recv_fee: Vec<Coin>,

    /// Paid to the relayer that relays the acknowledgement back
    pub ack_fee: Vec<Coin>,

    /// Paid to the relayer that relays a timeout
    pub timeout_fee: Vec<Coin>,
}

impl Fee {
    pub fn new(recv_fee: Vec<Coin>, ack_fee: Vec<Coin>, timeout_fee: Vec<Coin>) -> Self {
        Self {
            recv_fee,
            ack_fee,
            timeout_fee,
        }
    }

    /// Coin-wise sum of all three fees; the amount held in escrow
    pub fn total(&self) -> StdResult<Vec<Coin>> {
        sum_coins([
            self.recv_fee.as_slice(),
            self.ack_fee.as_slice(),
            self.timeout_fee.as_slice(),
        ])
    }

    /// Portion paid out when a packet is acknowledged
    pub fn recv_and_ack(&self) -> StdResult<Vec<Coin>> {
        sum_coins([self.recv_fee.as_slice(), self.ack_fee.as_slice()])
    }

    pub fn validate(&self) -> Result<(), FeeValidationError> {
        for (field, coins) in [
            ("recv", &self.recv_fee),
            ("ack", &self.ack_fee),
            ("timeout", &self.timeout_fee),
        ] {
            validate_coins(coins)
                .map_err(|reason| FeeValidationError::InvalidCoins { field, reason })?;
        }

        if is_zero(&self.recv_fee) && is_zero(&self.ack_fee) && is_zero(&self.timeout_fee) {
            return Err(FeeValidationError::AllZero);
        }

        self.total()
            .map(|_| ())
            .map_err(|e| FeeValidationError::Arithmetic(e.to_string()))
    }
}

/// One payer's incentive for one packet
#[cw_serde]
pub struct PacketFee {
    pub fee: Fee,

    /// Receives whatever is not paid out to relayers
    pub refund_address: String,

    /// Relayer allow-list, reserved for future use and required to be empty
    #[serde(default)]
    pub relayers: Vec<String>,
}

impl PacketFee {
    pub fn new(fee: Fee, refund_address: impl Into<String>) -> Self {
        Self {
            fee,
            refund_address: refund_address.into(),
            relayers: vec![],
        }
    }
}

/// All incentives escrowed for one packet, in the order they were paid
#[cw_serde]
#[derive(Default)]
pub struct PacketFees {
    pub packet_fees: Vec<PacketFee>,
}

impl PacketFees {
    pub fn new(packet_fees: Vec<PacketFee>) -> Self {
        Self { packet_fees }
    }

    pub fn is_empty(&self) -> bool {
        self.packet_fees.is_empty()
    }

    /// Sum of `Fee::total` across every entry
    pub fn total(&self) -> StdResult<Vec<Coin>> {
        let totals = self
            .packet_fees
            .iter()
            .map(|packet_fee| packet_fee.fee.total())
            .collect::<StdResult<Vec<_>>>()?;
        sum_coins(totals.iter().map(Vec::as_slice))
    }

    pub fn total_recv_fees(&self) -> StdResult<Vec<Coin>> {
        sum_coins(self.packet_fees.iter().map(|p| p.fee.recv_fee.as_slice()))
    }

    pub fn total_ack_fees(&self) -> StdResult<Vec<Coin>> {
        sum_coins(self.packet_fees.iter().map(|p| p.fee.ack_fee.as_slice()))
    }

    pub fn total_timeout_fees(&self) -> StdResult<Vec<Coin>> {
        sum_coins(self.packet_fees.iter().map(|p| p.fee.timeout_fee.as_slice()))
    }
}

/// Escrowed fees together with the packet they incentivize
#[cw_serde]
pub struct IdentifiedPacketFees {
    pub packet_id: PacketId,
    pub packet_fees: Vec<PacketFee>,
}
