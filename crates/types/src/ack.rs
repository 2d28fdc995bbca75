use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Binary, StdResult};

use crate::{codec::decode_strict, DecodeError};

/// Acknowledgement written by a fee-enabled receiving chain.
///
/// Wraps the application's own acknowledgement together with the relayer
/// to be credited for delivery.
#[cw_serde]
pub struct IncentivizedAcknowledgement {
    #[serde(default)]
    pub app_acknowledgement: Binary,

    /// Counterparty payee of the relayer that delivered the packet, empty if
    /// none was registered
    #[serde(default)]
    pub forward_relayer_address: String,

    #[serde(default)]
    pub underlying_app_success: bool,
}

impl IncentivizedAcknowledgement {
    const FIELDS: &'static [&'static str] = &[
        "app_acknowledgement",
        "forward_relayer_address",
        "underlying_app_success",
    ];

    pub fn new(
        app_acknowledgement: impl Into<Binary>,
        forward_relayer_address: impl Into<String>,
        underlying_app_success: bool,
    ) -> Self {
        Self {
            app_acknowledgement: app_acknowledgement.into(),
            forward_relayer_address: forward_relayer_address.into(),
            underlying_app_success,
        }
    }

    pub fn encode(&self) -> StdResult<Binary> {
        to_json_binary(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        decode_strict(bytes, Self::FIELDS)
    }

    pub fn success(&self) -> bool {
        self.underlying_app_success
    }
}
