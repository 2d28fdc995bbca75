use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_string, StdResult};

use crate::{codec::decode_strict, DecodeError, FEE_VERSION};

/// Channel version metadata signalling fee participation.
///
/// Encoded as JSON and stored verbatim as the channel version string, e.g.
/// `{"fee_version":"ics29-1","app_version":"ics20-1"}`.
#[cw_serde]
#[derive(Eq)]
pub struct Metadata {
    #[serde(default)]
    pub fee_version: String,

    /// Version of the wrapped application
    #[serde(default)]
    pub app_version: String,
}

impl Metadata {
    const FIELDS: &'static [&'static str] = &["fee_version", "app_version"];

    pub fn new(app_version: impl Into<String>) -> Self {
        Self {
            fee_version: FEE_VERSION.to_string(),
            app_version: app_version.into(),
        }
    }

    /// Try to interpret a channel version string as fee metadata
    pub fn from_version(version: &str) -> Result<Self, DecodeError> {
        decode_strict(version.as_bytes(), Self::FIELDS)
    }

    pub fn to_version(&self) -> StdResult<String> {
        to_json_string(self)
    }

    pub fn is_supported(&self) -> bool {
        self.fee_version == FEE_VERSION
    }
}

/// Returns true when `version` is fee metadata carrying the supported fee version
pub fn is_fee_version(version: &str) -> bool {
    Metadata::from_version(version)
        .map(|metadata| metadata.is_supported())
        .unwrap_or(false)
}
