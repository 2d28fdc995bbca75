//! Version wrapping during channel handshakes and upgrades, and the
//! per-channel fee flag those steps decide.
//!
//! The flag is only written by the step that finalizes a negotiation
//! (open-ack, open-confirm, upgrade-open). Init and try only rewrite the
//! version string, so an abandoned handshake leaves no trace.

use cosmwasm_std::{Order as StorageOrder, StdResult, Storage};
use relay_fee_types::{is_fee_version, Metadata, Order, FEE_VERSION};
use tracing::{debug, info, warn};

use crate::{
    app::{AppResult, ChannelOpen, IbcModule, UpgradableModule},
    error::FeeError,
    keepers::FeeDeps,
    middleware::FeeMiddleware,
    state::FEE_ENABLED,
};

/// How a proposed version string participates in fee negotiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiatedVersion {
    /// Fee metadata carrying the supported fee version
    Fee(Metadata),
    /// Not fee metadata; belongs entirely to the wrapped application
    Passthrough(String),
}

pub fn parse_version(version: &str) -> Result<NegotiatedVersion, FeeError> {
    match Metadata::from_version(version) {
        Err(_) => Ok(NegotiatedVersion::Passthrough(version.to_string())),
        Ok(metadata) if metadata.is_supported() => Ok(NegotiatedVersion::Fee(metadata)),
        Ok(metadata) => Err(FeeError::InvalidVersion {
            expected: FEE_VERSION.to_string(),
            got: metadata.fee_version,
        }),
    }
}

/// Strip fee metadata, leaving the wrapped application's version
pub fn unwrap_app_version(version: &str) -> String {
    match Metadata::from_version(version) {
        Ok(metadata) if metadata.is_supported() => metadata.app_version,
        Ok(metadata) => {
            warn!(fee_version = %metadata.fee_version, "unsupported fee version in channel version");
            version.to_string()
        }
        Err(_) => version.to_string(),
    }
}

/// Delegate the application's share of `version` and re-wrap the answer
fn negotiate<F>(version: &str, delegate: F) -> Result<String, FeeError>
where
    F: FnOnce(&str) -> AppResult<String>,
{
    match parse_version(version)? {
        NegotiatedVersion::Passthrough(version) => Ok(delegate(&version)?),
        NegotiatedVersion::Fee(metadata) => {
            let app_version = delegate(&metadata.app_version)?;
            Ok(Metadata::new(app_version).to_version()?)
        }
    }
}

pub fn is_fee_enabled(storage: &dyn Storage, port_id: &str, channel_id: &str) -> StdResult<bool> {
    Ok(FEE_ENABLED
        .may_load(storage, (port_id, channel_id))?
        .unwrap_or(false))
}

pub fn set_fee_enabled(storage: &mut dyn Storage, port_id: &str, channel_id: &str) -> StdResult<()> {
    FEE_ENABLED.save(storage, (port_id, channel_id), &true)?;
    relay_fee_telemetry::record_fee_enabled(true);
    info!(port_id, channel_id, "fees enabled on channel");
    Ok(())
}

pub fn delete_fee_enabled(
    storage: &mut dyn Storage,
    port_id: &str,
    channel_id: &str,
) -> StdResult<()> {
    if is_fee_enabled(storage, port_id, channel_id)? {
        FEE_ENABLED.remove(storage, (port_id, channel_id));
        relay_fee_telemetry::record_fee_enabled(false);
        info!(port_id, channel_id, "fees disabled on channel");
    }
    Ok(())
}

/// (port, channel) of every fee-enabled channel
pub fn fee_enabled_channels(storage: &dyn Storage) -> StdResult<Vec<(String, String)>> {
    FEE_ENABLED
        .range(storage, None, None, StorageOrder::Ascending)
        .filter_map(|item| match item {
            Ok((key, true)) => Some(Ok(key)),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
        .collect()
}

impl<A: IbcModule> FeeMiddleware<A> {
    pub fn on_chan_open_init(
        &mut self,
        deps: &mut FeeDeps,
        channel: &ChannelOpen,
        version: &str,
    ) -> Result<String, FeeError> {
        let version = if version.trim().is_empty() {
            Metadata::new("").to_version()?
        } else {
            version.to_string()
        };

        let storage = &mut *deps.storage;
        let app = &mut self.app;
        negotiate(&version, |app_version| {
            app.on_chan_open_init(storage, channel, app_version)
        })
    }

    pub fn on_chan_open_try(
        &mut self,
        deps: &mut FeeDeps,
        channel: &ChannelOpen,
        counterparty_version: &str,
    ) -> Result<String, FeeError> {
        let storage = &mut *deps.storage;
        let app = &mut self.app;
        negotiate(counterparty_version, |app_version| {
            app.on_chan_open_try(storage, channel, app_version)
        })
    }

    /// A handshake started with fees must finish with fees, and one started
    /// without them must finish without them.
    pub fn on_chan_open_ack(
        &mut self,
        deps: &mut FeeDeps,
        port_id: &str,
        channel_id: &str,
        counterparty_channel_id: &str,
        counterparty_version: &str,
    ) -> Result<(), FeeError> {
        let local_version = deps.channels.app_version(port_id, channel_id);
        let local_fee = local_version.as_deref().map(is_fee_version);

        match parse_version(counterparty_version)? {
            NegotiatedVersion::Fee(metadata) => {
                if local_fee == Some(false) {
                    return Err(FeeError::InvalidVersion {
                        expected: local_version.unwrap_or_default(),
                        got: counterparty_version.to_string(),
                    });
                }
                self.app.on_chan_open_ack(
                    deps.storage,
                    port_id,
                    channel_id,
                    counterparty_channel_id,
                    &metadata.app_version,
                )?;
                set_fee_enabled(deps.storage, port_id, channel_id)?;
            }
            NegotiatedVersion::Passthrough(version) => {
                if local_fee == Some(true) {
                    return Err(FeeError::InvalidVersion {
                        expected: FEE_VERSION.to_string(),
                        got: version,
                    });
                }
                self.app.on_chan_open_ack(
                    deps.storage,
                    port_id,
                    channel_id,
                    counterparty_channel_id,
                    &version,
                )?;
            }
        }
        Ok(())
    }

    /// Enablement follows the version this chain stored at open-try
    pub fn on_chan_open_confirm(
        &mut self,
        deps: &mut FeeDeps,
        port_id: &str,
        channel_id: &str,
    ) -> Result<(), FeeError> {
        self.app
            .on_chan_open_confirm(deps.storage, port_id, channel_id)?;

        match deps.channels.app_version(port_id, channel_id) {
            Some(version) if is_fee_version(&version) => {
                set_fee_enabled(deps.storage, port_id, channel_id)?;
            }
            Some(_) => {}
            None => debug!(port_id, channel_id, "no stored version at open-confirm"),
        }
        Ok(())
    }

    fn upgradable_app(&mut self) -> Result<&mut dyn UpgradableModule, FeeError> {
        self.app.upgradable().ok_or_else(|| {
            FeeError::UnsupportedAction("wrapped application does not support upgrades".to_string())
        })
    }

    pub fn on_chan_upgrade_init(
        &mut self,
        deps: &mut FeeDeps,
        port_id: &str,
        channel_id: &str,
        order: Order,
        connection_hops: &[String],
        proposed_version: &str,
    ) -> Result<String, FeeError> {
        let storage = &mut *deps.storage;
        let app = self.upgradable_app()?;
        negotiate(proposed_version, |app_version| {
            app.on_chan_upgrade_init(storage, port_id, channel_id, order, connection_hops, app_version)
        })
    }

    pub fn on_chan_upgrade_try(
        &mut self,
        deps: &mut FeeDeps,
        port_id: &str,
        channel_id: &str,
        order: Order,
        connection_hops: &[String],
        counterparty_version: &str,
    ) -> Result<String, FeeError> {
        let storage = &mut *deps.storage;
        let app = self.upgradable_app()?;
        negotiate(counterparty_version, |app_version| {
            app.on_chan_upgrade_try(storage, port_id, channel_id, order, connection_hops, app_version)
        })
    }

    pub fn on_chan_upgrade_ack(
        &mut self,
        deps: &mut FeeDeps,
        port_id: &str,
        channel_id: &str,
        counterparty_version: &str,
    ) -> Result<(), FeeError> {
        let app_version = match parse_version(counterparty_version)? {
            NegotiatedVersion::Fee(metadata) => metadata.app_version,
            NegotiatedVersion::Passthrough(version) => version,
        };

        let app = self.upgradable_app()?;
        app.on_chan_upgrade_ack(deps.storage, port_id, channel_id, &app_version)?;
        Ok(())
    }

    /// The final negotiated version decides whether fees stay, start or stop
    pub fn on_chan_upgrade_open(
        &mut self,
        deps: &mut FeeDeps,
        port_id: &str,
        channel_id: &str,
        order: Order,
        connection_hops: &[String],
        version: &str,
    ) -> Result<(), FeeError> {
        let negotiated = parse_version(version)?;
        let app = self.upgradable_app()?;

        match negotiated {
            NegotiatedVersion::Fee(metadata) => {
                set_fee_enabled(deps.storage, port_id, channel_id)?;
                app.on_chan_upgrade_open(
                    deps.storage,
                    port_id,
                    channel_id,
                    order,
                    connection_hops,
                    &metadata.app_version,
                );
            }
            NegotiatedVersion::Passthrough(version) => {
                delete_fee_enabled(deps.storage, port_id, channel_id)?;
                app.on_chan_upgrade_open(
                    deps.storage,
                    port_id,
                    channel_id,
                    order,
                    connection_hops,
                    &version,
                );
            }
        }
        Ok(())
    }
}
