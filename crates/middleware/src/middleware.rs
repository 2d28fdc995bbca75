//! Packet and channel-close callbacks wrapped around an [`IbcModule`].

use cosmwasm_std::{Addr, Binary, StdResult};
use relay_fee_config::FeeConfig;
use relay_fee_types::{Acknowledgement, IncentivizedAcknowledgement, Packet};
use tracing::{debug, error, warn};

use crate::{
    app::{IbcModule, PacketData},
    distributor,
    error::FeeError,
    keepers::FeeDeps,
    lock,
    negotiator::{delete_fee_enabled, is_fee_enabled, unwrap_app_version},
    registry,
};

/// Relayer incentivization layered on top of an application.
///
/// Handshake and upgrade callbacks live in [`crate::negotiator`]; this file
/// carries the packet lifecycle and channel closure.
pub struct FeeMiddleware<A> {
    pub(crate) app: A,
    pub(crate) config: FeeConfig,
}

impl<A> FeeMiddleware<A> {
    pub fn new(app: A, config: FeeConfig) -> Self {
        Self { app, config }
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    pub fn config(&self) -> &FeeConfig {
        &self.config
    }
}

fn wrap_acknowledgement(
    app_ack: &Acknowledgement,
    forward_relayer: String,
) -> StdResult<Acknowledgement> {
    let incentivized =
        IncentivizedAcknowledgement::new(app_ack.data.clone(), forward_relayer, app_ack.success);
    Ok(Acknowledgement {
        data: incentivized.encode()?,
        success: app_ack.success,
    })
}

impl<A: IbcModule> FeeMiddleware<A> {
    /// Returns `None` when the application will acknowledge later; the
    /// relayer is remembered so [`Self::write_acknowledgement`] can credit it.
    pub fn on_recv_packet(
        &mut self,
        deps: &mut FeeDeps,
        channel_version: &str,
        packet: &Packet,
        relayer: &Addr,
    ) -> Result<Option<Acknowledgement>, FeeError> {
        let span = relay_fee_telemetry::packet_span(
            &packet.destination_port,
            &packet.destination_channel,
            packet.sequence,
        );
        let _enter = span.enter();

        let app_version = unwrap_app_version(channel_version);
        if !is_fee_enabled(
            deps.storage,
            &packet.destination_port,
            &packet.destination_channel,
        )? {
            return Ok(self
                .app
                .on_recv_packet(deps.storage, &app_version, packet, relayer));
        }

        let forward_relayer =
            registry::forward_relayer(deps.storage, relayer.as_str(), &packet.destination_channel)?;

        match self
            .app
            .on_recv_packet(deps.storage, &app_version, packet, relayer)
        {
            Some(app_ack) => Ok(Some(wrap_acknowledgement(&app_ack, forward_relayer)?)),
            None => {
                registry::set_async_relayer(
                    deps.storage,
                    &packet.destination_id(),
                    relayer.as_str(),
                )?;
                debug!(relayer = %relayer, "acknowledgement deferred, relayer stashed");
                Ok(None)
            }
        }
    }

    /// Wrap a deferred acknowledgement before the transport layer commits it
    pub fn write_acknowledgement(
        &mut self,
        deps: &mut FeeDeps,
        packet: &Packet,
        app_ack: &Acknowledgement,
    ) -> Result<Binary, FeeError> {
        if !is_fee_enabled(
            deps.storage,
            &packet.destination_port,
            &packet.destination_channel,
        )? {
            return Ok(app_ack.data.clone());
        }

        let packet_id = packet.destination_id();
        let relayer = registry::async_relayer(deps.storage, &packet_id)?.ok_or_else(|| {
            FeeError::RelayerNotFoundForAsyncAck {
                packet_id: packet_id.to_string(),
            }
        })?;

        let forward_relayer =
            registry::forward_relayer(deps.storage, &relayer, &packet_id.channel_id)?;
        registry::delete_async_relayer(deps.storage, &packet_id);

        Ok(wrap_acknowledgement(app_ack, forward_relayer)?.data)
    }

    /// Fees are settled before the application sees the acknowledgement. An
    /// application error afterwards does not undo the settlement.
    pub fn on_acknowledgement_packet(
        &mut self,
        deps: &mut FeeDeps,
        channel_version: &str,
        packet: &Packet,
        acknowledgement: &[u8],
        relayer: &Addr,
    ) -> Result<(), FeeError> {
        let span = relay_fee_telemetry::packet_span(
            &packet.source_port,
            &packet.source_channel,
            packet.sequence,
        );
        let _enter = span.enter();

        let app_version = unwrap_app_version(channel_version);
        if !is_fee_enabled(deps.storage, &packet.source_port, &packet.source_channel)? {
            self.app.on_acknowledgement_packet(
                deps.storage,
                &app_version,
                packet,
                acknowledgement,
                relayer,
            )?;
            return Ok(());
        }

        let ack = IncentivizedAcknowledgement::decode(acknowledgement)?;

        distributor::distribute_on_acknowledgement(
            deps,
            &self.config.module_account,
            &packet.source_id(),
            &ack,
        )?;

        self.app.on_acknowledgement_packet(
            deps.storage,
            &app_version,
            packet,
            &ack.app_acknowledgement,
            relayer,
        )?;
        Ok(())
    }

    pub fn on_timeout_packet(
        &mut self,
        deps: &mut FeeDeps,
        channel_version: &str,
        packet: &Packet,
        relayer: &Addr,
    ) -> Result<(), FeeError> {
        let span = relay_fee_telemetry::packet_span(
            &packet.source_port,
            &packet.source_channel,
            packet.sequence,
        );
        let _enter = span.enter();

        let app_version = unwrap_app_version(channel_version);
        if is_fee_enabled(deps.storage, &packet.source_port, &packet.source_channel)? {
            distributor::distribute_on_timeout(
                deps,
                &self.config.module_account,
                &packet.source_id(),
                relayer,
            )?;
        }

        self.app
            .on_timeout_packet(deps.storage, &app_version, packet, relayer)?;
        Ok(())
    }

    pub fn on_chan_close_init(
        &mut self,
        deps: &mut FeeDeps,
        port_id: &str,
        channel_id: &str,
    ) -> Result<(), FeeError> {
        self.close_channel(deps, port_id, channel_id)?;
        self.app
            .on_chan_close_init(deps.storage, port_id, channel_id)?;
        Ok(())
    }

    pub fn on_chan_close_confirm(
        &mut self,
        deps: &mut FeeDeps,
        port_id: &str,
        channel_id: &str,
    ) -> Result<(), FeeError> {
        self.close_channel(deps, port_id, channel_id)?;
        self.app
            .on_chan_close_confirm(deps.storage, port_id, channel_id)?;
        Ok(())
    }

    /// Refuses while locked: escrow stranded on a closed channel could never
    /// be settled.
    fn close_channel(
        &mut self,
        deps: &mut FeeDeps,
        port_id: &str,
        channel_id: &str,
    ) -> Result<(), FeeError> {
        if lock::is_locked(deps.storage)? {
            warn!(port_id, channel_id, "channel close rejected, fee module is locked");
            return Err(FeeError::ModuleLocked);
        }

        if is_fee_enabled(deps.storage, port_id, channel_id)? {
            if let Err(err) = distributor::refund_on_channel_closure(
                deps,
                &self.config.module_account,
                port_id,
                channel_id,
            ) {
                error!(port_id, channel_id, error = %err, "refund on channel closure failed");
            }
            delete_fee_enabled(deps.storage, port_id, channel_id)?;
        }
        Ok(())
    }

    /// Application version of the channel with fee metadata stripped
    pub fn get_app_version(
        &self,
        deps: &FeeDeps,
        port_id: &str,
        channel_id: &str,
    ) -> Result<Option<String>, FeeError> {
        let Some(version) = deps.channels.app_version(port_id, channel_id) else {
            return Ok(None);
        };

        if is_fee_enabled(deps.storage, port_id, channel_id)? {
            Ok(Some(unwrap_app_version(&version)))
        } else {
            Ok(Some(version))
        }
    }

    pub fn unmarshal_packet_data(
        &self,
        deps: &FeeDeps,
        port_id: &str,
        channel_id: &str,
        data: &[u8],
    ) -> Result<PacketData, FeeError> {
        let unmarshaler = self.app.packet_data_unmarshaler().ok_or_else(|| {
            FeeError::UnsupportedAction(
                "wrapped application cannot unmarshal packet data".to_string(),
            )
        })?;

        Ok(unmarshaler.unmarshal_packet_data(deps.storage, port_id, channel_id, data)?)
    }
}
