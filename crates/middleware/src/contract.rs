//! Message entry points for paying fees and registering payees, plus queries.

use cosmwasm_std::{
    to_json_binary, Addr, Binary, Event, MessageInfo, Response, StdError, StdResult, Storage,
};
use relay_fee_config::FeeConfig;
use relay_fee_types::{
    coins::coins_to_string, Fee, IdentifiedPacketFees, PacketFee, PacketFees, PacketId,
};
use tracing::info;

use crate::{
    error::FeeError,
    escrow,
    keepers::{BankError, FeeDeps},
    lock,
    msg::{
        CounterpartyPayeeResponse, ExecuteMsg, FeeEnabledChannel, FeeEnabledChannelResponse,
        FeeEnabledChannelsResponse, FeesResponse, IncentivizedPacketResponse,
        IncentivizedPacketsResponse, ModuleLockedResponse, PayeeResponse, QueryMsg,
    },
    negotiator::{fee_enabled_channels, is_fee_enabled},
    registry,
};

const DEFAULT_LIMIT: u32 = 30;
const MAX_LIMIT: u32 = 100;

pub fn execute(
    deps: &mut FeeDeps,
    config: &FeeConfig,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, FeeError> {
    msg.validate()?;

    match msg {
        ExecuteMsg::RegisterPayee {
            port_id,
            channel_id,
            relayer,
            payee,
        } => execute_register_payee(deps, info, port_id, channel_id, relayer, payee),
        ExecuteMsg::RegisterCounterpartyPayee {
            port_id,
            channel_id,
            relayer,
            counterparty_payee,
        } => execute_register_counterparty_payee(
            deps,
            config,
            info,
            port_id,
            channel_id,
            relayer,
            counterparty_payee,
        ),
        ExecuteMsg::PayPacketFee {
            fee,
            source_port_id,
            source_channel_id,
            relayers: _,
        } => execute_pay_packet_fee(deps, config, info, fee, source_port_id, source_channel_id),
        ExecuteMsg::PayPacketFeeAsync {
            packet_id,
            packet_fee,
        } => execute_pay_packet_fee_async(deps, config, info, packet_id, packet_fee),
    }
}

fn ensure_channel(deps: &FeeDeps, port_id: &str, channel_id: &str) -> Result<(), FeeError> {
    if !deps.channels.has_channel(port_id, channel_id) {
        return Err(FeeError::ChannelNotFound {
            port_id: port_id.to_string(),
            channel_id: channel_id.to_string(),
        });
    }
    Ok(())
}

fn ensure_fee_enabled(deps: &FeeDeps, port_id: &str, channel_id: &str) -> Result<(), FeeError> {
    if !is_fee_enabled(deps.storage, port_id, channel_id)? {
        return Err(FeeError::FeeNotEnabled {
            port_id: port_id.to_string(),
            channel_id: channel_id.to_string(),
        });
    }
    Ok(())
}

/// The message signer must be the relayer it registers for
fn ensure_relayer(deps: &FeeDeps, info: &MessageInfo, relayer: &str) -> Result<Addr, FeeError> {
    let relayer = deps
        .api
        .addr_validate(relayer)
        .map_err(|e| FeeError::invalid_address("relayer", relayer, e))?;
    if relayer != info.sender {
        return Err(FeeError::Unauthorized(format!(
            "{} cannot register on behalf of {relayer}",
            info.sender
        )));
    }
    Ok(relayer)
}

fn execute_register_payee(
    deps: &mut FeeDeps,
    info: MessageInfo,
    port_id: String,
    channel_id: String,
    relayer: String,
    payee: String,
) -> Result<Response, FeeError> {
    ensure_channel(deps, &port_id, &channel_id)?;
    ensure_fee_enabled(deps, &port_id, &channel_id)?;
    let relayer = ensure_relayer(deps, &info, &relayer)?;

    let payee = deps
        .api
        .addr_validate(&payee)
        .map_err(|e| FeeError::invalid_address("payee", &payee, e))?;
    if deps.bank.is_blocked(&payee) {
        return Err(FeeError::Unauthorized(format!(
            "{payee} is not allowed to receive external funds"
        )));
    }

    registry::set_payee(deps.storage, relayer.as_str(), &channel_id, payee.as_str())?;
    info!(relayer = %relayer, payee = %payee, channel_id = %channel_id, "registered payee");

    Ok(Response::new().add_event(
        Event::new("register_payee")
            .add_attribute("relayer", relayer)
            .add_attribute("payee", payee)
            .add_attribute("channel_id", channel_id),
    ))
}

fn execute_register_counterparty_payee(
    deps: &mut FeeDeps,
    config: &FeeConfig,
    info: MessageInfo,
    port_id: String,
    channel_id: String,
    relayer: String,
    counterparty_payee: String,
) -> Result<Response, FeeError> {
    if counterparty_payee.trim().is_empty() {
        return Err(FeeError::CounterpartyPayeeEmpty);
    }
    if counterparty_payee.len() > config.max_counterparty_payee_length {
        return Err(FeeError::CounterpartyPayeeTooLong {
            max: config.max_counterparty_payee_length,
        });
    }

    ensure_channel(deps, &port_id, &channel_id)?;
    ensure_fee_enabled(deps, &port_id, &channel_id)?;
    let relayer = ensure_relayer(deps, &info, &relayer)?;

    registry::set_counterparty_payee(
        deps.storage,
        relayer.as_str(),
        &channel_id,
        &counterparty_payee,
    )?;
    info!(
        relayer = %relayer,
        counterparty_payee = %counterparty_payee,
        channel_id = %channel_id,
        "registered counterparty payee"
    );

    Ok(Response::new().add_event(
        Event::new("register_counterparty_payee")
            .add_attribute("relayer", relayer)
            .add_attribute("counterparty_payee", counterparty_payee)
            .add_attribute("channel_id", channel_id),
    ))
}

/// Checks shared by both payment entry points
fn ensure_can_pay(
    deps: &FeeDeps,
    info: &MessageInfo,
    fee: &Fee,
    port_id: &str,
    channel_id: &str,
) -> Result<(), FeeError> {
    if lock::is_locked(deps.storage)? {
        return Err(FeeError::ModuleLocked);
    }
    ensure_fee_enabled(deps, port_id, channel_id)?;

    let total = fee.total()?;
    if !deps.bank.is_send_enabled(&total) {
        return Err(BankError::SendDisabled(coins_to_string(&total)).into());
    }
    if deps.bank.is_blocked(&info.sender) {
        return Err(FeeError::Unauthorized(format!(
            "{} is not allowed to escrow fees",
            info.sender
        )));
    }
    Ok(())
}

fn execute_pay_packet_fee(
    deps: &mut FeeDeps,
    config: &FeeConfig,
    info: MessageInfo,
    fee: Fee,
    port_id: String,
    channel_id: String,
) -> Result<Response, FeeError> {
    ensure_can_pay(deps, &info, &fee, &port_id, &channel_id)?;

    let sequence = deps
        .channels
        .next_sequence_send(&port_id, &channel_id)
        .ok_or_else(|| FeeError::SequenceSendNotFound {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
        })?;

    let packet_id = PacketId::new(port_id, channel_id, sequence);
    let packet_fee = PacketFee::new(fee, info.sender.as_str());

    escrow_packet_fee(deps, &config.module_account, &packet_id, packet_fee)
        .map(|res| res.add_attribute("action", "pay_packet_fee"))
}

fn execute_pay_packet_fee_async(
    deps: &mut FeeDeps,
    config: &FeeConfig,
    info: MessageInfo,
    packet_id: PacketId,
    packet_fee: PacketFee,
) -> Result<Response, FeeError> {
    if packet_fee.refund_address != info.sender.as_str() {
        return Err(FeeError::Unauthorized(format!(
            "{} cannot pay on behalf of {}",
            info.sender, packet_fee.refund_address
        )));
    }
    ensure_can_pay(
        deps,
        &info,
        &packet_fee.fee,
        &packet_id.port_id,
        &packet_id.channel_id,
    )?;
    ensure_channel(deps, &packet_id.port_id, &packet_id.channel_id)?;

    let next_sequence = deps
        .channels
        .next_sequence_send(&packet_id.port_id, &packet_id.channel_id)
        .ok_or_else(|| FeeError::SequenceSendNotFound {
            port_id: packet_id.port_id.clone(),
            channel_id: packet_id.channel_id.clone(),
        })?;

    if packet_id.sequence >= next_sequence {
        return Err(FeeError::PacketNotFound {
            packet_id: packet_id.to_string(),
        });
    }

    if deps
        .channels
        .packet_commitment(&packet_id.port_id, &packet_id.channel_id, packet_id.sequence)
        .is_none()
    {
        return Err(FeeError::PacketCommitmentNotFound {
            packet_id: packet_id.to_string(),
        });
    }

    escrow_packet_fee(deps, &config.module_account, &packet_id, packet_fee)
        .map(|res| res.add_attribute("action", "pay_packet_fee_async"))
}

/// Move `Fee.total()` from the refund account into the escrow account and
/// append the entry to the packet's record.
pub(crate) fn escrow_packet_fee(
    deps: &mut FeeDeps,
    module: &str,
    packet_id: &PacketId,
    packet_fee: PacketFee,
) -> Result<Response, FeeError> {
    let refund = deps
        .api
        .addr_validate(&packet_fee.refund_address)
        .map_err(|e| FeeError::invalid_address("refund", &packet_fee.refund_address, e))?;
    if !deps.accounts.has_account(&refund) {
        return Err(FeeError::RefundAccountNotFound {
            address: refund.to_string(),
        });
    }

    let total = packet_fee.fee.total()?;
    deps.bank
        .send_coins_from_account_to_module(&refund, module, &total)?;

    let fees = escrow::escrow(deps.storage, packet_id, vec![packet_fee])?;
    relay_fee_telemetry::record_fee_escrowed();
    info!(
        packet_id = %packet_id,
        refund = %refund,
        amount = %coins_to_string(&total),
        entries = fees.packet_fees.len(),
        "fee escrowed"
    );

    Ok(Response::new().add_event(incentivized_packet_event(packet_id, &fees)?))
}

fn incentivized_packet_event(packet_id: &PacketId, fees: &PacketFees) -> StdResult<Event> {
    Ok(Event::new("incentivized_ibc_packet")
        .add_attribute("port_id", &packet_id.port_id)
        .add_attribute("channel_id", &packet_id.channel_id)
        .add_attribute("packet_sequence", packet_id.sequence.to_string())
        .add_attribute("recv_fee", coins_to_string(&fees.total_recv_fees()?))
        .add_attribute("ack_fee", coins_to_string(&fees.total_ack_fees()?))
        .add_attribute("timeout_fee", coins_to_string(&fees.total_timeout_fees()?)))
}

pub fn query(storage: &dyn Storage, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::IncentivizedPacket { packet_id } => {
            to_json_binary(&query_incentivized_packet(storage, packet_id)?)
        }
        QueryMsg::IncentivizedPackets { limit } => {
            to_json_binary(&query_incentivized_packets(storage, limit)?)
        }
        QueryMsg::IncentivizedPacketsForChannel {
            port_id,
            channel_id,
            limit,
        } => to_json_binary(&query_incentivized_packets_for_channel(
            storage, &port_id, &channel_id, limit,
        )?),
        QueryMsg::TotalRecvFees { packet_id } => to_json_binary(&FeesResponse {
            fees: load_fees(storage, &packet_id)?.total_recv_fees()?,
        }),
        QueryMsg::TotalAckFees { packet_id } => to_json_binary(&FeesResponse {
            fees: load_fees(storage, &packet_id)?.total_ack_fees()?,
        }),
        QueryMsg::TotalTimeoutFees { packet_id } => to_json_binary(&FeesResponse {
            fees: load_fees(storage, &packet_id)?.total_timeout_fees()?,
        }),
        QueryMsg::Payee {
            channel_id,
            relayer,
        } => {
            let payee_address = registry::payee(storage, &relayer, &channel_id)?
                .ok_or_else(|| StdError::not_found(format!("payee for {relayer} on {channel_id}")))?;
            to_json_binary(&PayeeResponse { payee_address })
        }
        QueryMsg::CounterpartyPayee {
            channel_id,
            relayer,
        } => {
            let counterparty_payee = registry::counterparty_payee(storage, &relayer, &channel_id)?
                .ok_or_else(|| {
                    StdError::not_found(format!("counterparty payee for {relayer} on {channel_id}"))
                })?;
            to_json_binary(&CounterpartyPayeeResponse { counterparty_payee })
        }
        QueryMsg::FeeEnabledChannels { limit } => {
            to_json_binary(&query_fee_enabled_channels(storage, limit)?)
        }
        QueryMsg::FeeEnabledChannel {
            port_id,
            channel_id,
        } => to_json_binary(&FeeEnabledChannelResponse {
            fee_enabled: is_fee_enabled(storage, &port_id, &channel_id)?,
        }),
        QueryMsg::ModuleLocked {} => to_json_binary(&ModuleLockedResponse {
            locked: lock::is_locked(storage)?,
        }),
    }
}

fn load_fees(storage: &dyn Storage, packet_id: &PacketId) -> StdResult<PacketFees> {
    escrow::get(storage, packet_id)?
        .ok_or_else(|| StdError::not_found(format!("incentivized packet {packet_id}")))
}

fn query_incentivized_packet(
    storage: &dyn Storage,
    packet_id: PacketId,
) -> StdResult<IncentivizedPacketResponse> {
    let fees = load_fees(storage, &packet_id)?;
    Ok(IncentivizedPacketResponse {
        incentivized_packet: IdentifiedPacketFees {
            packet_id,
            packet_fees: fees.packet_fees,
        },
    })
}

fn query_incentivized_packets(
    storage: &dyn Storage,
    limit: Option<u32>,
) -> StdResult<IncentivizedPacketsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let mut incentivized_packets = escrow::all(storage)?;
    incentivized_packets.truncate(limit);
    Ok(IncentivizedPacketsResponse {
        incentivized_packets,
    })
}

fn query_incentivized_packets_for_channel(
    storage: &dyn Storage,
    port_id: &str,
    channel_id: &str,
    limit: Option<u32>,
) -> StdResult<IncentivizedPacketsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let mut incentivized_packets = escrow::for_channel(storage, port_id, channel_id)?;
    incentivized_packets.truncate(limit);
    Ok(IncentivizedPacketsResponse {
        incentivized_packets,
    })
}

fn query_fee_enabled_channels(
    storage: &dyn Storage,
    limit: Option<u32>,
) -> StdResult<FeeEnabledChannelsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let fee_enabled_channels = fee_enabled_channels(storage)?
        .into_iter()
        .take(limit)
        .map(|(port_id, channel_id)| FeeEnabledChannel {
            port_id,
            channel_id,
        })
        .collect();
    Ok(FeeEnabledChannelsResponse {
        fee_enabled_channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockChain;
    use cosmwasm_std::{coin, from_json, testing::message_info};

    fn default_fee() -> Fee {
        Fee::new(
            vec![coin(100, "stake")],
            vec![coin(200, "stake")],
            vec![coin(300, "stake")],
        )
    }

    fn setup() -> (MockChain, FeeConfig, Addr) {
        let mut chain = MockChain::new();
        chain.open_fee_channel("transfer", "channel-0");
        let payer = chain.addr("payer");
        chain.fund(&payer, &[coin(10_000, "stake")]);
        (chain, FeeConfig::default(), payer)
    }

    fn pay(
        chain: &mut MockChain,
        config: &FeeConfig,
        sender: &Addr,
        fee: Fee,
    ) -> Result<Response, FeeError> {
        execute(
            &mut chain.deps(),
            config,
            message_info(sender, &[]),
            ExecuteMsg::PayPacketFee {
                fee,
                source_port_id: "transfer".to_string(),
                source_channel_id: "channel-0".to_string(),
                relayers: vec![],
            },
        )
    }

    // ==================== PAY PACKET FEE ====================

    #[test]
    fn test_pay_packet_fee_escrows_next_sequence() {
        let (mut chain, config, payer) = setup();

        let res = pay(&mut chain, &config, &payer, default_fee()).unwrap();

        let packet_id = PacketId::new("transfer", "channel-0", 1);
        let fees = escrow::get(&chain.storage, &packet_id).unwrap().unwrap();
        assert_eq!(fees.packet_fees[0].refund_address, payer.to_string());
        assert_eq!(chain.balance(&payer, "stake"), 9_400);
        assert_eq!(chain.module_balance("stake"), 600);

        let event = &res.events[0];
        assert_eq!(event.ty, "incentivized_ibc_packet");
        assert!(event
            .attributes
            .iter()
            .any(|a| a.key == "timeout_fee" && a.value == "300stake"));
    }

    #[test]
    fn test_pay_twice_accumulates() {
        let (mut chain, config, payer) = setup();

        pay(&mut chain, &config, &payer, default_fee()).unwrap();
        let res = pay(&mut chain, &config, &payer, default_fee()).unwrap();

        let packet_id = PacketId::new("transfer", "channel-0", 1);
        let fees = escrow::get(&chain.storage, &packet_id).unwrap().unwrap();
        assert_eq!(fees.packet_fees.len(), 2);
        assert!(res.events[0]
            .attributes
            .iter()
            .any(|a| a.key == "recv_fee" && a.value == "200stake"));
        assert!(chain.escrow_invariant_holds());
    }

    #[test]
    fn test_pay_rejected_when_locked() {
        let (mut chain, config, payer) = setup();
        lock::lock(&mut chain.storage).unwrap();

        let err = pay(&mut chain, &config, &payer, default_fee()).unwrap_err();
        assert!(matches!(err, FeeError::ModuleLocked));
        assert_eq!(chain.balance(&payer, "stake"), 10_000);
    }

    #[test]
    fn test_pay_rejected_on_plain_channel() {
        let (mut chain, config, payer) = setup();
        chain.open_channel("transfer", "channel-1", "ics20-1");

        let err = execute(
            &mut chain.deps(),
            &config,
            message_info(&payer, &[]),
            ExecuteMsg::PayPacketFee {
                fee: default_fee(),
                source_port_id: "transfer".to_string(),
                source_channel_id: "channel-1".to_string(),
                relayers: vec![],
            },
        )
        .unwrap_err();
        assert!(matches!(err, FeeError::FeeNotEnabled { .. }));
    }

    #[test]
    fn test_pay_rejected_for_blocked_sender() {
        let (mut chain, config, payer) = setup();
        chain.bank.block(&payer);

        let err = pay(&mut chain, &config, &payer, default_fee()).unwrap_err();
        assert!(matches!(err, FeeError::Unauthorized(_)));
    }

    #[test]
    fn test_pay_rejected_when_send_disabled() {
        let (mut chain, config, payer) = setup();
        chain.bank.disable_send("stake");

        let err = pay(&mut chain, &config, &payer, default_fee()).unwrap_err();
        assert!(matches!(err, FeeError::Bank(BankError::SendDisabled(_))));
    }

    #[test]
    fn test_pay_with_insufficient_balance_fails_cleanly() {
        let (mut chain, config, _payer) = setup();
        let poor = chain.addr("poor");
        chain.fund(&poor, &[coin(10, "stake")]);

        let err = pay(&mut chain, &config, &poor, default_fee()).unwrap_err();
        assert!(matches!(
            err,
            FeeError::Bank(BankError::InsufficientFunds { .. })
        ));
        assert!(!escrow::has(&chain.storage, &PacketId::new("transfer", "channel-0", 1)));
    }

    #[test]
    fn test_pay_requires_existing_refund_account() {
        let (mut chain, config, _payer) = setup();
        let stranger = chain.addr("stranger");

        let err = pay(&mut chain, &config, &stranger, default_fee()).unwrap_err();
        assert!(matches!(err, FeeError::RefundAccountNotFound { .. }));
    }

    // ==================== PAY PACKET FEE ASYNC ====================

    fn pay_async(
        chain: &mut MockChain,
        config: &FeeConfig,
        sender: &Addr,
        sequence: u64,
    ) -> Result<Response, FeeError> {
        execute(
            &mut chain.deps(),
            config,
            message_info(sender, &[]),
            ExecuteMsg::PayPacketFeeAsync {
                packet_id: PacketId::new("transfer", "channel-0", sequence),
                packet_fee: PacketFee::new(default_fee(), sender.as_str()),
            },
        )
    }

    #[test]
    fn test_pay_async_for_sent_packet() {
        let (mut chain, config, payer) = setup();
        let packet = chain.send_packet("transfer", "channel-0");

        pay_async(&mut chain, &config, &payer, packet.sequence).unwrap();
        assert!(escrow::has(&chain.storage, &packet.source_id()));
    }

    #[test]
    fn test_pay_async_rejects_unsent_packet() {
        let (mut chain, config, payer) = setup();

        let err = pay_async(&mut chain, &config, &payer, 1).unwrap_err();
        assert!(matches!(err, FeeError::PacketNotFound { .. }));
    }

    #[test]
    fn test_pay_async_rejects_resolved_packet() {
        let (mut chain, config, payer) = setup();
        let packet = chain.send_packet("transfer", "channel-0");
        chain
            .channels
            .delete_commitment("transfer", "channel-0", packet.sequence);

        let err = pay_async(&mut chain, &config, &payer, packet.sequence).unwrap_err();
        assert!(matches!(err, FeeError::PacketCommitmentNotFound { .. }));
    }

    #[test]
    fn test_pay_async_requires_refund_signer() {
        let (mut chain, config, payer) = setup();
        let packet = chain.send_packet("transfer", "channel-0");
        let other = chain.addr("other");

        let err = execute(
            &mut chain.deps(),
            &config,
            message_info(&other, &[]),
            ExecuteMsg::PayPacketFeeAsync {
                packet_id: packet.source_id(),
                packet_fee: PacketFee::new(default_fee(), payer.as_str()),
            },
        )
        .unwrap_err();
        assert!(matches!(err, FeeError::Unauthorized(_)));
    }

    // ==================== REGISTRATION ====================

    #[test]
    fn test_register_payee() {
        let (mut chain, config, _payer) = setup();
        let relayer = chain.addr("relayer");
        let payee = chain.addr("payee");

        execute(
            &mut chain.deps(),
            &config,
            message_info(&relayer, &[]),
            ExecuteMsg::RegisterPayee {
                port_id: "transfer".to_string(),
                channel_id: "channel-0".to_string(),
                relayer: relayer.to_string(),
                payee: payee.to_string(),
            },
        )
        .unwrap();

        let bin = query(
            &chain.storage,
            QueryMsg::Payee {
                channel_id: "channel-0".to_string(),
                relayer: relayer.to_string(),
            },
        )
        .unwrap();
        let res: PayeeResponse = from_json(bin).unwrap();
        assert_eq!(res.payee_address, payee.to_string());
    }

    #[test]
    fn test_register_payee_for_someone_else_fails() {
        let (mut chain, config, _payer) = setup();
        let relayer = chain.addr("relayer");
        let mallory = chain.addr("mallory");

        let err = execute(
            &mut chain.deps(),
            &config,
            message_info(&mallory, &[]),
            ExecuteMsg::RegisterPayee {
                port_id: "transfer".to_string(),
                channel_id: "channel-0".to_string(),
                relayer: relayer.to_string(),
                payee: mallory.to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, FeeError::Unauthorized(_)));
    }

    #[test]
    fn test_register_blocked_payee_fails() {
        let (mut chain, config, _payer) = setup();
        let relayer = chain.addr("relayer");
        let module = chain.module_address();

        let err = execute(
            &mut chain.deps(),
            &config,
            message_info(&relayer, &[]),
            ExecuteMsg::RegisterPayee {
                port_id: "transfer".to_string(),
                channel_id: "channel-0".to_string(),
                relayer: relayer.to_string(),
                payee: module.to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, FeeError::Unauthorized(_)));
    }

    #[test]
    fn test_register_on_missing_channel_fails() {
        let (mut chain, config, _payer) = setup();
        let relayer = chain.addr("relayer");

        let err = execute(
            &mut chain.deps(),
            &config,
            message_info(&relayer, &[]),
            ExecuteMsg::RegisterCounterpartyPayee {
                port_id: "transfer".to_string(),
                channel_id: "channel-9".to_string(),
                relayer: relayer.to_string(),
                counterparty_payee: "cosmos1payee".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, FeeError::ChannelNotFound { .. }));
    }

    #[test]
    fn test_counterparty_payee_length_limits() {
        let (mut chain, config, _payer) = setup();
        let relayer = chain.addr("relayer");
        let register = |chain: &mut MockChain, counterparty_payee: String| {
            execute(
                &mut chain.deps(),
                &config,
                message_info(&relayer, &[]),
                ExecuteMsg::RegisterCounterpartyPayee {
                    port_id: "transfer".to_string(),
                    channel_id: "channel-0".to_string(),
                    relayer: relayer.to_string(),
                    counterparty_payee,
                },
            )
        };

        assert!(matches!(
            register(&mut chain, "  ".to_string()),
            Err(FeeError::CounterpartyPayeeEmpty)
        ));
        assert!(matches!(
            register(&mut chain, "a".repeat(config.max_counterparty_payee_length + 1)),
            Err(FeeError::CounterpartyPayeeTooLong { .. })
        ));
        register(&mut chain, "a".repeat(config.max_counterparty_payee_length)).unwrap();
    }

    // ==================== QUERIES ====================

    #[test]
    fn test_fee_queries() {
        let (mut chain, config, payer) = setup();
        pay(&mut chain, &config, &payer, default_fee()).unwrap();
        let packet_id = PacketId::new("transfer", "channel-0", 1);

        let res: FeesResponse = from_json(
            query(
                &chain.storage,
                QueryMsg::TotalTimeoutFees {
                    packet_id: packet_id.clone(),
                },
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(res.fees, vec![coin(300, "stake")]);

        let res: IncentivizedPacketsResponse = from_json(
            query(
                &chain.storage,
                QueryMsg::IncentivizedPacketsForChannel {
                    port_id: "transfer".to_string(),
                    channel_id: "channel-0".to_string(),
                    limit: None,
                },
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(res.incentivized_packets.len(), 1);
        assert_eq!(res.incentivized_packets[0].packet_id, packet_id);

        let res: FeeEnabledChannelsResponse =
            from_json(query(&chain.storage, QueryMsg::FeeEnabledChannels { limit: None }).unwrap())
                .unwrap();
        assert_eq!(res.fee_enabled_channels.len(), 1);

        let res: ModuleLockedResponse =
            from_json(query(&chain.storage, QueryMsg::ModuleLocked {}).unwrap()).unwrap();
        assert!(!res.locked);
    }

    #[test]
    fn test_query_missing_packet_is_not_found() {
        let chain = MockChain::new();
        let err = query(
            &chain.storage,
            QueryMsg::IncentivizedPacket {
                packet_id: PacketId::new("transfer", "channel-0", 7),
            },
        )
        .unwrap_err();
        assert!(matches!(err, StdError::NotFound { .. }));
    }
}
