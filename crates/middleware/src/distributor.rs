//! Payout and refund of escrowed packet fees.
//!
//! Every settlement is planned in full before any funds move: addresses are
//! validated and the escrow account balance is checked against the record.
//! Malformed addresses abort with an error and leave the record alone. A
//! balance shortfall engages the module lock and reports success so the
//! packet lifecycle keeps moving. Policy rejections of a payout are
//! redirected to the payer's refund address.

use cosmwasm_std::{Addr, Coin, StdResult};
use relay_fee_telemetry::SettlementOutcome;
use relay_fee_types::{
    coins::{coins_to_string, sub_coins, sum_coins},
    Fee, IncentivizedAcknowledgement, PacketFee, PacketFees, PacketId,
};
use tracing::{error, info, warn};

use crate::{
    error::FeeError,
    escrow,
    keepers::{BankError, FeeDeps},
    lock, registry,
};

/// One module-to-account movement
#[derive(Debug, Clone)]
struct Transfer {
    recipient: Addr,
    coins: Vec<Coin>,
    /// Where the coins go if `recipient` is refused by policy
    fallback: Option<Addr>,
}

enum Executed {
    Completed,
    Locked,
}

/// Resolve the payout address credited for delivering a packet.
///
/// `None` means nobody can be paid and the share goes back to the payer.
fn resolve_forward_payee(
    deps: &FeeDeps,
    channel_id: &str,
    forward_relayer: &str,
) -> Result<Option<Addr>, FeeError> {
    if forward_relayer.is_empty() {
        return Ok(None);
    }

    let local = registry::counterparty_payee(deps.storage, forward_relayer, channel_id)?
        .unwrap_or_else(|| forward_relayer.to_string());
    if local.is_empty() {
        return Ok(None);
    }

    resolve_payee(deps, channel_id, &local).map(Some)
}

/// Apply a registered payee for `relayer` on `channel_id`, then validate
fn resolve_payee(deps: &FeeDeps, channel_id: &str, relayer: &str) -> Result<Addr, FeeError> {
    let payee = registry::payee(deps.storage, relayer, channel_id)?
        .unwrap_or_else(|| relayer.to_string());

    deps.api
        .addr_validate(&payee)
        .map_err(|e| FeeError::invalid_address("payee", &payee, e))
}

fn validate_refund(deps: &FeeDeps, refund_address: &str) -> Result<Addr, FeeError> {
    deps.api
        .addr_validate(refund_address)
        .map_err(|e| FeeError::invalid_address("refund", refund_address, e))
}

/// Build the transfers that settle `fees`, paying `payout` of each entry to
/// `payee` and the rest back to its refund address.
fn plan<F>(
    deps: &FeeDeps,
    fees: &PacketFees,
    payee: Option<&Addr>,
    payout: F,
) -> Result<Vec<Transfer>, FeeError>
where
    F: Fn(&Fee) -> StdResult<Vec<Coin>>,
{
    let mut transfers = Vec::with_capacity(fees.packet_fees.len() * 2);

    for packet_fee in &fees.packet_fees {
        let refund = validate_refund(deps, &packet_fee.refund_address)?;
        let paid = payout(&packet_fee.fee)?;
        let refunded = sub_coins(&packet_fee.fee.total()?, &paid)?;

        match payee {
            Some(payee) => transfers.push(Transfer {
                recipient: payee.clone(),
                coins: paid,
                fallback: Some(refund.clone()),
            }),
            None => {
                if !paid.is_empty() {
                    relay_fee_telemetry::record_payout_redirected("no_payee");
                    warn!(refund = %refund, "no payout address, returning relayer fee to payer");
                }
                transfers.push(Transfer {
                    recipient: refund.clone(),
                    coins: paid,
                    fallback: None,
                });
            }
        }

        transfers.push(Transfer {
            recipient: refund,
            coins: refunded,
            fallback: None,
        });
    }

    Ok(transfers)
}

/// Escrow account must cover every entry of the record
fn escrow_covers(deps: &FeeDeps, module: &str, fees: &PacketFees) -> Result<bool, FeeError> {
    let required = fees.total()?;
    let escrow_account = deps.accounts.module_address(module);
    Ok(deps.bank.has_balance(&escrow_account, &required))
}

fn send(deps: &mut FeeDeps, module: &str, recipient: &Addr, coins: &[Coin]) -> Result<(), BankError> {
    if coins.is_empty() {
        return Ok(());
    }
    deps.bank
        .send_coins_from_module_to_account(module, recipient, coins)
}

fn redirect_reason(err: &BankError) -> &'static str {
    match err {
        BankError::SendDisabled(_) => "send_disabled",
        _ => "blocked",
    }
}

fn execute(
    deps: &mut FeeDeps,
    module: &str,
    packet_id: &PacketId,
    transfers: &[Transfer],
) -> Result<Executed, FeeError> {
    for transfer in transfers {
        let err = match send(deps, module, &transfer.recipient, &transfer.coins) {
            Ok(()) => continue,
            Err(err) => err,
        };

        match (&err, &transfer.fallback) {
            (BankError::InsufficientFunds { .. }, _) => {
                error!(packet_id = %packet_id, error = %err, "escrow account short during distribution");
                lock::lock(deps.storage)?;
                return Ok(Executed::Locked);
            }
            (err, Some(fallback)) if err.is_policy() => {
                relay_fee_telemetry::record_payout_redirected(redirect_reason(err));
                warn!(
                    packet_id = %packet_id,
                    recipient = %transfer.recipient,
                    refund = %fallback,
                    error = %err,
                    "payout refused, redirecting to refund address"
                );
                match send(deps, module, fallback, &transfer.coins) {
                    Ok(()) => {}
                    Err(BankError::InsufficientFunds { .. }) => {
                        lock::lock(deps.storage)?;
                        return Ok(Executed::Locked);
                    }
                    Err(refund_err) => {
                        error!(
                            packet_id = %packet_id,
                            refund = %fallback,
                            amount = %coins_to_string(&transfer.coins),
                            error = %refund_err,
                            "refund refused, fee stays in escrow account"
                        );
                    }
                }
            }
            (err, None) if err.is_policy() => {
                error!(
                    packet_id = %packet_id,
                    refund = %transfer.recipient,
                    amount = %coins_to_string(&transfer.coins),
                    error = %err,
                    "refund refused, fee stays in escrow account"
                );
            }
            _ => return Err(err.clone().into()),
        }
    }
    Ok(Executed::Completed)
}

/// Settle a packet whose acknowledgement came back.
///
/// Recv and ack fees go to the forward relayer's payout address and the
/// timeout fee is refunded, whatever the application outcome was.
pub fn distribute_on_acknowledgement(
    deps: &mut FeeDeps,
    module: &str,
    packet_id: &PacketId,
    ack: &IncentivizedAcknowledgement,
) -> Result<(), FeeError> {
    let Some(fees) = escrow::get(deps.storage, packet_id)? else {
        return Ok(());
    };
    if lock::is_locked(deps.storage)? {
        return Ok(());
    }

    let payee = resolve_forward_payee(deps, &packet_id.channel_id, &ack.forward_relayer_address)?;
    let transfers = plan(deps, &fees, payee.as_ref(), |fee| fee.recv_and_ack())?;

    settle(
        deps,
        module,
        packet_id,
        &fees,
        &transfers,
        SettlementOutcome::Acknowledged,
    )
}

/// Settle a packet that timed out: the timeout fee goes to the relayer (or
/// its registered payee), recv and ack fees are refunded.
pub fn distribute_on_timeout(
    deps: &mut FeeDeps,
    module: &str,
    packet_id: &PacketId,
    relayer: &Addr,
) -> Result<(), FeeError> {
    let Some(fees) = escrow::get(deps.storage, packet_id)? else {
        return Ok(());
    };
    if lock::is_locked(deps.storage)? {
        return Ok(());
    }

    let payee = resolve_payee(deps, &packet_id.channel_id, relayer.as_str())?;
    let transfers = plan(deps, &fees, Some(&payee), |fee| {
        sum_coins([fee.timeout_fee.as_slice()])
    })?;

    settle(
        deps,
        module,
        packet_id,
        &fees,
        &transfers,
        SettlementOutcome::TimedOut,
    )
}

fn settle(
    deps: &mut FeeDeps,
    module: &str,
    packet_id: &PacketId,
    fees: &PacketFees,
    transfers: &[Transfer],
    outcome: SettlementOutcome,
) -> Result<(), FeeError> {
    if !escrow_covers(deps, module, fees)? {
        error!(
            packet_id = %packet_id,
            required = %coins_to_string(&fees.total()?),
            "escrow account cannot cover recorded fees"
        );
        lock::lock(deps.storage)?;
        return Ok(());
    }

    match execute(deps, module, packet_id, transfers)? {
        Executed::Locked => Ok(()),
        Executed::Completed => {
            escrow::delete(deps.storage, packet_id);
            relay_fee_telemetry::record_packet_settled(outcome);
            info!(
                packet_id = %packet_id,
                outcome = ?outcome,
                entries = fees.packet_fees.len(),
                "packet fees distributed"
            );
            Ok(())
        }
    }
}

/// Return every escrowed fee on a closing channel to its payer.
///
/// An entry that cannot be refunded stays in escrow and does not stop the
/// others. Never touches the module lock.
pub fn refund_on_channel_closure(
    deps: &mut FeeDeps,
    module: &str,
    port_id: &str,
    channel_id: &str,
) -> Result<(), FeeError> {
    let escrow_account = deps.accounts.module_address(module);

    for identified in escrow::for_channel(deps.storage, port_id, channel_id)? {
        let packet_id = identified.packet_id;
        let mut unrefunded = Vec::new();

        for packet_fee in identified.packet_fees {
            let refunded = match refund_entry(deps, module, &escrow_account, &packet_fee) {
                Ok(()) => true,
                Err(err) => {
                    warn!(
                        packet_id = %packet_id,
                        refund = %packet_fee.refund_address,
                        error = %err,
                        "closure refund skipped, fee kept in escrow"
                    );
                    false
                }
            };
            relay_fee_telemetry::record_closure_refund(refunded);
            if !refunded {
                unrefunded.push(packet_fee);
            }
        }

        escrow::set(deps.storage, &packet_id, &PacketFees::new(unrefunded))?;
    }

    info!(port_id, channel_id, "escrowed fees refunded on channel closure");
    Ok(())
}

fn refund_entry(
    deps: &mut FeeDeps,
    module: &str,
    escrow_account: &Addr,
    packet_fee: &PacketFee,
) -> Result<(), FeeError> {
    let refund = validate_refund(deps, &packet_fee.refund_address)?;
    let total = packet_fee.fee.total()?;

    if !deps.bank.has_balance(escrow_account, &total) {
        return Err(BankError::InsufficientFunds {
            address: escrow_account.to_string(),
            required: coins_to_string(&total),
        }
        .into());
    }

    send(deps, module, &refund, &total)?;
    Ok(())
}
