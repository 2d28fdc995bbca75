use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

lazy_static! {
    // ═══════════════════════════════════════════════════════════════════════════
    // SETTLEMENT METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Packets whose escrow was resolved, by outcome
    pub static ref PACKETS_SETTLED: IntCounterVec = register_int_counter_vec!(
        "relay_fee_packets_settled_total",
        "Total packets whose escrowed fees were distributed",
        &["outcome"]
    )
    .unwrap();

    /// Payouts sent to the refund address instead of the relayer
    pub static ref PAYOUTS_REDIRECTED: IntCounterVec = register_int_counter_vec!(
        "relay_fee_payouts_redirected_total",
        "Total relayer payouts redirected to the refund address",
        &["reason"]
    )
    .unwrap();

    /// Fees escrowed through the pay-packet-fee entry points
    pub static ref FEES_ESCROWED: IntCounter = register_int_counter!(
        "relay_fee_fees_escrowed_total",
        "Total packet fees escrowed"
    )
    .unwrap();

    // ═══════════════════════════════════════════════════════════════════════════
    // CHANNEL METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Refunds issued while closing a channel, by result
    pub static ref CLOSURE_REFUNDS: IntCounterVec = register_int_counter_vec!(
        "relay_fee_closure_refunds_total",
        "Total escrow entries processed during channel closure",
        &["result"]
    )
    .unwrap();

    /// Fee enablement transitions
    pub static ref FEE_ENABLEMENT: IntCounterVec = register_int_counter_vec!(
        "relay_fee_channel_enablement_total",
        "Total fee enable/disable transitions on channels",
        &["transition"]
    )
    .unwrap();

    // ═══════════════════════════════════════════════════════════════════════════
    // SAFETY METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Times the module lock has been engaged
    pub static ref MODULE_LOCKS: IntCounter = register_int_counter!(
        "relay_fee_module_locks_total",
        "Total module lock engagements after escrow integrity faults"
    )
    .unwrap();
}
