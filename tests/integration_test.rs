use cosmwasm_std::{coin, testing::message_info, Addr};
use relay_fee::{
    config::{FeeConfig, MiddlewareConfig},
    middleware::{
        contract::{execute, query},
        escrow, lock,
        msg::{ExecuteMsg, ModuleLockedResponse, QueryMsg},
        negotiator::is_fee_enabled,
        testing::{MockApp, MockChain, COUNTERPARTY_CHANNEL, MOCK_ACK, MOCK_VERSION},
        ChannelOpen,
    },
    types::{
        Counterparty, Fee, IncentivizedAcknowledgement, Metadata, Order, PacketFee, PacketId,
    },
    FeeError, FeeMiddleware,
};

const PORT: &str = "transfer";
const CHANNEL: &str = "channel-0";

fn scenario_fee() -> Fee {
    Fee::new(
        vec![coin(100, "stake")],
        vec![coin(200, "stake")],
        vec![coin(300, "stake")],
    )
}

fn fee_version() -> String {
    Metadata::new(MOCK_VERSION).to_version().unwrap()
}

fn middleware() -> FeeMiddleware<MockApp> {
    relay_fee::wrap(MockApp::new(), &MiddlewareConfig::default())
}

/// Fee channel with a funded payer and one sent packet carrying
/// `scenario_fee`
struct Sender {
    chain: MockChain,
    mw: FeeMiddleware<MockApp>,
    payer: Addr,
    packet_id: PacketId,
}

fn sender() -> Sender {
    let mut chain = MockChain::new();
    chain.open_fee_channel(PORT, CHANNEL);
    let payer = chain.addr("payer");
    chain.fund(&payer, &[coin(10_000, "stake")]);

    execute(
        &mut chain.deps(),
        &FeeConfig::default(),
        message_info(&payer, &[]),
        ExecuteMsg::PayPacketFee {
            fee: scenario_fee(),
            source_port_id: PORT.to_string(),
            source_channel_id: CHANNEL.to_string(),
            relayers: vec![],
        },
    )
    .unwrap();
    let packet = chain.send_packet(PORT, CHANNEL);

    Sender {
        chain,
        mw: middleware(),
        payer,
        packet_id: packet.source_id(),
    }
}

fn acknowledge(s: &mut Sender, forward_relayer: &Addr) -> Result<(), FeeError> {
    let packet = outgoing_packet(&s.packet_id);
    let ack = IncentivizedAcknowledgement::new(MOCK_ACK.to_vec(), forward_relayer.as_str(), true);
    let submitter = s.chain.addr("submitter");
    s.mw.on_acknowledgement_packet(
        &mut s.chain.deps(),
        &fee_version(),
        &packet,
        &ack.encode().unwrap(),
        &submitter,
    )
}

fn outgoing_packet(packet_id: &PacketId) -> relay_fee::types::Packet {
    relay_fee::types::Packet {
        sequence: packet_id.sequence,
        source_port: packet_id.port_id.clone(),
        source_channel: packet_id.channel_id.clone(),
        destination_port: PORT.to_string(),
        destination_channel: COUNTERPARTY_CHANNEL.to_string(),
        data: br#"{"amount":"100","denom":"stake"}"#.to_vec().into(),
        timeout_timestamp: 0,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SCENARIO TESTS
// ═══════════════════════════════════════════════════════════════════════════

/// Handshake proposing fee metadata keeps the wrapped version and only
/// enables fees once the handshake completes
#[test]
fn test_scenario_a_handshake_enables_on_completion() {
    let proposed = r#"{"fee_version":"ics29-1","app_version":"mock-1"}"#;
    let mut app = MockApp::new();
    app.version = "mock-1".to_string();
    let mut mw = FeeMiddleware::new(app, FeeConfig::default());
    let mut chain = MockChain::new();
    let channel = ChannelOpen {
        order: Order::Unordered,
        connection_hops: vec!["connection-0".to_string()],
        port_id: PORT.to_string(),
        channel_id: CHANNEL.to_string(),
        counterparty: Counterparty::new(PORT, ""),
    };

    let version = mw
        .on_chan_open_init(&mut chain.deps(), &channel, proposed)
        .unwrap();
    assert_eq!(version, proposed);
    assert!(!is_fee_enabled(&chain.storage, PORT, CHANNEL).unwrap());

    let version = mw
        .on_chan_open_try(&mut chain.deps(), &channel, proposed)
        .unwrap();
    assert_eq!(version, proposed);
    assert!(!is_fee_enabled(&chain.storage, PORT, CHANNEL).unwrap());

    chain.open_channel(PORT, CHANNEL, proposed);
    mw.on_chan_open_ack(&mut chain.deps(), PORT, CHANNEL, COUNTERPARTY_CHANNEL, proposed)
        .unwrap();
    assert!(is_fee_enabled(&chain.storage, PORT, CHANNEL).unwrap());
}

/// Recv and ack fees go to the relayer, the timeout fee back to the payer
#[test]
fn test_scenario_b_ack_pays_relayer() {
    let mut s = sender();
    let relayer = s.chain.addr("relayer");

    acknowledge(&mut s, &relayer).unwrap();

    assert_eq!(s.chain.balance(&relayer, "stake"), 300);
    assert_eq!(s.chain.balance(&s.payer, "stake"), 10_000 - 600 + 300);
    assert!(!escrow::has(&s.chain.storage, &s.packet_id));
}

/// A policy-blocked relayer's share goes to the refund address without error
#[test]
fn test_scenario_c_blocked_relayer_redirected() {
    let mut s = sender();
    let relayer = s.chain.addr("relayer");
    s.chain.bank.block(&relayer);

    acknowledge(&mut s, &relayer).unwrap();

    assert_eq!(s.chain.balance(&relayer, "stake"), 0);
    assert_eq!(s.chain.balance(&s.payer, "stake"), 10_000);
    assert!(!escrow::has(&s.chain.storage, &s.packet_id));
}

/// A short escrow account locks the module but the acknowledgement succeeds
#[test]
fn test_scenario_d_short_escrow_locks_silently() {
    let mut s = sender();
    let relayer = s.chain.addr("relayer");
    let module = s.chain.module_address();
    s.chain.bank.burn(&module, &[coin(1, "stake")]);

    acknowledge(&mut s, &relayer).unwrap();

    assert!(escrow::has(&s.chain.storage, &s.packet_id));
    assert!(lock::is_locked(&s.chain.storage).unwrap());
    assert!(s.mw.app().called("on_acknowledgement_packet"));

    let locked: ModuleLockedResponse =
        cosmwasm_std::from_json(query(&s.chain.storage, QueryMsg::ModuleLocked {}).unwrap())
            .unwrap();
    assert!(locked.locked);
}

/// Closing a fee channel while locked fails and leaves escrow untouched
#[test]
fn test_scenario_e_close_while_locked() {
    let mut s = sender();
    lock::lock(&mut s.chain.storage).unwrap();

    let err = s
        .mw
        .on_chan_close_init(&mut s.chain.deps(), PORT, CHANNEL)
        .unwrap_err();

    assert!(matches!(err, FeeError::ModuleLocked));
    assert!(escrow::has(&s.chain.storage, &s.packet_id));
    assert_eq!(s.chain.module_balance("stake"), 600);
}

// ═══════════════════════════════════════════════════════════════════════════
// PROPERTY TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_resolution_is_idempotent() {
    let mut s = sender();
    let relayer = s.chain.addr("relayer");
    acknowledge(&mut s, &relayer).unwrap();
    let payer_after = s.chain.balance(&s.payer, "stake");

    acknowledge(&mut s, &relayer).unwrap();
    let packet = outgoing_packet(&s.packet_id);
    s.mw.on_timeout_packet(&mut s.chain.deps(), &fee_version(), &packet, &relayer)
        .unwrap();

    assert_eq!(s.chain.balance(&relayer, "stake"), 300);
    assert_eq!(s.chain.balance(&s.payer, "stake"), payer_after);
}

#[test]
fn test_escrow_matches_module_balance_through_lifecycle() {
    let mut s = sender();
    assert!(s.chain.escrow_invariant_holds());

    let second_payer = s.chain.addr("second-payer");
    s.chain.fund(&second_payer, &[coin(1_000, "stake")]);
    s.chain
        .escrow_fee(&s.packet_id, PacketFee::new(scenario_fee(), second_payer.as_str()))
        .unwrap();
    assert!(s.chain.escrow_invariant_holds());

    let relayer = s.chain.addr("relayer");
    acknowledge(&mut s, &relayer).unwrap();
    assert!(s.chain.escrow_invariant_holds());
    assert_eq!(s.chain.module_balance("stake"), 0);
}

#[test]
fn test_wire_round_trips_and_rejects_extra_fields() {
    let metadata = Metadata::new("ics20-1");
    assert_eq!(Metadata::from_version(&metadata.to_version().unwrap()).unwrap(), metadata);
    assert!(Metadata::from_version(
        r#"{"fee_version":"ics29-1","app_version":"ics20-1","extra":"x"}"#
    )
    .is_err());

    let ack = IncentivizedAcknowledgement::new(b"ok".to_vec(), "cosmos1relayer", false);
    assert_eq!(IncentivizedAcknowledgement::decode(&ack.encode().unwrap()).unwrap(), ack);
    assert!(IncentivizedAcknowledgement::decode(
        br#"{"app_acknowledgement":"b2s=","forward_relayer_address":"","underlying_app_success":true,"extra":1}"#
    )
    .is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// CROSS-CHAIN LIFECYCLE
// ═══════════════════════════════════════════════════════════════════════════

/// The receiving chain credits the relayer's counterparty payee, and the
/// sending chain pays that address when the acknowledgement returns
#[test]
fn test_counterparty_payee_flows_across_chains() {
    let mut s = sender();
    let payout = s.chain.addr("relayer-payout");

    let mut chain_b = MockChain::new();
    chain_b.open_fee_channel(PORT, COUNTERPARTY_CHANNEL);
    let relayer_b = chain_b.addr("relayer");
    execute(
        &mut chain_b.deps(),
        &FeeConfig::default(),
        message_info(&relayer_b, &[]),
        ExecuteMsg::RegisterCounterpartyPayee {
            port_id: PORT.to_string(),
            channel_id: COUNTERPARTY_CHANNEL.to_string(),
            relayer: relayer_b.to_string(),
            counterparty_payee: payout.to_string(),
        },
    )
    .unwrap();
    let mut mw_b = middleware();

    let packet = outgoing_packet(&s.packet_id);
    let ack = mw_b
        .on_recv_packet(&mut chain_b.deps(), &fee_version(), &packet, &relayer_b)
        .unwrap()
        .unwrap();

    let submitter = s.chain.addr("submitter");
    s.mw.on_acknowledgement_packet(
        &mut s.chain.deps(),
        &fee_version(),
        &packet,
        &ack.data,
        &submitter,
    )
    .unwrap();

    assert_eq!(s.chain.balance(&payout, "stake"), 300);
    assert_eq!(s.chain.balance(&submitter, "stake"), 0);
    assert_eq!(s.mw.app().acks[0].as_slice(), MOCK_ACK);
}

#[test]
fn test_init_rejects_invalid_config() {
    let mut config = MiddlewareConfig::default();
    config.fee.module_account = String::new();

    assert!(matches!(
        relay_fee::init(&config),
        Err(relay_fee::InitError::Config(_))
    ));
}
