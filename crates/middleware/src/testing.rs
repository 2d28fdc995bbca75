//! In-memory collaborators and a scripted application for exercising the
//! middleware without a host chain.

use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::{anyhow, bail};
use cosmwasm_std::{
    testing::{mock_dependencies, MockApi, MockStorage},
    Addr, Binary, Coin, OwnedDeps, Storage, Uint128,
};
use relay_fee_types::{
    coins::{coins_to_string, sum_coins},
    Acknowledgement, ChannelEnd, ChannelState, Counterparty, Metadata, Order, Packet, PacketFee,
    PacketFees, PacketId, MODULE_NAME,
};

use crate::{
    app::{AppResult, ChannelOpen, IbcModule, PacketData, PacketDataUnmarshaler, UpgradableModule},
    contract::escrow_packet_fee,
    error::FeeError,
    escrow,
    keepers::{AccountKeeper, BankError, BankKeeper, ChannelKeeper, FeeDeps},
    negotiator::set_fee_enabled,
};

pub const MOCK_VERSION: &str = "mock-version";
pub const MOCK_ACK: &[u8] = b"mock acknowledgement";
pub const COUNTERPARTY_CHANNEL: &str = "channel-cp";

/// Balances, blocked recipients and per-denom send switches
#[derive(Debug, Default)]
pub struct MockBank {
    balances: HashMap<Addr, BTreeMap<String, Uint128>>,
    blocked: HashSet<Addr>,
    send_disabled: HashSet<String>,
    modules: HashMap<String, Addr>,
}

impl MockBank {
    pub fn register_module(&mut self, name: &str, addr: Addr) {
        self.modules.insert(name.to_string(), addr);
    }

    pub fn mint(&mut self, addr: &Addr, coins: &[Coin]) {
        let balance = self.balances.entry(addr.clone()).or_default();
        for coin in coins {
            let held = balance.entry(coin.denom.clone()).or_default();
            *held += coin.amount;
        }
    }

    /// Removes up to `coins` from `addr`, saturating at zero
    pub fn burn(&mut self, addr: &Addr, coins: &[Coin]) {
        if let Some(balance) = self.balances.get_mut(addr) {
            for coin in coins {
                if let Some(held) = balance.get_mut(&coin.denom) {
                    *held = held.saturating_sub(coin.amount);
                }
            }
        }
    }

    pub fn balance(&self, addr: &Addr, denom: &str) -> u128 {
        self.balances
            .get(addr)
            .and_then(|balance| balance.get(denom))
            .map(|amount| amount.u128())
            .unwrap_or_default()
    }

    /// Non-zero holdings of `addr`, sorted by denom
    pub fn all_balances(&self, addr: &Addr) -> Vec<Coin> {
        self.balances
            .get(addr)
            .map(|balance| {
                balance
                    .iter()
                    .filter(|(_, amount)| !amount.is_zero())
                    .map(|(denom, amount)| Coin::new(*amount, denom))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn block(&mut self, addr: &Addr) {
        self.blocked.insert(addr.clone());
    }

    pub fn disable_send(&mut self, denom: &str) {
        self.send_disabled.insert(denom.to_string());
    }

    fn module(&self, name: &str) -> Result<Addr, BankError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| BankError::UnknownAccount(name.to_string()))
    }

    fn check_send_enabled(&self, coins: &[Coin]) -> Result<(), BankError> {
        match coins
            .iter()
            .find(|coin| self.send_disabled.contains(&coin.denom))
        {
            Some(coin) => Err(BankError::SendDisabled(coin.denom.clone())),
            None => Ok(()),
        }
    }

    fn transfer(&mut self, from: &Addr, to: &Addr, coins: &[Coin]) -> Result<(), BankError> {
        if !self.has_balance(from, coins) {
            return Err(BankError::InsufficientFunds {
                address: from.to_string(),
                required: coins_to_string(coins),
            });
        }
        self.burn(from, coins);
        self.mint(to, coins);
        Ok(())
    }
}

impl BankKeeper for MockBank {
    fn has_balance(&self, addr: &Addr, coins: &[Coin]) -> bool {
        coins
            .iter()
            .all(|coin| self.balance(addr, &coin.denom) >= coin.amount.u128())
    }

    fn send_coins_from_account_to_module(
        &mut self,
        sender: &Addr,
        module: &str,
        coins: &[Coin],
    ) -> Result<(), BankError> {
        let module = self.module(module)?;
        self.check_send_enabled(coins)?;
        self.transfer(sender, &module, coins)
    }

    fn send_coins_from_module_to_account(
        &mut self,
        module: &str,
        recipient: &Addr,
        coins: &[Coin],
    ) -> Result<(), BankError> {
        let module = self.module(module)?;
        if self.blocked.contains(recipient) {
            return Err(BankError::BlockedAddress(recipient.to_string()));
        }
        self.check_send_enabled(coins)?;
        self.transfer(&module, recipient, coins)
    }

    fn is_blocked(&self, addr: &Addr) -> bool {
        self.blocked.contains(addr)
    }

    fn is_send_enabled(&self, coins: &[Coin]) -> bool {
        self.check_send_enabled(coins).is_ok()
    }
}

#[derive(Debug, Default)]
pub struct MockAccounts {
    modules: HashMap<String, Addr>,
    known: HashSet<Addr>,
}

impl MockAccounts {
    pub fn register_module(&mut self, name: &str, addr: Addr) {
        self.known.insert(addr.clone());
        self.modules.insert(name.to_string(), addr);
    }

    pub fn register(&mut self, addr: &Addr) {
        self.known.insert(addr.clone());
    }
}

impl AccountKeeper for MockAccounts {
    fn module_address(&self, module: &str) -> Addr {
        self.modules
            .get(module)
            .cloned()
            .unwrap_or_else(|| Addr::unchecked(module))
    }

    fn has_account(&self, addr: &Addr) -> bool {
        self.known.contains(addr)
    }
}

type ChannelKey = (String, String);

fn channel_key(port_id: &str, channel_id: &str) -> ChannelKey {
    (port_id.to_string(), channel_id.to_string())
}

/// Channel ends, send sequences and packet commitments
#[derive(Debug, Default)]
pub struct MockChannels {
    channels: HashMap<ChannelKey, ChannelEnd>,
    next_sequence_send: HashMap<ChannelKey, u64>,
    commitments: HashMap<(String, String, u64), Binary>,
}

impl MockChannels {
    pub fn insert(&mut self, port_id: &str, channel_id: &str, channel: ChannelEnd) {
        let key = channel_key(port_id, channel_id);
        self.next_sequence_send.entry(key.clone()).or_insert(1);
        self.channels.insert(key, channel);
    }

    /// Commit a packet and return its sequence
    pub fn commit_packet(&mut self, port_id: &str, channel_id: &str, data: &Binary) -> u64 {
        let next = self
            .next_sequence_send
            .entry(channel_key(port_id, channel_id))
            .or_insert(1);
        let sequence = *next;
        *next += 1;
        self.commitments.insert(
            (port_id.to_string(), channel_id.to_string(), sequence),
            data.clone(),
        );
        sequence
    }

    pub fn delete_commitment(&mut self, port_id: &str, channel_id: &str, sequence: u64) {
        self.commitments
            .remove(&(port_id.to_string(), channel_id.to_string(), sequence));
    }
}

impl ChannelKeeper for MockChannels {
    fn channel(&self, port_id: &str, channel_id: &str) -> Option<ChannelEnd> {
        self.channels.get(&channel_key(port_id, channel_id)).cloned()
    }

    fn next_sequence_send(&self, port_id: &str, channel_id: &str) -> Option<u64> {
        self.next_sequence_send
            .get(&channel_key(port_id, channel_id))
            .copied()
    }

    fn packet_commitment(&self, port_id: &str, channel_id: &str, sequence: u64) -> Option<Binary> {
        self.commitments
            .get(&(port_id.to_string(), channel_id.to_string(), sequence))
            .cloned()
    }
}

/// Scripted application that records every callback it sees.
///
/// Versions are checked strictly: anything other than `version` (or an
/// empty proposal at open-init) is rejected.
#[derive(Debug, Clone)]
pub struct MockApp {
    pub version: String,
    pub calls: Vec<&'static str>,
    pub received_versions: Vec<String>,
    pub acks: Vec<Binary>,
    pub failing: HashSet<&'static str>,
    pub async_ack: bool,
    pub ack: Acknowledgement,
    pub upgradable: bool,
    pub unmarshaler: bool,
}

impl Default for MockApp {
    fn default() -> Self {
        Self {
            version: MOCK_VERSION.to_string(),
            calls: vec![],
            received_versions: vec![],
            acks: vec![],
            failing: HashSet::new(),
            async_ack: false,
            ack: Acknowledgement::ok(MOCK_ACK.to_vec()),
            upgradable: true,
            unmarshaler: true,
        }
    }
}

impl MockApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(mut self, callback: &'static str) -> Self {
        self.failing.insert(callback);
        self
    }

    pub fn called(&self, callback: &str) -> bool {
        self.calls.iter().any(|call| *call == callback)
    }

    fn record(&mut self, callback: &'static str) -> AppResult<()> {
        self.calls.push(callback);
        if self.failing.contains(callback) {
            bail!("{callback} failed");
        }
        Ok(())
    }

    fn check_version(&mut self, version: &str) -> AppResult<String> {
        self.received_versions.push(version.to_string());
        if version != self.version {
            return Err(anyhow!(
                "invalid version: expected {}, got {version}",
                self.version
            ));
        }
        Ok(self.version.clone())
    }
}

impl IbcModule for MockApp {
    fn on_chan_open_init(
        &mut self,
        _storage: &mut dyn Storage,
        _channel: &ChannelOpen,
        version: &str,
    ) -> AppResult<String> {
        self.record("on_chan_open_init")?;
        if version.is_empty() {
            self.received_versions.push(String::new());
            return Ok(self.version.clone());
        }
        self.check_version(version)
    }

    fn on_chan_open_try(
        &mut self,
        _storage: &mut dyn Storage,
        _channel: &ChannelOpen,
        counterparty_version: &str,
    ) -> AppResult<String> {
        self.record("on_chan_open_try")?;
        self.check_version(counterparty_version)
    }

    fn on_chan_open_ack(
        &mut self,
        _storage: &mut dyn Storage,
        _port_id: &str,
        _channel_id: &str,
        _counterparty_channel_id: &str,
        counterparty_version: &str,
    ) -> AppResult<()> {
        self.record("on_chan_open_ack")?;
        self.check_version(counterparty_version).map(|_| ())
    }

    fn on_chan_open_confirm(
        &mut self,
        _storage: &mut dyn Storage,
        _port_id: &str,
        _channel_id: &str,
    ) -> AppResult<()> {
        self.record("on_chan_open_confirm")
    }

    fn on_chan_close_init(
        &mut self,
        _storage: &mut dyn Storage,
        _port_id: &str,
        _channel_id: &str,
    ) -> AppResult<()> {
        self.record("on_chan_close_init")
    }

    fn on_chan_close_confirm(
        &mut self,
        _storage: &mut dyn Storage,
        _port_id: &str,
        _channel_id: &str,
    ) -> AppResult<()> {
        self.record("on_chan_close_confirm")
    }

    fn on_recv_packet(
        &mut self,
        _storage: &mut dyn Storage,
        channel_version: &str,
        _packet: &Packet,
        _relayer: &Addr,
    ) -> Option<Acknowledgement> {
        self.calls.push("on_recv_packet");
        self.received_versions.push(channel_version.to_string());
        if self.async_ack {
            None
        } else {
            Some(self.ack.clone())
        }
    }

    fn on_acknowledgement_packet(
        &mut self,
        _storage: &mut dyn Storage,
        channel_version: &str,
        _packet: &Packet,
        acknowledgement: &[u8],
        _relayer: &Addr,
    ) -> AppResult<()> {
        self.received_versions.push(channel_version.to_string());
        self.acks.push(Binary::from(acknowledgement));
        self.record("on_acknowledgement_packet")
    }

    fn on_timeout_packet(
        &mut self,
        _storage: &mut dyn Storage,
        channel_version: &str,
        _packet: &Packet,
        _relayer: &Addr,
    ) -> AppResult<()> {
        self.received_versions.push(channel_version.to_string());
        self.record("on_timeout_packet")
    }

    fn upgradable(&mut self) -> Option<&mut dyn UpgradableModule> {
        if self.upgradable {
            Some(self)
        } else {
            None
        }
    }

    fn packet_data_unmarshaler(&self) -> Option<&dyn PacketDataUnmarshaler> {
        if self.unmarshaler {
            Some(self)
        } else {
            None
        }
    }
}

impl UpgradableModule for MockApp {
    fn on_chan_upgrade_init(
        &mut self,
        _storage: &mut dyn Storage,
        _port_id: &str,
        _channel_id: &str,
        _order: Order,
        _connection_hops: &[String],
        version: &str,
    ) -> AppResult<String> {
        self.record("on_chan_upgrade_init")?;
        self.check_version(version)
    }

    fn on_chan_upgrade_try(
        &mut self,
        _storage: &mut dyn Storage,
        _port_id: &str,
        _channel_id: &str,
        _order: Order,
        _connection_hops: &[String],
        counterparty_version: &str,
    ) -> AppResult<String> {
        self.record("on_chan_upgrade_try")?;
        self.check_version(counterparty_version)
    }

    fn on_chan_upgrade_ack(
        &mut self,
        _storage: &mut dyn Storage,
        _port_id: &str,
        _channel_id: &str,
        counterparty_version: &str,
    ) -> AppResult<()> {
        self.record("on_chan_upgrade_ack")?;
        self.check_version(counterparty_version).map(|_| ())
    }

    fn on_chan_upgrade_open(
        &mut self,
        _storage: &mut dyn Storage,
        _port_id: &str,
        _channel_id: &str,
        _order: Order,
        _connection_hops: &[String],
        version: &str,
    ) {
        self.calls.push("on_chan_upgrade_open");
        self.received_versions.push(version.to_string());
    }
}

impl PacketDataUnmarshaler for MockApp {
    fn unmarshal_packet_data(
        &self,
        _storage: &dyn Storage,
        _port_id: &str,
        _channel_id: &str,
        data: &[u8],
    ) -> AppResult<PacketData> {
        Ok(PacketData {
            data: serde_json::from_slice(data)?,
            version: self.version.clone(),
        })
    }
}

/// Storage, address validation and the three keepers for one chain
pub struct MockChain {
    pub storage: MockStorage,
    pub api: MockApi,
    pub bank: MockBank,
    pub accounts: MockAccounts,
    pub channels: MockChannels,
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChain {
    /// Escrow account is registered under [`MODULE_NAME`] and, like every
    /// module account, may not receive external funds.
    pub fn new() -> Self {
        let OwnedDeps { storage, api, .. } = mock_dependencies();
        let module = api.addr_make(MODULE_NAME);

        let mut bank = MockBank::default();
        bank.register_module(MODULE_NAME, module.clone());
        bank.block(&module);

        let mut accounts = MockAccounts::default();
        accounts.register_module(MODULE_NAME, module);

        Self {
            storage,
            api,
            bank,
            accounts,
            channels: MockChannels::default(),
        }
    }

    pub fn deps(&mut self) -> FeeDeps<'_> {
        FeeDeps {
            storage: &mut self.storage,
            api: &self.api,
            bank: &mut self.bank,
            accounts: &self.accounts,
            channels: &self.channels,
        }
    }

    pub fn addr(&self, label: &str) -> Addr {
        self.api.addr_make(label)
    }

    pub fn module_address(&self) -> Addr {
        self.accounts.module_address(MODULE_NAME)
    }

    /// Mint `coins` to `addr` and make the account known
    pub fn fund(&mut self, addr: &Addr, coins: &[Coin]) {
        self.accounts.register(addr);
        self.bank.mint(addr, coins);
    }

    pub fn balance(&self, addr: &Addr, denom: &str) -> u128 {
        self.bank.balance(addr, denom)
    }

    pub fn module_balance(&self, denom: &str) -> u128 {
        self.bank.balance(&self.module_address(), denom)
    }

    pub fn open_channel(&mut self, port_id: &str, channel_id: &str, version: &str) {
        self.channels.insert(
            port_id,
            channel_id,
            ChannelEnd {
                state: ChannelState::Open,
                ordering: Order::Unordered,
                counterparty: Counterparty::new(port_id, COUNTERPARTY_CHANNEL),
                connection_hops: vec!["connection-0".to_string()],
                version: version.to_string(),
            },
        );
    }

    /// Open channel whose negotiated version carries fee metadata
    pub fn open_fee_channel(&mut self, port_id: &str, channel_id: &str) {
        let version = Metadata::new(MOCK_VERSION).to_version().unwrap();
        self.open_channel(port_id, channel_id, &version);
        set_fee_enabled(&mut self.storage, port_id, channel_id).unwrap();
    }

    /// Commit an outgoing packet on `port_id/channel_id`
    pub fn send_packet(&mut self, port_id: &str, channel_id: &str) -> Packet {
        let data = Binary::from(br#"{"amount":"100","denom":"stake"}"#.to_vec());
        let sequence = self.channels.commit_packet(port_id, channel_id, &data);
        Packet {
            sequence,
            source_port: port_id.to_string(),
            source_channel: channel_id.to_string(),
            destination_port: port_id.to_string(),
            destination_channel: COUNTERPARTY_CHANNEL.to_string(),
            data,
            timeout_timestamp: 0,
        }
    }

    /// Move the fee from its refund account into escrow and record it
    pub fn escrow_fee(
        &mut self,
        packet_id: &PacketId,
        packet_fee: PacketFee,
    ) -> Result<PacketFees, FeeError> {
        escrow_packet_fee(&mut self.deps(), MODULE_NAME, packet_id, packet_fee)?;
        Ok(escrow::get(&self.storage, packet_id)?.unwrap_or_default())
    }

    /// Escrow account holds exactly what the ledger records
    pub fn escrow_invariant_holds(&self) -> bool {
        let Ok(records) = escrow::all(&self.storage) else {
            return false;
        };
        let totals = records
            .iter()
            .map(|record| PacketFees::new(record.packet_fees.clone()).total())
            .collect::<Result<Vec<_>, _>>();
        let Ok(totals) = totals else {
            return false;
        };
        match sum_coins(totals.iter().map(Vec::as_slice)) {
            Ok(expected) => expected == self.bank.all_balances(&self.module_address()),
            Err(_) => false,
        }
    }
}

/// Packet arriving on this chain at `port_id/channel_id`
pub fn incoming_packet(port_id: &str, channel_id: &str, sequence: u64) -> Packet {
    Packet {
        sequence,
        source_port: port_id.to_string(),
        source_channel: COUNTERPARTY_CHANNEL.to_string(),
        destination_port: port_id.to_string(),
        destination_channel: channel_id.to_string(),
        data: Binary::from(br#"{"amount":"100","denom":"stake"}"#.to_vec()),
        timeout_timestamp: 0,
    }
}
