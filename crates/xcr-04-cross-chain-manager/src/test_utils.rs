//! Fixtures that simulate the relay chain side of a conversation with the
//! manager: keeper committees, signed headers and proven messages.

use crate::adapters::events::RecordingEventSink;
use crate::adapters::memory::InMemoryKVStore;
use crate::domain::config::RelayConfig;
use crate::domain::entities::InboundCall;
use crate::domain::errors::{DispatchError, KVStoreError};
use crate::ports::inbound::CrossChainManagerApi;
use crate::domain::keys::KeyPrefix;
use crate::ports::outbound::{BatchOperation, ContractStorage, CrossChainHandler, KeyValueStore};
use crate::service::CrossChainManager;
use k256::ecdsa::signature::Signer;
use k256::ecdsa::{Signature, SigningKey};
use parking_lot::Mutex;
use shared_types::{hash256, ChainId, Hash20, Hash32};
use std::sync::Arc;
use xcr_01_codec::{header_hash, CrossChainTxParameter, Header, ToMerkleValue};
use xcr_02_merkle_prover::MerkleTree;
use xcr_03_bookkeeper::{derive_book_keeper, quorum};

/// Legacy key-type prefix carried by relay-chain keeper records.
pub const RECORD_PREFIX: [u8; 2] = [0x12, 0x05];

/// Chain id used as the message source in fixtures.
pub const SOURCE_CHAIN_ID: u64 = 2;

/// Address the default test handler is registered at.
pub const HANDLER_ADDRESS: Hash20 = Hash20([0xBE; 20]);

/// A keeper set with its signing keys.
#[derive(Clone)]
pub struct KeeperCommittee {
    keys: Vec<SigningKey>,
}

impl KeeperCommittee {
    /// `n` deterministic keepers. Different `seed`s give disjoint committees.
    pub fn new(n: usize, seed: u8) -> Self {
        let keys = (0..n)
            .map(|i| {
                let mut secret = [0x11u8; 32];
                secret[0] = seed.min(0xF0);
                secret[30] = (i >> 8) as u8;
                secret[31] = (i as u8).wrapping_add(1);
                SigningKey::from_slice(&secret).expect("valid secret")
            })
            .collect();
        Self { keys }
    }

    /// `n` keepers drawn from the OS RNG.
    pub fn random(n: usize) -> Self {
        let keys = (0..n)
            .map(|_| SigningKey::random(&mut rand::rngs::OsRng))
            .collect();
        Self { keys }
    }

    /// Number of keepers.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the committee is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Required in-order signatures.
    pub fn quorum(&self) -> usize {
        quorum(self.keys.len())
    }

    /// Signing key of keeper `index`.
    pub fn key(&self, index: usize) -> &SigningKey {
        &self.keys[index]
    }

    /// Raw 67-byte records, concatenated in signing order.
    pub fn raw_key_list(&self) -> Vec<u8> {
        self.keys
            .iter()
            .flat_map(|key| {
                let point = key.verifying_key().to_encoded_point(false);
                let mut record = RECORD_PREFIX.to_vec();
                record.extend_from_slice(point.as_bytes());
                record
            })
            .collect()
    }

    /// Commitment a header must carry to activate this committee.
    pub fn commitment(&self) -> Hash20 {
        derive_book_keeper(&self.raw_key_list())
            .expect("committee key list")
            .next_book_keeper
    }

    /// Signature blob from the keepers at `indices`, in the order given.
    pub fn sign(&self, raw_header: &[u8], indices: &[usize]) -> Vec<u8> {
        indices
            .iter()
            .flat_map(|&i| sign_slot(raw_header, &self.keys[i]))
            .collect()
    }

    /// Signature blob from the first `quorum` keepers.
    pub fn sign_quorum(&self, raw_header: &[u8]) -> Vec<u8> {
        let indices: Vec<usize> = (0..self.quorum()).collect();
        self.sign(raw_header, &indices)
    }
}

/// One 65-byte signature slot over `hash256(raw_header)`.
pub fn sign_slot(raw_header: &[u8], key: &SigningKey) -> Vec<u8> {
    let signature: Signature = key.sign(hash256(raw_header).as_bytes());
    let mut slot = signature.to_bytes().to_vec();
    slot.push(0);
    slot
}

/// Header fields a fixture cares about; everything else is fixed.
#[derive(Debug, Clone, Default)]
pub struct HeaderFields {
    /// Block height.
    pub height: u32,
    /// Root committing message leaves.
    pub cross_states_root: Hash32,
    /// Root committing historical header hashes.
    pub block_root: Hash32,
    /// Keeper commitment.
    pub next_book_keeper: Hash20,
}

/// Encode a header built from `fields`.
pub fn raw_header(fields: &HeaderFields) -> Vec<u8> {
    Header {
        version: 0,
        chain_id: 0,
        prev_block_hash: Hash32([0x01; 32]),
        transaction_root: Hash32([0x02; 32]),
        cross_states_root: fields.cross_states_root,
        block_root: fields.block_root,
        timestamp: 1_600_000_000 + fields.height,
        height: fields.height,
        consensus_data: 0x0102_0304,
        consensus_payload: b"{\"leader\":1}".to_vec(),
        next_book_keeper: fields.next_book_keeper,
    }
    .encode()
}

/// Genesis header activating `committee`.
pub fn genesis_header(committee: &KeeperCommittee) -> Vec<u8> {
    raw_header(&HeaderFields {
        height: 0,
        next_book_keeper: committee.commitment(),
        ..HeaderFields::default()
    })
}

/// Rotation header at `height` activating `committee`.
pub fn rotation_header(height: u32, committee: &KeeperCommittee) -> Vec<u8> {
    raw_header(&HeaderFields {
        height,
        next_book_keeper: committee.commitment(),
        ..HeaderFields::default()
    })
}

/// An inbound leaf addressed to `to_chain_id` and `to_contract`.
pub fn inbound_value(
    tx_hash: u8,
    to_chain_id: u64,
    to_contract: &[u8],
    method: &[u8],
    args: &[u8],
) -> ToMerkleValue {
    ToMerkleValue::wrap(
        vec![tx_hash; 32],
        ChainId::from_u64(SOURCE_CHAIN_ID).expect("source chain"),
        CrossChainTxParameter {
            tx_hash: vec![tx_hash ^ 0xFF; 32],
            cross_chain_id: vec![tx_hash; 16],
            from_contract: vec![0x5A; 20],
            to_chain_id: ChainId::from_u64(to_chain_id).expect("destination chain"),
            to_contract: to_contract.to_vec(),
            method: method.to_vec(),
            args: args.to_vec(),
        },
    )
}

/// Messages committed under one header's `crossStatesRoot`.
pub struct CommittedBatch {
    /// Header carrying the root.
    pub raw_header: Vec<u8>,
    /// Proof for each message, in input order.
    pub proofs: Vec<Vec<u8>>,
}

/// Commit `values` under a header at `height`.
pub fn commit_messages(height: u32, values: &[ToMerkleValue]) -> CommittedBatch {
    let tree = MerkleTree::new(values.iter().map(ToMerkleValue::encode).collect())
        .expect("non-empty batch");
    let proofs = (0..values.len())
        .map(|i| tree.proof(i).expect("leaf in range"))
        .collect();
    CommittedBatch {
        raw_header: raw_header(&HeaderFields {
            height,
            cross_states_root: tree.root(),
            ..HeaderFields::default()
        }),
        proofs,
    }
}

/// Anchor header at `height` whose `blockRoot` commits `historical` headers.
///
/// Returns the anchor and a header proof for each historical header.
pub fn anchor_for(height: u32, historical: &[&[u8]]) -> (Vec<u8>, Vec<Vec<u8>>) {
    let tree = MerkleTree::new(
        historical
            .iter()
            .map(|raw| header_hash(raw).to_vec())
            .collect(),
    )
    .expect("non-empty history");
    let proofs = (0..historical.len())
        .map(|i| tree.proof(i).expect("leaf in range"))
        .collect();
    let anchor = raw_header(&HeaderFields {
        height,
        block_root: tree.root(),
        ..HeaderFields::default()
    });
    (anchor, proofs)
}

/// How a [`RecordingHandler`] answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerMode {
    /// Return `Ok(true)`.
    Accept,
    /// Return `Ok(false)`.
    Decline,
    /// Return the given error.
    Fail(DispatchError),
}

/// Handler state key counting committed deliveries.
pub const DELIVERIES_KEY: &[u8] = b"deliveries";

/// Handler that records every call and answers per its mode.
///
/// An accepted call also stages two writes: the call's args under its
/// `tx_hash`, and an increment of [`DELIVERIES_KEY`]. They reach the store
/// only if the manager commits the delivery.
#[derive(Debug)]
pub struct RecordingHandler {
    mode: Mutex<HandlerMode>,
    calls: Mutex<Vec<InboundCall>>,
}

impl RecordingHandler {
    /// Handler answering with `mode`.
    pub fn new(mode: HandlerMode) -> Arc<Self> {
        Arc::new(Self {
            mode: Mutex::new(mode),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Change how later calls are answered.
    pub fn set_mode(&self, mode: HandlerMode) {
        *self.mode.lock() = mode;
    }

    /// Calls received so far, committed or not.
    pub fn calls(&self) -> Vec<InboundCall> {
        self.calls.lock().clone()
    }

    /// Number of calls received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl CrossChainHandler for RecordingHandler {
    fn handle(
        &self,
        call: &InboundCall,
        storage: &mut ContractStorage<'_>,
    ) -> Result<bool, DispatchError> {
        self.calls.lock().push(call.clone());
        match &*self.mode.lock() {
            HandlerMode::Accept => {
                let delivered = decode_counter(storage.get(DELIVERIES_KEY)?)?;
                storage.put(DELIVERIES_KEY, (delivered + 1).to_le_bytes().to_vec());
                storage.put(&call.tx_hash, call.args.clone());
                Ok(true)
            }
            HandlerMode::Decline => Ok(false),
            HandlerMode::Fail(err) => Err(err.clone()),
        }
    }
}

fn decode_counter(raw: Option<Vec<u8>>) -> Result<u64, DispatchError> {
    match raw {
        None => Ok(0),
        Some(bytes) => <[u8; 8]>::try_from(bytes.as_slice())
            .map(u64::from_le_bytes)
            .map_err(|_| DispatchError::Storage("delivery counter is not 8 bytes".to_string())),
    }
}

/// Deliveries `contract`'s [`RecordingHandler`] has committed to `kv`.
pub fn committed_deliveries(kv: &impl KeyValueStore, contract: &Hash20) -> u64 {
    kv.get(&KeyPrefix::contract_key(contract, DELIVERIES_KEY))
        .ok()
        .flatten()
        .and_then(|bytes| <[u8; 8]>::try_from(bytes.as_slice()).ok())
        .map(u64::from_le_bytes)
        .unwrap_or(0)
}

/// In-memory store whose batch writes can be made to fail.
#[derive(Debug, Default)]
pub struct FlakyKVStore {
    inner: InMemoryKVStore,
    fail_writes: bool,
}

impl FlakyKVStore {
    /// Store that accepts writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent batch write fail (or succeed again).
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Underlying data.
    pub fn inner(&self) -> &InMemoryKVStore {
        &self.inner
    }
}

impl KeyValueStore for FlakyKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.inner.get(key)
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        if self.fail_writes {
            return Err(KVStoreError::IOError {
                message: "injected write failure".to_string(),
            });
        }
        self.inner.atomic_batch_write(operations)
    }
}

/// Everything a test needs to drive a manager.
pub struct Fixture<KV: KeyValueStore = InMemoryKVStore> {
    /// The manager under test.
    pub manager: CrossChainManager<KV, Arc<RecordingEventSink>>,
    /// Events it emitted.
    pub events: Arc<RecordingEventSink>,
    /// Handler registered at [`HANDLER_ADDRESS`].
    pub handler: Arc<RecordingHandler>,
    /// Keepers installed at genesis.
    pub committee: KeeperCommittee,
}

impl Fixture {
    /// Manager with an accepting handler and no genesis yet.
    pub fn new() -> Self {
        Self::with_config(RelayConfig::for_testing())
    }

    /// Manager built from `config`, no genesis yet.
    pub fn with_config(config: RelayConfig) -> Self {
        Self::with_store(config, InMemoryKVStore::new())
    }

    /// Manager with the 4-keeper committee installed at genesis.
    pub fn genesised() -> Self {
        let mut fixture = Self::new();
        fixture.genesis();
        fixture
    }
}

impl<KV: KeyValueStore> Fixture<KV> {
    /// Manager over `kv`, no genesis yet.
    pub fn with_store(config: RelayConfig, kv: KV) -> Self {
        let events = Arc::new(RecordingEventSink::new());
        let mut manager =
            CrossChainManager::new(config, kv, Arc::clone(&events)).expect("valid test config");
        let handler = RecordingHandler::new(HandlerMode::Accept);
        manager.register_handler(HANDLER_ADDRESS, Arc::clone(&handler));
        Self {
            manager,
            events,
            handler,
            committee: KeeperCommittee::new(4, 1),
        }
    }

    /// Install the fixture committee.
    pub fn genesis(&mut self) {
        let raw = genesis_header(&self.committee);
        self.manager
            .rotate_book_keeper(&raw, &self.committee.raw_key_list(), &[])
            .expect("genesis");
        self.events.take();
    }

    /// Message to the default handler, addressed to the local chain.
    pub fn local_message(&self, tx_hash: u8, args: &[u8]) -> ToMerkleValue {
        inbound_value(
            tx_hash,
            self.manager.config().local_chain_id,
            HANDLER_ADDRESS.as_bytes(),
            b"unlock",
            args,
        )
    }

    /// Deliveries the default handler has committed.
    pub fn committed_deliveries(&self) -> u64 {
        committed_deliveries(self.manager.kv(), &HANDLER_ADDRESS)
    }
}

impl Fixture<FlakyKVStore> {
    /// Genesised manager over a store whose writes can be made to fail.
    pub fn flaky() -> Self {
        let mut fixture = Self::with_store(RelayConfig::for_testing(), FlakyKVStore::new());
        fixture.genesis();
        fixture
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
