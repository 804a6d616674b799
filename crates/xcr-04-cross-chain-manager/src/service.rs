//! # Cross-Chain Manager Service
//!
//! Verifies inbound messages against the relay chain's keeper signatures and
//! Merkle commitments, executes them exactly once, and records outbound
//! requests for relayers to pick up.
//!
//! ## Inbound pipeline
//!
//! ```text
//! genesis? → header → signatures (current epoch or anchor) → leaf proof
//!          → decode → replay guard → destination → handler → commit
//! ```
//!
//! Every state change of a call goes into a single
//! [`KeyValueStore::atomic_batch_write`]. For inbound messages that batch
//! carries the handler's staged writes together with the replay guard.
//! Events are emitted after it.

use crate::adapters::epoch_store::{read_epoch, KvEpochStore};
use crate::adapters::registry::HandlerRegistry;
use crate::domain::config::RelayConfig;
use crate::domain::entities::{InboundCall, InvocationContext};
use crate::domain::errors::{
    DispatchFailure, KVStoreError, MalformedInput, PolicyViolation, RelayError, VerificationFailure,
};
use crate::domain::events::RelayEvent;
use crate::domain::keys::KeyPrefix;
use crate::ports::inbound::CrossChainManagerApi;
use crate::ports::outbound::{
    BatchOperation, ContractStorage, CrossChainHandler, EventSink, KeyValueStore,
};
use k256::ecdsa::VerifyingKey;
use relay_telemetry::metric_inc;
use relay_telemetry::metrics::{
    KEEPER_ROTATIONS, MESSAGES_DISPATCHED, OUTBOUND_REGISTERED, RELAY_ERRORS, REPLAYS_REJECTED,
    SIGNATURE_FAILURES,
};
use shared_types::{sha256, ChainId, Hash20};
use tracing::{debug, info, warn};
use xcr_01_codec::{
    decode_inbound, decode_outbound, encode_outbound, header_hash, CodecError,
    CrossChainTxParameter, Header, ToMerkleValue,
};
use xcr_02_merkle_prover::verify as verify_proof;
use xcr_03_bookkeeper::{BookKeeperManager, EpochState, RotationPolicy, Transition};

const EXECUTED_FLAG: [u8; 1] = [1];

/// The cross-chain manager.
///
/// Owns its key-value store, event sink and handler registry. Every mutating
/// call takes `&mut self`, so invocations are serialized by construction.
pub struct CrossChainManager<KV: KeyValueStore, ES: EventSink> {
    config: RelayConfig,
    local_chain: ChainId,
    kv: KV,
    events: ES,
    handlers: HandlerRegistry,
    book_keepers: BookKeeperManager,
}

impl<KV: KeyValueStore, ES: EventSink> CrossChainManager<KV, ES> {
    /// Create a manager over `kv`, delivering events to `events`.
    pub fn new(config: RelayConfig, kv: KV, events: ES) -> Result<Self, RelayError> {
        let local_chain = config.local_chain_tag()?;
        let book_keepers = BookKeeperManager::new(RotationPolicy {
            allow_same_height: config.allow_same_height_rotation,
        });
        info!(
            local_chain_id = config.local_chain_id,
            manager = %config.manager_address,
            allow_same_height_rotation = config.allow_same_height_rotation,
            "[xcr-04] cross-chain manager ready"
        );
        Ok(Self {
            config,
            local_chain,
            kv,
            events,
            handlers: HandlerRegistry::new(),
            book_keepers,
        })
    }

    /// Install a local handler at `address`.
    pub fn register_handler(
        &mut self,
        address: Hash20,
        handler: impl CrossChainHandler + 'static,
    ) -> Option<Box<dyn CrossChainHandler>> {
        debug!(address = %address, "[xcr-04] handler registered");
        self.handlers.register(address, handler)
    }

    /// Registered handlers.
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Mutable access to the handler registry.
    pub fn handlers_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.handlers
    }

    /// Active configuration.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Underlying key-value store.
    pub fn kv(&self) -> &KV {
        &self.kv
    }

    /// Mutable access to the key-value store.
    pub fn kv_mut(&mut self) -> &mut KV {
        &mut self.kv
    }

    /// Event sink.
    pub fn events(&self) -> &ES {
        &self.events
    }

    fn current_epoch(&self) -> Result<EpochState, RelayError> {
        read_epoch(&self.kv)?.ok_or(RelayError::Policy(PolicyViolation::NotGenesised))
    }

    fn verify_signatures(
        &self,
        epoch: &EpochState,
        signed_header: &[u8],
        signatures: &[u8],
    ) -> Result<(), RelayError> {
        self.book_keepers
            .verify_signatures(epoch, signed_header, signatures)
            .map_err(RelayError::from)
    }

    /// Establish that `raw_header` was signed, directly or through an anchor.
    fn authenticate_header(
        &self,
        epoch: &EpochState,
        raw_header: &[u8],
        header: &Header,
        header_proof: &[u8],
        anchor_raw_header: &[u8],
        signatures: &[u8],
    ) -> Result<(), RelayError> {
        if header.height >= epoch.height {
            return self.verify_signatures(epoch, raw_header, signatures);
        }

        debug!(
            height = header.height,
            epoch_height = epoch.height,
            "[xcr-04] header predates epoch, verifying through anchor"
        );
        self.verify_signatures(epoch, anchor_raw_header, signatures)?;
        let anchor = Header::decode(anchor_raw_header)?;
        let committed = verify_proof(header_proof, &anchor.block_root)?;
        if committed != header_hash(raw_header).as_bytes() {
            return Err(RelayError::Verification(VerificationFailure::AnchorCommitment));
        }
        Ok(())
    }

    fn process_submission(
        &mut self,
        proof: &[u8],
        raw_header: &[u8],
        header_proof: &[u8],
        anchor_raw_header: &[u8],
        signatures: &[u8],
    ) -> Result<ToMerkleValue, RelayError> {
        let epoch = self.current_epoch()?;
        let header = Header::decode(raw_header)?;
        self.authenticate_header(
            &epoch,
            raw_header,
            &header,
            header_proof,
            anchor_raw_header,
            signatures,
        )?;

        let leaf = verify_proof(proof, &header.cross_states_root)?;
        let value = decode_inbound(&leaf)?;
        let from_chain_id = chain_id_u64(&value.from_chain_id)?;

        let guard_key = KeyPrefix::executed_key(&value.from_chain_id, &value.tx_hash);
        if self.kv.exists(&guard_key)? {
            metric_inc!(REPLAYS_REJECTED);
            return Err(RelayError::AlreadyProcessed {
                from_chain_id,
                tx_hash: hex::encode(&value.tx_hash),
            });
        }

        if value.tx_param.to_chain_id != self.local_chain {
            return Err(RelayError::Policy(PolicyViolation::WrongDestination {
                expected: self.config.local_chain_id,
                actual: chain_id_u64(&value.tx_param.to_chain_id)?,
            }));
        }

        let to_contract = Hash20::from_slice(&value.tx_param.to_contract).map_err(|_| {
            RelayError::Decode(MalformedInput::ContractLength(
                value.tx_param.to_contract.len(),
            ))
        })?;

        let handler = self
            .handlers
            .resolve(&to_contract)
            .ok_or(RelayError::Dispatch(DispatchFailure::UnknownContract(
                to_contract,
            )))?;
        let call = InboundCall::from_value(&value, from_chain_id);
        let mut storage = ContractStorage::new(to_contract, &self.kv);
        match handler.handle(&call, &mut storage) {
            Ok(true) => {}
            Ok(false) => {
                return Err(RelayError::Dispatch(DispatchFailure::Declined {
                    contract: to_contract,
                }))
            }
            Err(source) => {
                return Err(RelayError::Dispatch(DispatchFailure::Handler {
                    contract: to_contract,
                    source,
                }))
            }
        }

        // Handler effects and the guard land together or not at all.
        let mut batch = storage.into_operations();
        debug!(
            staged = batch.len(),
            to_contract = %to_contract,
            "[xcr-04] committing handler writes with replay guard"
        );
        batch.push(BatchOperation::put(guard_key, EXECUTED_FLAG.to_vec()));
        self.kv.atomic_batch_write(batch)?;

        metric_inc!(MESSAGES_DISPATCHED);
        info!(
            from_chain_id,
            height = header.height,
            to_contract = %to_contract,
            tx_hash = %hex::encode(&value.tx_hash),
            "[xcr-04] inbound message executed"
        );
        self.events.emit(RelayEvent::CrossChainUnlock {
            from_chain_id,
            to_contract,
            tx_hash: value.tx_hash.clone(),
        });
        Ok(value)
    }

    fn process_outbound(
        &mut self,
        ctx: &InvocationContext,
        target_chain_id: u64,
        target_address: &[u8],
        method: &[u8],
        payload: &[u8],
    ) -> Result<Vec<u8>, RelayError> {
        if ctx.caller == self.config.manager_address {
            return Err(RelayError::Policy(PolicyViolation::SelfCall));
        }
        let target = ChainId::from_u64(target_chain_id).map_err(|source| {
            RelayError::Policy(PolicyViolation::InvalidChainId {
                chain_id: target_chain_id,
                source,
            })
        })?;

        let counter_key = KeyPrefix::request_id_key(&target);
        let request_id = match self.kv.get(&counter_key)? {
            Some(bytes) => decode_counter(&bytes)?,
            None => 0,
        };
        let next_id = request_id
            .checked_add(1)
            .ok_or(RelayError::Policy(PolicyViolation::CounterExhausted {
                chain_id: target_chain_id,
            }))?;

        let mut cross_chain_preimage = self.config.manager_address.to_vec();
        cross_chain_preimage.extend_from_slice(ctx.tx_hash.as_bytes());
        let param = CrossChainTxParameter {
            tx_hash: ctx.tx_hash.to_vec(),
            cross_chain_id: sha256(&cross_chain_preimage).to_vec(),
            from_contract: ctx.caller.to_vec(),
            to_chain_id: target,
            to_contract: target_address.to_vec(),
            method: method.to_vec(),
            args: payload.to_vec(),
        };

        let request_key = KeyPrefix::request_key(&target, request_id);
        self.kv.atomic_batch_write(vec![
            BatchOperation::put(request_key.clone(), encode_outbound(&param)),
            BatchOperation::put(counter_key, next_id.to_le_bytes().to_vec()),
        ])?;

        metric_inc!(OUTBOUND_REGISTERED);
        info!(
            caller = %ctx.caller,
            target_chain_id,
            request_id,
            "[xcr-04] outbound request registered"
        );
        self.events.emit(RelayEvent::CrossChainLock {
            caller: ctx.caller,
            from_contract: param.from_contract,
            target_chain_id,
            request_key: request_key.clone(),
            payload: param.args,
        });
        Ok(request_key)
    }

    fn process_rotation(
        &mut self,
        raw_header: &[u8],
        raw_keys: &[u8],
        signatures: &[u8],
    ) -> Result<Transition, RelayError> {
        let change = {
            let mut store = KvEpochStore::new(&mut self.kv);
            self.book_keepers
                .rotate_book_keeper(&mut store, raw_header, raw_keys, signatures)?
        };

        let kind = match change.transition {
            Transition::Genesis => "genesis",
            Transition::Rotation => "rotation",
        };
        metric_inc!(KEEPER_ROTATIONS, &[kind]);
        self.events.emit(RelayEvent::BookKeeperChanged {
            height: change.state.height,
            raw_header: raw_header.to_vec(),
        });
        Ok(change.transition)
    }

    fn stored_owner(&self) -> Result<Hash20, RelayError> {
        match self.kv.get(&KeyPrefix::Owner.key(&[]))? {
            Some(bytes) => Hash20::from_slice(&bytes).map_err(|e| {
                RelayError::from(KVStoreError::CorruptionError {
                    message: format!("owner record: {}", e),
                })
            }),
            None => Ok(self.config.origin_owner),
        }
    }

    fn process_set_owner(&mut self, caller: &Hash20, new_owner: Hash20) -> Result<(), RelayError> {
        if *caller != self.stored_owner()? {
            return Err(RelayError::Policy(PolicyViolation::Unauthorized { caller: *caller }));
        }
        self.kv.atomic_batch_write(vec![BatchOperation::put(
            KeyPrefix::Owner.key(&[]),
            new_owner.to_vec(),
        )])?;
        info!(previous = %caller, owner = %new_owner, "[xcr-04] owner changed");
        self.events.emit(RelayEvent::OwnerChanged { owner: new_owner });
        Ok(())
    }

    /// Count and log a failed operation.
    fn observe<T>(&self, operation: &'static str, result: Result<T, RelayError>) -> Result<T, RelayError> {
        if let Err(err) = &result {
            metric_inc!(RELAY_ERRORS, &[err.class()]);
            if matches!(
                err,
                RelayError::Verification(VerificationFailure::QuorumNotMet { .. })
            ) {
                metric_inc!(SIGNATURE_FAILURES);
            }
            warn!(
                operation,
                class = err.class(),
                retryable = err.is_retryable(),
                error = %err,
                "[xcr-04] operation failed"
            );
        }
        result
    }
}

impl<KV: KeyValueStore, ES: EventSink> CrossChainManagerApi for CrossChainManager<KV, ES> {
    fn submit(
        &mut self,
        proof: &[u8],
        raw_header: &[u8],
        header_proof: &[u8],
        anchor_raw_header: &[u8],
        signatures: &[u8],
    ) -> Result<ToMerkleValue, RelayError> {
        let result =
            self.process_submission(proof, raw_header, header_proof, anchor_raw_header, signatures);
        self.observe("submit", result)
    }

    fn register_outbound(
        &mut self,
        ctx: &InvocationContext,
        target_chain_id: u64,
        target_address: &[u8],
        method: &[u8],
        payload: &[u8],
    ) -> Result<Vec<u8>, RelayError> {
        let result = self.process_outbound(ctx, target_chain_id, target_address, method, payload);
        self.observe("register_outbound", result)
    }

    fn rotate_book_keeper(
        &mut self,
        raw_header: &[u8],
        raw_keys: &[u8],
        signatures: &[u8],
    ) -> Result<Transition, RelayError> {
        let result = self.process_rotation(raw_header, raw_keys, signatures);
        self.observe("rotate_book_keeper", result)
    }

    fn owner(&self) -> Result<Hash20, RelayError> {
        self.stored_owner()
    }

    fn is_owner(&self, id: &Hash20) -> Result<bool, RelayError> {
        Ok(*id == self.stored_owner()?)
    }

    fn set_owner(&mut self, caller: &Hash20, new_owner: Hash20) -> Result<(), RelayError> {
        let result = self.process_set_owner(caller, new_owner);
        self.observe("set_owner", result)
    }

    fn book_keepers(&self) -> Result<Vec<VerifyingKey>, RelayError> {
        Ok(read_epoch(&self.kv)?
            .map(|epoch| epoch.book_keeper.keepers)
            .unwrap_or_default())
    }

    fn is_genesised(&self) -> Result<bool, RelayError> {
        Ok(self.kv.exists(&KeyPrefix::Genesis.key(&[]))?)
    }

    fn current_epoch_height(&self) -> Result<Option<u32>, RelayError> {
        Ok(read_epoch(&self.kv)?.map(|epoch| epoch.height))
    }

    fn request(
        &self,
        target_chain_id: u64,
        request_id: u64,
    ) -> Result<Option<CrossChainTxParameter>, RelayError> {
        let Ok(target) = ChainId::from_u64(target_chain_id) else {
            return Ok(None);
        };
        self.kv
            .get(&KeyPrefix::request_key(&target, request_id))?
            .map(|bytes| decode_outbound(&bytes))
            .transpose()
            .map_err(|e| {
                RelayError::from(KVStoreError::CorruptionError {
                    message: format!("stored request: {}", e),
                })
            })
    }

    fn is_executed(&self, from_chain_id: u64, tx_hash: &[u8]) -> Result<bool, RelayError> {
        let Ok(from_chain) = ChainId::from_u64(from_chain_id) else {
            return Ok(false);
        };
        Ok(self
            .kv
            .exists(&KeyPrefix::executed_key(&from_chain, tx_hash))?)
    }
}

fn chain_id_u64(chain: &ChainId) -> Result<u64, RelayError> {
    chain.to_u64().map_err(|source| {
        RelayError::from(CodecError::InvalidField {
            field: "chainId",
            source,
        })
    })
}

fn decode_counter(bytes: &[u8]) -> Result<u64, RelayError> {
    <[u8; 8]>::try_from(bytes)
        .map(u64::from_le_bytes)
        .map_err(|_| {
            RelayError::from(KVStoreError::CorruptionError {
                message: format!("request counter is {} bytes, expected 8", bytes.len()),
            })
        })
}
