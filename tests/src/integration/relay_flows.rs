//! # Inbound Relay Flows
//!
//! A keeper set is installed from a genesis header, a message committed under
//! that same header is proven and executed, and the replay guard holds.
//!
//! ## Flow Tested:
//!
//! 1. **Genesis**: `{k1..k4}` (m=3) installed from H0
//! 2. **Submit**: leaf proven under `H0.crossStatesRoot` with a 3-level path
//! 3. **Dispatch**: handler receives `(method, args, fromContract, fromChainId)`
//! 4. **Replay**: identical resubmission fails with `AlreadyProcessed`

#[cfg(test)]
mod tests {
    use crate::init_test_telemetry;
    use relay_telemetry::{encode_metrics, MESSAGES_DISPATCHED, REPLAYS_REJECTED};
    use shared_types::Hash32;
    use xcr_01_codec::{header_hash, Header};
    use xcr_02_merkle_prover::{parse_proof, MerkleTree};
    use xcr_04_cross_chain_manager::test_utils::*;
    use xcr_04_cross_chain_manager::{CrossChainManagerApi, RelayError, RelayEvent};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// Eight messages, the local one at index 4, committed under a genesis header.
    struct GenesisBatch {
        raw_header: Vec<u8>,
        tree: MerkleTree,
        target: usize,
    }

    fn genesis_batch(fixture: &Fixture) -> GenesisBatch {
        let mut values: Vec<_> = (0..8u8)
            .map(|i| inbound_value(0x10 + i, 7, &[0x01; 20], b"noop", &[i]))
            .collect();
        values[4] = fixture.local_message(0xAB, b"transfer 100");

        let tree = MerkleTree::new(values.iter().map(|v| v.encode()).collect()).unwrap();
        let raw_header = raw_header(&HeaderFields {
            height: 0,
            cross_states_root: tree.root(),
            block_root: Hash32::zero(),
            next_book_keeper: fixture.committee.commitment(),
        });
        GenesisBatch {
            raw_header,
            tree,
            target: 4,
        }
    }

    // =========================================================================
    // END-TO-END
    // =========================================================================

    #[test]
    fn test_genesis_submit_replay() {
        init_test_telemetry();
        let mut fixture = Fixture::new();
        let batch = genesis_batch(&fixture);

        // Genesis from H0 itself.
        fixture
            .manager
            .rotate_book_keeper(&batch.raw_header, &fixture.committee.raw_key_list(), &[])
            .unwrap();
        assert_eq!(fixture.manager.current_epoch_height().unwrap(), Some(0));

        let proof = batch.tree.proof(batch.target).unwrap();
        let (leaf, path) = parse_proof(&proof).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(leaf, fixture.local_message(0xAB, b"transfer 100").encode().as_slice());

        let sigs = fixture.committee.sign(&batch.raw_header, &[0, 1, 2]);
        let delivered = fixture
            .manager
            .submit(&proof, &batch.raw_header, &[], &[], &sigs)
            .unwrap();
        assert_eq!(delivered.tx_param.args, b"transfer 100".to_vec());

        let calls = fixture.handler.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, b"unlock".to_vec());
        assert_eq!(calls[0].args, b"transfer 100".to_vec());
        assert_eq!(calls[0].from_contract, vec![0x5A; 20]);
        assert_eq!(calls[0].from_chain_id, SOURCE_CHAIN_ID);
        assert!(fixture
            .manager
            .is_executed(SOURCE_CHAIN_ID, &[0xAB; 32])
            .unwrap());

        let err = fixture
            .manager
            .submit(&proof, &batch.raw_header, &[], &[], &sigs)
            .unwrap_err();
        assert!(matches!(err, RelayError::AlreadyProcessed { .. }));
        assert_eq!(fixture.handler.call_count(), 1);

        let events = fixture.events.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], RelayEvent::BookKeeperChanged { height: 0, .. }));
        assert!(matches!(events[1], RelayEvent::CrossChainUnlock { .. }));
    }

    #[test]
    fn test_messages_for_other_chains_are_not_dispatched() {
        let mut fixture = Fixture::new();
        let batch = genesis_batch(&fixture);
        fixture
            .manager
            .rotate_book_keeper(&batch.raw_header, &fixture.committee.raw_key_list(), &[])
            .unwrap();
        let sigs = fixture.committee.sign_quorum(&batch.raw_header);

        for index in [0usize, 1, 2, 3, 5, 6, 7] {
            let proof = batch.tree.proof(index).unwrap();
            let err = fixture
                .manager
                .submit(&proof, &batch.raw_header, &[], &[], &sigs)
                .unwrap_err();
            assert_eq!(err.class(), "policy", "leaf {}", index);
        }
        assert_eq!(fixture.handler.call_count(), 0);
    }

    #[test]
    fn test_every_message_in_a_block_executes_once() {
        let mut fixture = Fixture::genesised();
        let values: Vec<_> = (0..5u8)
            .map(|i| fixture.local_message(0x60 + i, &[i]))
            .collect();
        let batch = commit_messages(3, &values);
        let sigs = fixture.committee.sign_quorum(&batch.raw_header);

        for proof in batch.proofs.iter().rev() {
            fixture
                .manager
                .submit(proof, &batch.raw_header, &[], &[], &sigs)
                .unwrap();
        }
        assert_eq!(fixture.handler.call_count(), 5);
        for value in &values {
            assert!(fixture
                .manager
                .is_executed(SOURCE_CHAIN_ID, &value.tx_hash)
                .unwrap());
        }
    }

    #[test]
    fn test_dispatch_and_replay_are_counted() {
        init_test_telemetry();
        let mut fixture = Fixture::genesised();
        let value = fixture.local_message(0x77, b"counted");
        let batch = commit_messages(1, std::slice::from_ref(&value));
        let sigs = fixture.committee.sign_quorum(&batch.raw_header);

        // Counters are process-wide and other tests bump them concurrently.
        let dispatched = MESSAGES_DISPATCHED.get();
        let replays = REPLAYS_REJECTED.get();

        fixture
            .manager
            .submit(&batch.proofs[0], &batch.raw_header, &[], &[], &sigs)
            .unwrap();
        let _ = fixture
            .manager
            .submit(&batch.proofs[0], &batch.raw_header, &[], &[], &sigs);

        assert!(MESSAGES_DISPATCHED.get() >= dispatched + 1.0);
        assert!(REPLAYS_REJECTED.get() >= replays + 1.0);

        let exported = encode_metrics().unwrap();
        assert!(exported.contains("xcr_inbound_messages_dispatched_total"));
        assert!(exported.contains("xcr_inbound_replays_rejected_total"));
    }

    #[test]
    fn test_header_hash_is_what_keepers_sign() {
        let fixture = Fixture::new();
        let batch = genesis_batch(&fixture);
        let header = Header::decode(&batch.raw_header).unwrap();
        assert_eq!(header.encode(), batch.raw_header);
        assert_eq!(
            header_hash(&batch.raw_header),
            shared_types::hash256(&batch.raw_header)
        );
    }
}
