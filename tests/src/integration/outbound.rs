//! # Outbound Registration Flows
//!
//! Requests registered by local contracts are persisted in the canonical
//! envelope format a relayer reads back.

#[cfg(test)]
mod tests {
    use shared_types::{sha256, ChainId, Hash20, Hash32};
    use xcr_01_codec::{decode_outbound, ToMerkleValue};
    use xcr_04_cross_chain_manager::test_utils::*;
    use xcr_04_cross_chain_manager::{
        CrossChainManagerApi, InvocationContext, KeyPrefix, KeyValueStore, RelayEvent,
    };

    fn caller() -> Hash20 {
        Hash20([0x42; 20])
    }

    #[test]
    fn test_stored_envelope_is_canonical() {
        let mut fixture = Fixture::new();
        let ctx = InvocationContext::new(caller(), Hash32([0x07; 32]));
        let key = fixture
            .manager
            .register_outbound(&ctx, 6, &[0xD0; 20], b"mint", b"\x01\x02\x03")
            .unwrap();

        let raw = fixture.manager.kv().get(&key).unwrap().unwrap();
        let param = decode_outbound(&raw).unwrap();
        assert_eq!(param.to_chain_id, ChainId::from_u64(6).unwrap());
        assert_eq!(param.to_contract, vec![0xD0; 20]);
        assert_eq!(param.method, b"mint".to_vec());
        assert_eq!(param.args, vec![1, 2, 3]);

        let mut preimage = fixture.manager.config().manager_address.to_vec();
        preimage.extend_from_slice(&[0x07; 32]);
        assert_eq!(param.cross_chain_id, sha256(&preimage).to_vec());
    }

    #[test]
    fn test_counters_are_per_destination() {
        let mut fixture = Fixture::new();
        let mut keys = Vec::new();
        for (i, target) in [2u64, 2, 6, 2, 6].into_iter().enumerate() {
            let ctx = InvocationContext::new(caller(), Hash32([i as u8; 32]));
            keys.push(
                fixture
                    .manager
                    .register_outbound(&ctx, target, &[1; 20], b"m", b"")
                    .unwrap(),
            );
        }
        let two = ChainId::from_u64(2).unwrap();
        let six = ChainId::from_u64(6).unwrap();
        assert_eq!(
            keys,
            vec![
                KeyPrefix::request_key(&two, 0),
                KeyPrefix::request_key(&two, 1),
                KeyPrefix::request_key(&six, 0),
                KeyPrefix::request_key(&two, 2),
                KeyPrefix::request_key(&six, 1),
            ]
        );
        assert_eq!(
            fixture
                .manager
                .kv()
                .get(&KeyPrefix::request_id_key(&two))
                .unwrap(),
            Some(3u64.to_le_bytes().to_vec())
        );
    }

    #[test]
    fn test_lock_events_follow_registration_order() {
        let mut fixture = Fixture::new();
        for i in 0..3u8 {
            let ctx = InvocationContext::new(caller(), Hash32([i; 32]));
            fixture
                .manager
                .register_outbound(&ctx, 2, &[1; 20], b"m", &[i])
                .unwrap();
        }
        let payloads: Vec<_> = fixture
            .events
            .events()
            .into_iter()
            .filter_map(|event| match event {
                RelayEvent::CrossChainLock { payload, .. } => Some(payload),
                _ => None,
            })
            .collect();
        assert_eq!(payloads, vec![vec![0], vec![1], vec![2]]);
    }

    /// A request registered here, wrapped by the relay chain and delivered to
    /// a second manager configured as the destination.
    #[test]
    fn test_outbound_request_round_trips_to_destination() {
        let mut source = Fixture::new();
        let ctx = InvocationContext::new(caller(), Hash32([0x99; 32]));
        let key = source
            .manager
            .register_outbound(&ctx, 88, HANDLER_ADDRESS.as_bytes(), b"unlock", b"42")
            .unwrap();
        let param = decode_outbound(&source.manager.kv().get(&key).unwrap().unwrap()).unwrap();

        let mut destination = Fixture::genesised();
        let value = ToMerkleValue::wrap(
            vec![0xEE; 32],
            ChainId::from_u64(SOURCE_CHAIN_ID).unwrap(),
            param,
        );
        let block = commit_messages(4, std::slice::from_ref(&value));
        let sigs = destination.committee.sign_quorum(&block.raw_header);
        destination
            .manager
            .submit(&block.proofs[0], &block.raw_header, &[], &[], &sigs)
            .unwrap();

        let calls = destination.handler.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].from_contract, caller().to_vec());
        assert_eq!(calls[0].args, b"42".to_vec());
    }
}
