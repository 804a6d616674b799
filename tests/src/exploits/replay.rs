//! # Replay Attacks
//!
//! A relayer (or anyone watching the mempool) resubmits an executed message,
//! possibly wrapped in a different proof or header, hoping to execute it twice.

#[cfg(test)]
mod tests {
    use xcr_04_cross_chain_manager::test_utils::*;
    use xcr_04_cross_chain_manager::{CrossChainManagerApi, RelayError};

    #[test]
    fn test_identical_resubmission() {
        let mut fixture = Fixture::genesised();
        let value = fixture.local_message(0x01, b"withdraw");
        let block = commit_messages(2, std::slice::from_ref(&value));
        let sigs = fixture.committee.sign_quorum(&block.raw_header);

        fixture
            .manager
            .submit(&block.proofs[0], &block.raw_header, &[], &[], &sigs)
            .unwrap();
        for _ in 0..3 {
            let err = fixture
                .manager
                .submit(&block.proofs[0], &block.raw_header, &[], &[], &sigs)
                .unwrap_err();
            assert!(matches!(err, RelayError::AlreadyProcessed { .. }));
        }
        assert_eq!(fixture.handler.call_count(), 1);
    }

    /// The same message re-committed in a later block by a colluding source.
    #[test]
    fn test_same_message_in_a_later_block() {
        let mut fixture = Fixture::genesised();
        let value = fixture.local_message(0x02, b"withdraw");
        let first = commit_messages(2, std::slice::from_ref(&value));
        let second = commit_messages(
            9,
            &[fixture.local_message(0x50, b"filler"), value.clone()],
        );

        let sigs = fixture.committee.sign_quorum(&first.raw_header);
        fixture
            .manager
            .submit(&first.proofs[0], &first.raw_header, &[], &[], &sigs)
            .unwrap();

        let sigs = fixture.committee.sign_quorum(&second.raw_header);
        let err = fixture
            .manager
            .submit(&second.proofs[1], &second.raw_header, &[], &[], &sigs)
            .unwrap_err();
        assert!(matches!(err, RelayError::AlreadyProcessed { .. }));
        assert_eq!(fixture.handler.call_count(), 1);
    }

    /// Replay is reported ahead of destination and handler checks, so the
    /// rejection is stable even if the handler is later removed.
    #[test]
    fn test_replay_after_handler_removed() {
        let mut fixture = Fixture::genesised();
        let value = fixture.local_message(0x03, b"withdraw");
        let block = commit_messages(2, std::slice::from_ref(&value));
        let sigs = fixture.committee.sign_quorum(&block.raw_header);
        fixture
            .manager
            .submit(&block.proofs[0], &block.raw_header, &[], &[], &sigs)
            .unwrap();

        fixture.manager.handlers_mut().unregister(&HANDLER_ADDRESS);
        let err = fixture
            .manager
            .submit(&block.proofs[0], &block.raw_header, &[], &[], &sigs)
            .unwrap_err();
        assert!(matches!(err, RelayError::AlreadyProcessed { .. }));
    }

    /// A failed dispatch must not burn the message: once the handler
    /// recovers, exactly one execution succeeds.
    #[test]
    fn test_failed_dispatch_then_single_execution() {
        let mut fixture = Fixture::genesised();
        fixture.handler.set_mode(HandlerMode::Decline);
        let value = fixture.local_message(0x04, b"withdraw");
        let block = commit_messages(2, std::slice::from_ref(&value));
        let sigs = fixture.committee.sign_quorum(&block.raw_header);

        let err = fixture
            .manager
            .submit(&block.proofs[0], &block.raw_header, &[], &[], &sigs)
            .unwrap_err();
        assert!(err.is_retryable());

        fixture.handler.set_mode(HandlerMode::Accept);
        fixture
            .manager
            .submit(&block.proofs[0], &block.raw_header, &[], &[], &sigs)
            .unwrap();
        assert!(fixture
            .manager
            .submit(&block.proofs[0], &block.raw_header, &[], &[], &sigs)
            .is_err());
        assert_eq!(fixture.handler.call_count(), 2);
        assert_eq!(fixture.committed_deliveries(), 1);
    }

    /// The store rejects the commit after the handler has accepted. The
    /// handler's staged unlock is dropped with the guard, so resubmitting
    /// pays out once in total.
    #[test]
    fn test_commit_failure_cannot_double_unlock() {
        let mut fixture = Fixture::<FlakyKVStore>::flaky();
        let value = fixture.local_message(0x05, b"withdraw 100");
        let block = commit_messages(2, std::slice::from_ref(&value));
        let sigs = fixture.committee.sign_quorum(&block.raw_header);

        fixture.manager.kv_mut().set_fail_writes(true);
        let err = fixture
            .manager
            .submit(&block.proofs[0], &block.raw_header, &[], &[], &sigs)
            .unwrap_err();
        assert_eq!(err.class(), "storage");
        assert_eq!(fixture.committed_deliveries(), 0);

        fixture.manager.kv_mut().set_fail_writes(false);
        for _ in 0..3 {
            let _ = fixture
                .manager
                .submit(&block.proofs[0], &block.raw_header, &[], &[], &sigs);
        }
        assert_eq!(fixture.committed_deliveries(), 1);
        assert!(fixture
            .manager
            .is_executed(SOURCE_CHAIN_ID, &value.tx_hash)
            .unwrap());
    }
}
