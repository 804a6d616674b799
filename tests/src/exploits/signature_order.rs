//! # Signature Ordering Attacks
//!
//! Quorum forgery attempts against the ordered threshold check: duplicated
//! slots, shuffled slots, signatures by outsiders and malformed bytes.

#[cfg(test)]
mod tests {
    use xcr_04_cross_chain_manager::test_utils::*;
    use xcr_04_cross_chain_manager::{CrossChainManagerApi, RelayError, VerificationFailure};

    fn signed_block(fixture: &Fixture) -> CommittedBatch {
        let value = fixture.local_message(0x01, b"drain");
        commit_messages(2, std::slice::from_ref(&value))
    }

    fn attempt(fixture: &mut Fixture, block: &CommittedBatch, sigs: &[u8]) -> Result<(), RelayError> {
        fixture
            .manager
            .submit(&block.proofs[0], &block.raw_header, &[], &[], sigs)
            .map(|_| ())
    }

    fn assert_quorum_failure(result: Result<(), RelayError>) {
        assert!(
            matches!(
                result,
                Err(RelayError::Verification(VerificationFailure::QuorumNotMet { .. }))
            ),
            "expected quorum failure, got {:?}",
            result
        );
    }

    #[test]
    fn test_one_keeper_signing_three_times() {
        let mut fixture = Fixture::genesised();
        let block = signed_block(&fixture);
        let sigs = fixture.committee.sign(&block.raw_header, &[0, 0, 0]);
        assert_quorum_failure(attempt(&mut fixture, &block, &sigs));
        assert_eq!(fixture.handler.call_count(), 0);
    }

    #[test]
    fn test_reversed_quorum() {
        let mut fixture = Fixture::genesised();
        let block = signed_block(&fixture);
        let sigs = fixture.committee.sign(&block.raw_header, &[3, 2, 1]);
        assert_quorum_failure(attempt(&mut fixture, &block, &sigs));
    }

    #[test]
    fn test_later_keepers_in_order_pass() {
        let mut fixture = Fixture::genesised();
        let block = signed_block(&fixture);
        let sigs = fixture.committee.sign(&block.raw_header, &[1, 2, 3]);
        attempt(&mut fixture, &block, &sigs).unwrap();
    }

    #[test]
    fn test_outsider_fills_missing_slot() {
        let mut fixture = Fixture::genesised();
        let block = signed_block(&fixture);
        let outsider = KeeperCommittee::new(1, 9);
        let mut sigs = fixture.committee.sign(&block.raw_header, &[0, 1]);
        sigs.extend(outsider.sign(&block.raw_header, &[0]));
        assert_quorum_failure(attempt(&mut fixture, &block, &sigs));
    }

    #[test]
    fn test_garbage_slots_do_not_count() {
        let mut fixture = Fixture::genesised();
        let block = signed_block(&fixture);
        let mut sigs = fixture.committee.sign(&block.raw_header, &[0, 1]);
        sigs.extend([0xFF; 65]);
        sigs.extend([0x00; 65]);
        assert_quorum_failure(attempt(&mut fixture, &block, &sigs));
    }

    /// A malformed slot holds its position: later valid slots cannot be
    /// shifted forward to cover it.
    #[test]
    fn test_garbage_slot_blocks_later_signatures() {
        let mut fixture = Fixture::genesised();
        let block = signed_block(&fixture);
        let mut sigs = fixture.committee.sign(&block.raw_header, &[0]);
        sigs.extend([0x00; 65]);
        sigs.extend(fixture.committee.sign(&block.raw_header, &[1, 2]));
        assert_quorum_failure(attempt(&mut fixture, &block, &sigs));
    }

    #[test]
    fn test_signatures_over_another_header() {
        let mut fixture = Fixture::genesised();
        let block = signed_block(&fixture);
        let other = commit_messages(3, &[fixture.local_message(0x77, b"benign")]);
        let sigs = fixture.committee.sign_quorum(&other.raw_header);
        assert_quorum_failure(attempt(&mut fixture, &block, &sigs));
    }

    #[test]
    fn test_empty_blob() {
        let mut fixture = Fixture::genesised();
        let block = signed_block(&fixture);
        assert_quorum_failure(attempt(&mut fixture, &block, &[]));
    }
}
