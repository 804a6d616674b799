//! # Epoch Rotation Flows
//!
//! Keeper rotation chained across several epochs, and delivery of messages
//! whose headers predate the current epoch through a signed anchor header.

#[cfg(test)]
mod tests {
    use xcr_03_bookkeeper::Transition;
    use xcr_04_cross_chain_manager::test_utils::*;
    use xcr_04_cross_chain_manager::{
        CrossChainManagerApi, PolicyViolation, RelayError, RelayEvent, VerificationFailure,
    };

    /// Rotate `fixture` from `current` to `next` at `height`.
    fn rotate(
        fixture: &mut Fixture,
        current: &KeeperCommittee,
        next: &KeeperCommittee,
        height: u32,
    ) -> Result<Transition, RelayError> {
        let raw = rotation_header(height, next);
        let sigs = current.sign_quorum(&raw);
        fixture
            .manager
            .rotate_book_keeper(&raw, &next.raw_key_list(), &sigs)
    }

    #[test]
    fn test_chained_rotations_hand_over_authority() {
        let mut fixture = Fixture::genesised();
        let committees = [
            fixture.committee.clone(),
            KeeperCommittee::new(7, 2),
            KeeperCommittee::new(1, 3),
            KeeperCommittee::new(10, 4),
        ];

        for (step, pair) in committees.windows(2).enumerate() {
            let height = 100 * (step as u32 + 1);
            assert_eq!(
                rotate(&mut fixture, &pair[0], &pair[1], height).unwrap(),
                Transition::Rotation
            );
            assert_eq!(fixture.manager.current_epoch_height().unwrap(), Some(height));
            assert_eq!(fixture.manager.book_keepers().unwrap().len(), pair[1].len());
        }

        // The retired committee can no longer rotate.
        let err = rotate(&mut fixture, &committees[2], &KeeperCommittee::new(4, 5), 900)
            .unwrap_err();
        assert!(matches!(
            err,
            RelayError::Verification(VerificationFailure::QuorumNotMet {
                required: 7,
                keepers: 10
            })
        ));

        let rotations = fixture
            .events
            .events()
            .into_iter()
            .filter(|e| matches!(e, RelayEvent::BookKeeperChanged { .. }))
            .count();
        assert_eq!(rotations, 3);
    }

    #[test]
    fn test_rotation_rejects_height_regression() {
        let mut fixture = Fixture::genesised();
        let next = KeeperCommittee::new(4, 2);
        let current = fixture.committee.clone();
        rotate(&mut fixture, &current, &next, 50).unwrap();

        let err = rotate(&mut fixture, &next, &KeeperCommittee::new(4, 3), 49).unwrap_err();
        assert_eq!(
            err,
            RelayError::Policy(PolicyViolation::HeightRegression {
                height: 49,
                current: 50
            })
        );
    }

    #[test]
    fn test_rotation_with_mismatched_keys_rejected() {
        let mut fixture = Fixture::genesised();
        let committed = KeeperCommittee::new(4, 2);
        let offered = KeeperCommittee::new(4, 3);
        let raw = rotation_header(10, &committed);
        let sigs = fixture.committee.sign_quorum(&raw);

        let err = fixture
            .manager
            .rotate_book_keeper(&raw, &offered.raw_key_list(), &sigs)
            .unwrap_err();
        assert!(matches!(
            err,
            RelayError::Verification(VerificationFailure::KeeperHashMismatch { .. })
        ));
        assert_eq!(fixture.manager.current_epoch_height().unwrap(), Some(0));
    }

    #[test]
    fn test_empty_key_list_rejected_at_genesis() {
        let mut fixture = Fixture::new();
        let raw = raw_header(&HeaderFields::default());
        let err = fixture.manager.rotate_book_keeper(&raw, &[], &[]).unwrap_err();
        assert_eq!(err.class(), "decode");
        assert!(!fixture.manager.is_genesised().unwrap());
    }

    #[test]
    fn test_historical_message_delivered_through_anchor() {
        let mut fixture = Fixture::genesised();
        let first = fixture.committee.clone();

        // Messages committed in epoch 0, at heights 10 and 11.
        let early = fixture.local_message(0x21, b"early");
        let later = fixture.local_message(0x22, b"later");
        let block_10 = commit_messages(10, std::slice::from_ref(&early));
        let block_11 = commit_messages(11, std::slice::from_ref(&later));

        let second = KeeperCommittee::new(4, 2);
        rotate(&mut fixture, &first, &second, 40).unwrap();

        let (anchor, header_proofs) =
            anchor_for(45, &[&block_10.raw_header, &block_11.raw_header]);
        let sigs = second.sign_quorum(&anchor);

        fixture
            .manager
            .submit(
                &block_11.proofs[0],
                &block_11.raw_header,
                &header_proofs[1],
                &anchor,
                &sigs,
            )
            .unwrap();
        fixture
            .manager
            .submit(
                &block_10.proofs[0],
                &block_10.raw_header,
                &header_proofs[0],
                &anchor,
                &sigs,
            )
            .unwrap();

        let args: Vec<_> = fixture.handler.calls().into_iter().map(|c| c.args).collect();
        assert_eq!(args, vec![b"later".to_vec(), b"early".to_vec()]);
    }

    #[test]
    fn test_anchor_proof_for_wrong_header_rejected() {
        let mut fixture = Fixture::genesised();
        let first = fixture.committee.clone();
        let value = fixture.local_message(0x21, b"early");
        let block_10 = commit_messages(10, std::slice::from_ref(&value));
        let block_12 = commit_messages(12, &[fixture.local_message(0x23, b"x")]);

        let second = KeeperCommittee::new(4, 2);
        rotate(&mut fixture, &first, &second, 40).unwrap();

        let (anchor, header_proofs) =
            anchor_for(45, &[&block_10.raw_header, &block_12.raw_header]);
        let sigs = second.sign_quorum(&anchor);

        let err = fixture
            .manager
            .submit(
                &block_10.proofs[0],
                &block_10.raw_header,
                &header_proofs[1],
                &anchor,
                &sigs,
            )
            .unwrap_err();
        assert_eq!(
            err,
            RelayError::Verification(VerificationFailure::AnchorCommitment)
        );
        assert_eq!(fixture.handler.call_count(), 0);
    }

    #[test]
    fn test_current_epoch_header_ignores_anchor_arguments() {
        let mut fixture = Fixture::genesised();
        let value = fixture.local_message(0x31, b"now");
        let block = commit_messages(3, std::slice::from_ref(&value));
        let sigs = fixture.committee.sign_quorum(&block.raw_header);

        fixture
            .manager
            .submit(&block.proofs[0], &block.raw_header, b"junk", b"junk", &sigs)
            .unwrap();
        assert_eq!(fixture.handler.call_count(), 1);
    }

    #[test]
    fn test_rotation_to_freshly_generated_committee() {
        let mut fixture = Fixture::genesised();
        let current = fixture.committee.clone();
        let fresh = KeeperCommittee::random(5);
        rotate(&mut fixture, &current, &fresh, 7).unwrap();

        let expected: Vec<_> = (0..fresh.len())
            .map(|i| *fresh.key(i).verifying_key())
            .collect();
        assert_eq!(fixture.manager.book_keepers().unwrap(), expected);

        let value = fixture.local_message(0x55, b"fresh");
        let block = commit_messages(8, std::slice::from_ref(&value));
        let sigs = fresh.sign(&block.raw_header, &[0, 2, 3, 4]);
        fixture
            .manager
            .submit(&block.proofs[0], &block.raw_header, &[], &[], &sigs)
            .unwrap();
    }
}
