//! # Forged Proof Attacks
//!
//! A correctly signed header paired with a proof that does not actually
//! commit the offered message.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use xcr_02_merkle_prover::{encode_proof, hash_leaf, parse_proof, MerkleTree};
    use xcr_04_cross_chain_manager::test_utils::*;
    use xcr_04_cross_chain_manager::{
        CrossChainManagerApi, MalformedInput, RelayError, VerificationFailure,
    };

    fn four_message_block(fixture: &Fixture) -> (CommittedBatch, Vec<u8>) {
        let values: Vec<_> = (0..4u8)
            .map(|i| fixture.local_message(0x40 + i, &[i; 4]))
            .collect();
        let block = commit_messages(6, &values);
        let sigs = fixture.committee.sign_quorum(&block.raw_header);
        (block, sigs)
    }

    #[test]
    fn test_substituted_leaf_rejected() {
        let mut fixture = Fixture::genesised();
        let (block, sigs) = four_message_block(&fixture);
        let (_, path) = parse_proof(&block.proofs[0]).unwrap();
        let forged_leaf = fixture.local_message(0x40, b"mint 1000000").encode();
        let forged = encode_proof(&forged_leaf, &path);

        let err = fixture
            .manager
            .submit(&forged, &block.raw_header, &[], &[], &sigs)
            .unwrap_err();
        assert!(matches!(
            err,
            RelayError::Verification(VerificationFailure::MerkleRoot(_))
        ));
        assert_eq!(fixture.handler.call_count(), 0);
    }

    #[test]
    fn test_path_from_another_tree_rejected() {
        let mut fixture = Fixture::genesised();
        let (block, sigs) = four_message_block(&fixture);
        let attacker_tree = MerkleTree::new(vec![
            fixture.local_message(0x99, b"mint").encode(),
            b"padding".to_vec(),
        ])
        .unwrap();

        let err = fixture
            .manager
            .submit(&attacker_tree.proof(0).unwrap(), &block.raw_header, &[], &[], &sigs)
            .unwrap_err();
        assert_eq!(err.class(), "verification");
    }

    #[test]
    fn test_truncated_proof_is_malformed() {
        let mut fixture = Fixture::genesised();
        let (block, sigs) = four_message_block(&fixture);
        let mut proof = block.proofs[2].clone();
        proof.truncate(proof.len() - 5);

        let err = fixture
            .manager
            .submit(&proof, &block.raw_header, &[], &[], &sigs)
            .unwrap_err();
        assert!(matches!(err, RelayError::Decode(MalformedInput::Proof(_))));
    }

    /// The two hashes under an interior node, presented as a 64-byte leaf one
    /// level up. Domain-separated leaf hashing keeps it from verifying.
    #[test]
    fn test_interior_node_as_leaf_rejected() {
        let mut fixture = Fixture::genesised();
        let (block, sigs) = four_message_block(&fixture);
        let (leaf, path) = parse_proof(&block.proofs[0]).unwrap();
        let mut fake_leaf = hash_leaf(leaf).to_vec();
        fake_leaf.extend_from_slice(path[0].sibling.as_bytes());
        let forged = encode_proof(&fake_leaf, &path[1..]);

        let err = fixture
            .manager
            .submit(&forged, &block.raw_header, &[], &[], &sigs)
            .unwrap_err();
        assert!(matches!(
            err,
            RelayError::Verification(VerificationFailure::MerkleRoot(_))
        ));
        assert_eq!(fixture.handler.call_count(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Flipping any single bit of a valid proof never yields an execution.
        #[test]
        fn prop_bit_flip_never_executes(byte in 0usize..4096, bit in 0u8..8) {
            let mut fixture = Fixture::genesised();
            let (block, sigs) = four_message_block(&fixture);
            let mut proof = block.proofs[1].clone();
            let index = byte % proof.len();
            proof[index] ^= 1 << bit;

            let result = fixture
                .manager
                .submit(&proof, &block.raw_header, &[], &[], &sigs);
            // Flipping a side byte from 1 to 3 keeps it "right"; anything
            // else must fail.
            if result.is_ok() {
                let (_, original) = parse_proof(&block.proofs[1]).unwrap();
                prop_assert!(parse_proof(&proof)
                    .map(|(_, path)| path == original)
                    .unwrap_or(false));
            }
            prop_assert!(fixture.handler.call_count() <= 1);
        }
    }
}
