use anchor_lang::{prelude::*, solana_program::keccak};

use crate::{error::CodecError, message::Message};

/// Domain separator for internal nodes.
pub const NODE_PREFIX: u8 = 0x01;

/// The only proof layout this codec produces and accepts.
pub const MERKLE_PROOF_TYPE: u8 = 3;

/// Deep enough for 2^32 leaves.
pub const MAX_PROOF_DEPTH: usize = 32;

/// Sibling path from a leaf up to the root.
///
/// Pairs are hashed commutatively, so the path carries no left/right bits.
#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct Proof {
    pub proof_type: u8,
    pub siblings: Vec<[u8; 32]>,
}

impl Proof {
    pub fn new(siblings: Vec<[u8; 32]>) -> Self {
        Self {
            proof_type: MERKLE_PROOF_TYPE,
            siblings,
        }
    }

    /// Recomputes the root committed to by `leaf` and this path.
    pub fn compute_root(&self, leaf: &[u8; 32]) -> std::result::Result<[u8; 32], CodecError> {
        if self.siblings.len() > MAX_PROOF_DEPTH {
            return Err(CodecError::MalformedProof);
        }
        if self.proof_type != MERKLE_PROOF_TYPE {
            return Err(CodecError::InvalidProofType);
        }

        Ok(self
            .siblings
            .iter()
            .fold(*leaf, |node, sibling| hash_pair(&node, sibling)))
    }
}

/// Returns `true` iff `proof` rebuilds `root` from `leaf`. Malformed proofs
/// never verify.
pub fn verify_proof(proof: &Proof, leaf: &[u8; 32], root: &[u8; 32]) -> bool {
    matches!(proof.compute_root(leaf), Ok(computed) if computed == *root)
}

pub fn hash_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let (left, right) = if a <= b { (a, b) } else { (b, a) };
    keccak::hashv(&[&[NODE_PREFIX], left, right]).0
}

/// A fully materialized tree over a sorted, duplicate-free leaf set. Kept by
/// the batch builder to hand out proofs after the root is committed.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    layers: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    pub fn build(mut leaves: Vec<[u8; 32]>) -> std::result::Result<Self, CodecError> {
        if leaves.is_empty() {
            return Err(CodecError::EmptyBatch);
        }

        leaves.sort_unstable();
        if leaves.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(CodecError::DuplicateLeaf);
        }

        let mut layers = Vec::new();
        let mut level = leaves;
        while level.len() > 1 {
            // An unpaired trailing node is carried up unchanged.
            let next = level
                .chunks(2)
                .map(|chunk| match chunk.get(1) {
                    Some(right) => hash_pair(&chunk[0], right),
                    None => chunk[0],
                })
                .collect();
            layers.push(std::mem::replace(&mut level, next));
        }
        layers.push(level);

        Ok(Self { layers })
    }

    pub fn root(&self) -> [u8; 32] {
        self.layers
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or_default()
    }

    pub fn leaves(&self) -> &[[u8; 32]] {
        self.layers.first().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn generate_proof(&self, leaf: &[u8; 32]) -> std::result::Result<Proof, CodecError> {
        let mut index = self
            .leaves()
            .binary_search(leaf)
            .map_err(|_| CodecError::UnknownLeaf)?;

        let mut siblings = Vec::with_capacity(self.layers.len().saturating_sub(1));
        for level in &self.layers[..self.layers.len() - 1] {
            if let Some(sibling) = level.get(index ^ 1) {
                siblings.push(*sibling);
            }
            index /= 2;
        }

        Ok(Proof::new(siblings))
    }
}

/// Hashes every message into a leaf and builds the tree over them.
pub fn build_root(messages: &[Message]) -> std::result::Result<([u8; 32], MerkleTree), CodecError> {
    let tree = MerkleTree::build(messages.iter().map(Message::leaf_hash).collect())?;
    Ok((tree.root(), tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MsgEntry;

    fn leaf(i: u8) -> [u8; 32] {
        keccak::hash(&[i]).0
    }

    fn message(value: u64) -> Message {
        Message {
            entries: vec![MsgEntry {
                operation_id: [1u8; 32],
                destination: Pubkey::new_from_array([2u8; 32]),
                value,
                body: vec![],
                payload_number: 0,
                needs_value_unlock: false,
            }],
            valid_executors: vec![],
            executor_fee_token: None,
            executor_fee_value: 0,
        }
    }

    #[test]
    fn every_leaf_proves_against_root() {
        for size in 1..=9u8 {
            let leaves: Vec<_> = (0..size).map(leaf).collect();
            let tree = MerkleTree::build(leaves.clone()).unwrap();
            let root = tree.root();

            for l in &leaves {
                let proof = tree.generate_proof(l).unwrap();
                assert!(verify_proof(&proof, l, &root), "size {size}");
            }
        }
    }

    #[test]
    fn single_leaf_root_is_the_leaf() {
        let tree = MerkleTree::build(vec![leaf(0)]).unwrap();

        assert_eq!(tree.root(), leaf(0));
        assert!(tree.generate_proof(&leaf(0)).unwrap().siblings.is_empty());
    }

    #[test]
    fn root_is_independent_of_input_order() {
        let forward = MerkleTree::build((0..5).map(leaf).collect()).unwrap();
        let backward = MerkleTree::build((0..5).rev().map(leaf).collect()).unwrap();

        assert_eq!(forward.root(), backward.root());
    }

    #[test]
    fn single_bit_mutations_fail() {
        let leaves: Vec<_> = (0..6).map(leaf).collect();
        let tree = MerkleTree::build(leaves.clone()).unwrap();
        let root = tree.root();
        let proof = tree.generate_proof(&leaves[3]).unwrap();

        let mut mutated_leaf = leaves[3];
        mutated_leaf[31] ^= 1;
        assert!(!verify_proof(&proof, &mutated_leaf, &root));

        for i in 0..proof.siblings.len() {
            let mut mutated = proof.clone();
            mutated.siblings[i][0] ^= 0x80;
            assert!(!verify_proof(&mutated, &leaves[3], &root));
        }
    }

    #[test]
    fn leaf_outside_batch_does_not_verify() {
        let tree = MerkleTree::build((0..4).map(leaf).collect()).unwrap();
        let proof = tree.generate_proof(&leaf(1)).unwrap();

        assert!(!verify_proof(&proof, &leaf(42), &tree.root()));
        assert!(matches!(
            tree.generate_proof(&leaf(42)),
            Err(CodecError::UnknownLeaf)
        ));
    }

    #[test]
    fn duplicate_leaves_are_rejected() {
        let result = MerkleTree::build(vec![leaf(1), leaf(2), leaf(1)]);
        assert!(matches!(result, Err(CodecError::DuplicateLeaf)));

        let result = build_root(&[message(5), message(5)]);
        assert!(matches!(result, Err(CodecError::DuplicateLeaf)));
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert!(matches!(
            MerkleTree::build(vec![]),
            Err(CodecError::EmptyBatch)
        ));
    }

    #[test]
    fn malformed_and_mistyped_proofs_are_distinguished() {
        let too_deep = Proof::new(vec![[0u8; 32]; MAX_PROOF_DEPTH + 1]);
        assert!(matches!(
            too_deep.compute_root(&leaf(0)),
            Err(CodecError::MalformedProof)
        ));

        let mut wrong_type = Proof::new(vec![leaf(1)]);
        wrong_type.proof_type = 1;
        assert!(matches!(
            wrong_type.compute_root(&leaf(0)),
            Err(CodecError::InvalidProofType)
        ));
        assert!(!verify_proof(&wrong_type, &leaf(0), &hash_pair(&leaf(0), &leaf(1))));
    }

    #[test]
    fn build_root_hashes_messages() {
        let messages = [message(1), message(2), message(3)];
        let (root, tree) = build_root(&messages).unwrap();

        let leaf = messages[1].leaf_hash();
        let proof = tree.generate_proof(&leaf).unwrap();
        assert!(verify_proof(&proof, &leaf, &root));
    }
}
