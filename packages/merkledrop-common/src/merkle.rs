//! Binary Merkle tree over merkledrop leaves.
//!
//! Leaf:  `sha256( 0x00 || index_u64_be || address_len_u32_be || address_bytes || amount_u128_be )`
//! Node:  `sha256( 0x01 || left || right )`, children in position order (never sorted).
//!
//! A level with an odd number of nodes promotes its last node unchanged to the
//! next level. The promoted node has no sibling at that level, so its proof
//! skips the level. Builder and verifier share this rule, which is why the
//! verifier needs the leaf count the tree was built from.

use sha2::{Digest, Sha256};

use crate::types::Leaf;

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

/// Compute the leaf hash for a recipient entry.
///
/// Every field has a fixed width or an explicit length prefix, so no two
/// distinct `(index, address, amount)` tuples share an encoding.
pub fn compute_leaf_hash(index: u64, address: &str, amount: u128) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(index.to_be_bytes());
    hasher.update((address.len() as u32).to_be_bytes());
    hasher.update(address.as_bytes());
    hasher.update(amount.to_be_bytes());
    hasher.finalize().into()
}

/// Hash two child nodes into their parent, left child first.
pub fn hash_nodes(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([NODE_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    /// Levels bottom-up. `layers[0]` holds the leaf hashes, the last layer the root.
    layers: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    /// Build a tree from canonical leaves. Returns `None` for an empty set.
    ///
    /// Leaves must already be in index order (as produced by
    /// [`crate::normalize::normalize`]); position `i` is hashed with index `i`.
    pub fn from_leaves(leaves: &[Leaf]) -> Option<Self> {
        let hashes = leaves
            .iter()
            .map(|leaf| compute_leaf_hash(leaf.index, &leaf.address, leaf.amount.u128()))
            .collect();
        Self::from_hashes(hashes)
    }

    /// Build a tree from pre-hashed leaves. Returns `None` for an empty set.
    pub fn from_hashes(hashes: Vec<[u8; 32]>) -> Option<Self> {
        if hashes.is_empty() {
            return None;
        }

        let mut layers = vec![hashes];
        loop {
            let prev = &layers[layers.len() - 1];
            if prev.len() == 1 {
                break;
            }
            let next: Vec<[u8; 32]> = prev
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_nodes(left, right),
                    // Odd one out is promoted.
                    _ => pair[0],
                })
                .collect();
            layers.push(next);
        }

        Some(Self { layers })
    }

    pub fn root(&self) -> [u8; 32] {
        self.layers[self.layers.len() - 1][0]
    }

    pub fn root_hex(&self) -> String {
        hex::encode(self.root())
    }

    pub fn leaf_count(&self) -> u64 {
        self.layers[0].len() as u64
    }

    /// Sibling hashes from the leaf level up to (excluding) the root.
    /// Returns `None` if `index` is outside the leaf set.
    pub fn proof(&self, index: u64) -> Option<Vec<[u8; 32]>> {
        if index >= self.leaf_count() {
            return None;
        }

        let mut siblings = Vec::with_capacity(self.layers.len() - 1);
        let mut idx = index as usize;
        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling = idx ^ 1;
            // No sibling: this node was promoted.
            if sibling < layer.len() {
                siblings.push(layer[sibling]);
            }
            idx /= 2;
        }

        Some(siblings)
    }

    /// Hex-encoded proof, in the form recipients submit with a claim.
    pub fn proof_hex(&self, index: u64) -> Option<Vec<String>> {
        self.proof(index)
            .map(|siblings| siblings.iter().map(hex::encode).collect())
    }
}

/// Number of proof elements a leaf at `index` must present in a tree of
/// `leaf_count` leaves, or `None` if the index is out of range.
pub fn proof_length(leaf_count: u64, index: u64) -> Option<usize> {
    if index >= leaf_count {
        return None;
    }
    let mut width = leaf_count;
    let mut idx = index;
    let mut len = 0;
    while width > 1 {
        if idx ^ 1 < width {
            len += 1;
        }
        idx >>= 1;
        width = width.div_ceil(2);
    }
    Some(len)
}

/// Fold `proof` into `leaf_hash` along the path of `index` and compare with `root`.
///
/// Bit `k` of `index` decides whether the level-`k` sibling sits on the left
/// (bit set) or right (bit clear). Fails closed on an out-of-range index and on
/// a proof that is shorter or longer than the path implied by `leaf_count`.
pub fn verify_proof(
    root: &[u8; 32],
    leaf_count: u64,
    index: u64,
    leaf_hash: &[u8; 32],
    proof: &[[u8; 32]],
) -> bool {
    if index >= leaf_count {
        return false;
    }

    let mut current = *leaf_hash;
    let mut siblings = proof.iter();
    let mut width = leaf_count;
    let mut idx = index;

    while width > 1 {
        if idx ^ 1 < width {
            let sibling = match siblings.next() {
                Some(s) => s,
                None => return false,
            };
            current = if idx & 1 == 1 {
                hash_nodes(sibling, &current)
            } else {
                hash_nodes(&current, sibling)
            };
        }
        idx >>= 1;
        width = width.div_ceil(2);
    }

    siblings.next().is_none() && current == *root
}

/// Verify a Merkle proof against a known root, all hashes hex-encoded.
///
/// Returns false on malformed hex or hashes that are not 32 bytes.
pub fn verify_merkle_proof(
    root_hex: &str,
    leaf_count: u64,
    index: u64,
    proof_hex: &[String],
    leaf_hash: &[u8; 32],
) -> bool {
    let Some(root) = decode_hash(root_hex) else {
        return false;
    };

    let mut proof = Vec::with_capacity(proof_hex.len());
    for sibling_hex in proof_hex {
        match decode_hash(sibling_hex) {
            Some(sibling) => proof.push(sibling),
            None => return false,
        }
    }

    verify_proof(&root, leaf_count, index, leaf_hash, &proof)
}

/// Check that `(index, address, amount)` is committed under `root_hex`.
pub fn verify_claim(
    root_hex: &str,
    leaf_count: u64,
    index: u64,
    address: &str,
    amount: u128,
    proof_hex: &[String],
) -> bool {
    let leaf_hash = compute_leaf_hash(index, address, amount);
    verify_merkle_proof(root_hex, leaf_count, index, proof_hex, &leaf_hash)
}

/// Decode a 64-char hex string into a 32-byte hash.
pub fn decode_hash(hex_str: &str) -> Option<[u8; 32]> {
    let mut out = [0u8; 32];
    hex::decode_to_slice(hex_str, &mut out).ok()?;
    Some(out)
}
