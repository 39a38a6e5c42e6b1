use std::collections::BTreeMap;

use cosmwasm_std::Uint128;

use crate::merkle::MerkleTree;
use crate::normalize::{normalize, NormalizeError};
use crate::types::ClaimEntry;

/// Everything a creator needs after building a drop: the values for the
/// `Create` message and the per-recipient proof file.
#[derive(Debug, Clone, PartialEq)]
pub struct DropList {
    pub merkle_root: String,
    pub leaf_count: u64,
    pub total_amount: Uint128,
    pub claims: BTreeMap<String, ClaimEntry>,
}

/// Normalize raw entries, build the tree and collect one proof per recipient.
pub fn build_drop_list<I, A, S>(entries: I) -> Result<DropList, NormalizeError>
where
    I: IntoIterator<Item = (A, S)>,
    A: AsRef<str>,
    S: AsRef<str>,
{
    let list = normalize(entries)?;
    let tree = MerkleTree::from_leaves(&list.leaves).ok_or(NormalizeError::EmptyList)?;

    let claims = list
        .leaves
        .iter()
        .map(|leaf| {
            let entry = ClaimEntry {
                index: leaf.index,
                amount: leaf.amount,
                proof: tree.proof_hex(leaf.index).unwrap_or_default(),
            };
            (leaf.address.clone(), entry)
        })
        .collect();

    Ok(DropList {
        merkle_root: tree.root_hex(),
        leaf_count: tree.leaf_count(),
        total_amount: list.total_amount,
        claims,
    })
}
