pub mod merkle;
pub mod normalize;
pub mod proofs;
pub mod types;

pub use merkle::{compute_leaf_hash, verify_claim, verify_merkle_proof, MerkleTree};
pub use normalize::{canonical_address, normalize, NormalizeError, NormalizedList};
pub use proofs::{build_drop_list, DropList};
pub use types::{ClaimEntry, DropStatus, Leaf, RawAccountList};
