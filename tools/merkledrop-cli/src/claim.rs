use anyhow::{bail, Result};
use cosmwasm_std::Uint128;
use merkledrop::msg::ExecuteMsg;
use merkledrop_common::merkle::decode_hash;
use tracing::debug;

use crate::files::render;

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Merkledrop id
    pub drop_id: u64,

    /// Comma-separated sibling hashes, leaf to root
    #[arg(long, value_delimiter = ',')]
    pub proofs: Vec<String>,

    /// Amount allocated to the claimer
    #[arg(long)]
    pub amount: u128,

    /// Leaf index of the claimer
    #[arg(long)]
    pub index: u64,
}

pub fn run(args: &Args) -> Result<String> {
    if args.amount == 0 {
        bail!("amount must be positive");
    }

    let mut proof = Vec::with_capacity(args.proofs.len());
    for (i, hash) in args.proofs.iter().enumerate() {
        let hash = hash.trim();
        // An empty --proofs "" is a single-leaf tree
        if hash.is_empty() && args.proofs.len() == 1 {
            break;
        }
        match decode_hash(hash) {
            Some(bytes) => proof.push(hex::encode(bytes)),
            None => bail!("proof element {} is not a 32-byte hex hash: {:?}", i, hash),
        }
    }
    debug!(drop_id = args.drop_id, index = args.index, len = proof.len(), "claim proof");

    render(
        &ExecuteMsg::Claim {
            drop_id: args.drop_id,
            index: args.index,
            amount: Uint128::new(args.amount),
            proof,
        },
        vec![],
    )
}
