use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use merkledrop_common::{canonical_address, verify_claim};
use tracing::debug;

use crate::files::read_proof_file;

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Proof file written by `create`
    pub proof_file: PathBuf,

    /// Recipient address to check
    pub address: String,

    /// Expected merkle root, hex-encoded
    #[arg(long)]
    pub root: String,

    /// Leaf count of the tree (defaults to the number of entries in the file)
    #[arg(long)]
    pub leaf_count: Option<u64>,
}

pub fn run(args: &Args) -> Result<String> {
    let proofs = read_proof_file(&args.proof_file)?;
    let address = canonical_address(&args.address)?;
    let address = address.as_str();
    let entry = proofs
        .get(address)
        .with_context(|| format!("{} not found in {}", address, args.proof_file.display()))?;
    let leaf_count = args.leaf_count.unwrap_or(proofs.len() as u64);
    debug!(index = entry.index, leaf_count, "verifying proof");

    if !verify_claim(
        args.root.trim(),
        leaf_count,
        entry.index,
        address,
        entry.amount.u128(),
        &entry.proof,
    ) {
        bail!("proof for {} does not match root {}", address, args.root);
    }

    Ok(format!(
        "valid: address={} index={} amount={}",
        address, entry.index, entry.amount
    ))
}
