use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use cosmwasm_std::coin;
use merkledrop::msg::ExecuteMsg;
use merkledrop_common::build_drop_list;
use tracing::info;

use crate::files::{read_account_list, render, write_json_atomic};

#[derive(clap::Args, Debug)]
pub struct Args {
    /// JSON object mapping address -> amount
    pub input: PathBuf,

    /// Where to write the per-recipient proof file
    pub output: PathBuf,

    /// Denom to distribute
    #[arg(long)]
    pub denom: String,

    /// First height at which claims are accepted (0 for immediately)
    #[arg(long, default_value_t = 0)]
    pub start_height: u64,

    /// Last height at which claims are accepted
    #[arg(long)]
    pub end_height: u64,
}

pub fn run(args: &Args) -> Result<String> {
    let denom = args.denom.trim();
    if denom.is_empty() {
        bail!("denom is required");
    }
    if args.start_height != 0 && args.end_height < args.start_height {
        bail!(
            "end height {} is before start height {}",
            args.end_height,
            args.start_height
        );
    }

    let accounts = read_account_list(&args.input)?;
    info!("Read {} entries from {}", accounts.0.len(), args.input.display());

    let list = build_drop_list(accounts.0).context("Could not create distribution list")?;
    info!(
        root = %list.merkle_root,
        leaves = list.leaf_count,
        total = %list.total_amount,
        "Built merkle tree"
    );

    write_json_atomic(&args.output, &list.claims)?;
    info!("Wrote proofs to {}", args.output.display());

    let msg = ExecuteMsg::Create {
        merkle_root: list.merkle_root.clone(),
        leaf_count: list.leaf_count,
        total_amount: list.total_amount,
        denom: denom.to_string(),
        start_height: args.start_height,
        end_height: args.end_height,
    };
    info!("Attach the contract's creation fee, if one is configured, on top of these funds");
    render(&msg, vec![coin(list.total_amount.u128(), denom)])
}
