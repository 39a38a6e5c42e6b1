use anyhow::Result;
use merkledrop::msg::ExecuteMsg;

use crate::files::render;

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Merkledrop id
    pub drop_id: u64,
}

pub fn run(args: &Args) -> Result<String> {
    render(
        &ExecuteMsg::Withdraw {
            drop_id: args.drop_id,
        },
        vec![],
    )
}
