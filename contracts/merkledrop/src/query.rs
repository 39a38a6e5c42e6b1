use cosmwasm_std::{to_json_binary, Binary, Deps, Env, Order, StdResult, Uint128};
use cw_storage_plus::Bound;
use merkledrop_common::merkle::verify_claim;
use merkledrop_common::types::DropStatus;

use crate::msg::{IsClaimedResponse, MerkledropsResponse, StatusResponse};
use crate::registry;
use crate::state::{CONFIG, DROPS_BY_CREATOR, MERKLEDROPS};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_merkledrop(deps: Deps, drop_id: u64) -> StdResult<Binary> {
    let drop = MERKLEDROPS.load(deps.storage, drop_id)?;
    to_json_binary(&drop)
}

pub fn query_status(deps: Deps, env: Env, drop_id: u64) -> StdResult<Binary> {
    let drop = MERKLEDROPS.load(deps.storage, drop_id)?;
    let height = env.block.height;
    to_json_binary(&StatusResponse {
        drop_id,
        status: DropStatus::at_height(drop.start_height, drop.end_height, drop.closed, height),
        height,
        remaining_amount: drop.remaining_amount,
    })
}

pub fn query_is_claimed(deps: Deps, drop_id: u64, index: u64) -> StdResult<Binary> {
    // Unknown drops are an error, not "unclaimed"
    MERKLEDROPS.load(deps.storage, drop_id)?;
    let is_claimed = registry::is_claimed(deps.storage, drop_id, index)?;
    to_json_binary(&IsClaimedResponse {
        drop_id,
        index,
        is_claimed,
    })
}

pub fn query_merkledrops(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let merkledrops = MERKLEDROPS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|r| r.map(|(_, drop)| drop))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&MerkledropsResponse { merkledrops })
}

pub fn query_merkledrops_by_creator(
    deps: Deps,
    creator: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let creator = deps.api.addr_validate(&creator)?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let merkledrops = DROPS_BY_CREATOR
        .prefix(&creator)
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|r| r.and_then(|drop_id| MERKLEDROPS.load(deps.storage, drop_id)))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&MerkledropsResponse { merkledrops })
}

pub fn query_verify_claim(
    deps: Deps,
    drop_id: u64,
    index: u64,
    address: String,
    amount: Uint128,
    proof: Vec<String>,
) -> StdResult<Binary> {
    let drop = MERKLEDROPS.load(deps.storage, drop_id)?;
    let valid = verify_claim(
        &drop.merkle_root,
        drop.leaf_count,
        index,
        &address,
        amount.u128(),
        &proof,
    );
    to_json_binary(&valid)
}
