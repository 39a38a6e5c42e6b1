use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Coin, Uint128};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<Config> = Item::new("config");
pub const NEXT_DROP_ID: Item<u64> = Item::new("next_drop_id");
pub const MERKLEDROPS: Map<u64, Merkledrop> = Map::new("merkledrops");

/// Claimed-index bitmap: `(drop_id, index / 64) -> word`, bit `index % 64`.
/// Words are written on first use only.
pub const CLAIMED_BITS: Map<(u64, u64), u64> = Map::new("claimed_bits");

/// Creator index for listing a creator's drops.
pub const DROPS_BY_CREATOR: Map<(&Addr, u64), ()> = Map::new("drops_by_creator");

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    /// Charged on top of the escrow at creation and forwarded to `fee_collector`.
    pub creation_fee: Option<Coin>,
    pub fee_collector: Addr,
    /// Upper bound on `end_height - start_height`. `None` means unbounded.
    pub max_duration_blocks: Option<u64>,
}

#[cw_serde]
pub struct Merkledrop {
    pub id: u64,
    /// sha256 root, hex-encoded
    pub merkle_root: String,
    /// Number of leaves the root was built over; fixes every proof's length.
    pub leaf_count: u64,
    pub denom: String,
    pub total_amount: Uint128,
    pub remaining_amount: Uint128,
    pub start_height: u64,
    pub end_height: u64,
    pub creator: Addr,
    pub closed: bool,
    pub created_at_height: u64,
}
