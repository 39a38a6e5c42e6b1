use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Coin, Uint128};
use merkledrop_common::types::DropStatus;

use crate::state::{Config, Merkledrop};

#[cw_serde]
pub struct InstantiateMsg {
    /// Defaults to the instantiator.
    pub admin: Option<String>,
    pub creation_fee: Option<Coin>,
    /// Defaults to the admin.
    pub fee_collector: Option<String>,
    pub max_duration_blocks: Option<u64>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Create a merkledrop. Must be sent with exactly `total_amount` of
    /// `denom` (plus the creation fee, if configured).
    Create {
        /// sha256 root, hex-encoded
        merkle_root: String,
        /// Number of leaves in the tree
        leaf_count: u64,
        total_amount: Uint128,
        denom: String,
        /// 0 starts the drop at the current height
        start_height: u64,
        end_height: u64,
    },
    /// Claim the sender's allocation.
    Claim {
        drop_id: u64,
        index: u64,
        amount: Uint128,
        /// Sibling hashes leaf-to-root, hex-encoded
        proof: Vec<String>,
    },
    /// Return the unclaimed remainder of an expired drop to its creator.
    Withdraw { drop_id: u64 },
    /// Update configuration. Admin only.
    UpdateConfig {
        admin: Option<String>,
        creation_fee: Option<Coin>,
        /// Remove the creation fee. Takes precedence over `creation_fee`.
        clear_creation_fee: Option<bool>,
        fee_collector: Option<String>,
        max_duration_blocks: Option<u64>,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(Merkledrop)]
    Merkledrop { drop_id: u64 },
    #[returns(StatusResponse)]
    Status { drop_id: u64 },
    #[returns(IsClaimedResponse)]
    IsClaimed { drop_id: u64, index: u64 },
    #[returns(MerkledropsResponse)]
    Merkledrops {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(MerkledropsResponse)]
    MerkledropsByCreator {
        creator: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Check a proof against a drop's root without claiming.
    #[returns(bool)]
    VerifyClaim {
        drop_id: u64,
        index: u64,
        address: String,
        amount: Uint128,
        proof: Vec<String>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct StatusResponse {
    pub drop_id: u64,
    pub status: DropStatus,
    pub height: u64,
    pub remaining_amount: Uint128,
}

#[cw_serde]
pub struct IsClaimedResponse {
    pub drop_id: u64,
    pub index: u64,
    pub is_claimed: bool,
}

#[cw_serde]
pub struct MerkledropsResponse {
    pub merkledrops: Vec<Merkledrop>,
}

/// Parameters for `execute::create`.
pub struct CreateParams {
    pub merkle_root: String,
    pub leaf_count: u64,
    pub total_amount: Uint128,
    pub denom: String,
    pub start_height: u64,
    pub end_height: u64,
}

/// Parameters for `execute::claim`.
pub struct ClaimParams {
    pub drop_id: u64,
    pub index: u64,
    pub amount: Uint128,
    pub proof: Vec<String>,
}

/// Parameters for `execute::update_config`.
pub struct UpdateConfigParams {
    pub admin: Option<String>,
    pub creation_fee: Option<Coin>,
    pub clear_creation_fee: Option<bool>,
    pub fee_collector: Option<String>,
    pub max_duration_blocks: Option<u64>,
}
