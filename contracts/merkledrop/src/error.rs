use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("merkledrop {drop_id} not found")]
    DropNotFound { drop_id: u64 },

    #[error("merkledrop {drop_id} is closed")]
    DropClosed { drop_id: u64 },

    #[error("merkledrop {drop_id} is not active at height {height} (window [{start_height}, {end_height}])")]
    NotActive {
        drop_id: u64,
        start_height: u64,
        end_height: u64,
        height: u64,
    },

    #[error("merkledrop {drop_id} has not expired yet (end height: {end_height}, height: {height})")]
    NotExpiredYet {
        drop_id: u64,
        end_height: u64,
        height: u64,
    },

    #[error("index {index} of merkledrop {drop_id} already claimed")]
    AlreadyClaimed { drop_id: u64, index: u64 },

    #[error("invalid merkle proof")]
    InvalidProof,

    /// Bitmap and remaining amount disagree. Never a user error.
    #[error("integrity violation on merkledrop {drop_id}: claim of {amount} exceeds remaining {remaining}")]
    InsufficientRemaining {
        drop_id: u64,
        amount: Uint128,
        remaining: Uint128,
    },

    #[error("payout of {amount} exceeds escrowed {available}")]
    EscrowExceeded {
        amount: Uint128,
        available: Uint128,
    },

    #[error("invalid merkle root: expected 64 hex chars")]
    InvalidMerkleRoot,

    #[error("leaf count must be positive")]
    InvalidLeafCount,

    #[error("amount must be positive")]
    ZeroAmount,

    #[error("invalid denom: {denom:?}")]
    InvalidDenom { denom: String },

    #[error("end height {end_height} is before start height {start_height}")]
    InvalidHeights { start_height: u64, end_height: u64 },

    #[error("start height {start_height} is in the past (current: {height})")]
    StartHeightInPast { start_height: u64, height: u64 },

    #[error("duration of {duration} blocks exceeds maximum of {max}")]
    DurationTooLong { duration: u64, max: u64 },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("must send exactly {expected}")]
    InvalidFunds { expected: String },
}
