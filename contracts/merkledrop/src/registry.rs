//! Distribution registry: the only code that writes `MERKLEDROPS`,
//! `CLAIMED_BITS` and `DROPS_BY_CREATOR`.
//!
//! Each function is one read-modify-write against a single drop. The bitmap
//! word and the drop's `remaining_amount` are always saved together, so the
//! two never disagree once the message commits.

use cosmwasm_std::{Addr, StdResult, Storage, Uint128};

use crate::error::ContractError;
use crate::state::{Merkledrop, CLAIMED_BITS, DROPS_BY_CREATOR, MERKLEDROPS, NEXT_DROP_ID};

pub const FIRST_DROP_ID: u64 = 1;

pub struct NewDrop {
    pub merkle_root: String,
    pub leaf_count: u64,
    pub denom: String,
    pub total_amount: Uint128,
    pub start_height: u64,
    pub end_height: u64,
    pub creator: Addr,
    pub created_at_height: u64,
}

/// Persist a new drop with its full amount remaining and an empty bitmap.
pub fn create(storage: &mut dyn Storage, new: NewDrop) -> Result<Merkledrop, ContractError> {
    if new.total_amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }
    if new.end_height < new.start_height {
        return Err(ContractError::InvalidHeights {
            start_height: new.start_height,
            end_height: new.end_height,
        });
    }

    let id = NEXT_DROP_ID
        .may_load(storage)?
        .unwrap_or(FIRST_DROP_ID);
    NEXT_DROP_ID.save(storage, &(id + 1))?;

    let drop = Merkledrop {
        id,
        merkle_root: new.merkle_root,
        leaf_count: new.leaf_count,
        denom: new.denom,
        total_amount: new.total_amount,
        remaining_amount: new.total_amount,
        start_height: new.start_height,
        end_height: new.end_height,
        creator: new.creator,
        closed: false,
        created_at_height: new.created_at_height,
    };
    MERKLEDROPS.save(storage, id, &drop)?;
    DROPS_BY_CREATOR.save(storage, (&drop.creator, id), &())?;

    Ok(drop)
}

pub fn load(storage: &dyn Storage, drop_id: u64) -> Result<Merkledrop, ContractError> {
    MERKLEDROPS
        .may_load(storage, drop_id)?
        .ok_or(ContractError::DropNotFound { drop_id })
}

fn bit_position(index: u64) -> (u64, u64) {
    (index / 64, 1u64 << (index % 64))
}

pub fn is_claimed(storage: &dyn Storage, drop_id: u64, index: u64) -> StdResult<bool> {
    let (word, mask) = bit_position(index);
    let bits = CLAIMED_BITS
        .may_load(storage, (drop_id, word))?
        .unwrap_or(0);
    Ok(bits & mask != 0)
}

/// Set the claimed bit for `index` and take `amount` off the remaining balance.
///
/// `InsufficientRemaining` means the bitmap and balances are inconsistent;
/// callers must surface it, never retry it.
pub fn mark_claimed(
    storage: &mut dyn Storage,
    drop_id: u64,
    index: u64,
    amount: Uint128,
) -> Result<Merkledrop, ContractError> {
    let mut drop = load(storage, drop_id)?;

    let (word, mask) = bit_position(index);
    let bits = CLAIMED_BITS
        .may_load(storage, (drop_id, word))?
        .unwrap_or(0);
    if bits & mask != 0 {
        return Err(ContractError::AlreadyClaimed { drop_id, index });
    }

    let remaining = drop.remaining_amount;
    drop.remaining_amount =
        remaining
            .checked_sub(amount)
            .map_err(|_| ContractError::InsufficientRemaining {
                drop_id,
                amount,
                remaining,
            })?;

    CLAIMED_BITS.save(storage, (drop_id, word), &(bits | mask))?;
    MERKLEDROPS.save(storage, drop_id, &drop)?;

    Ok(drop)
}

/// Close a drop and release whatever remains. Idempotent: closing an already
/// closed drop releases nothing.
pub fn close(storage: &mut dyn Storage, drop_id: u64) -> Result<Uint128, ContractError> {
    let mut drop = load(storage, drop_id)?;
    if drop.closed {
        return Ok(Uint128::zero());
    }

    let released = drop.remaining_amount;
    drop.remaining_amount = Uint128::zero();
    drop.closed = true;
    MERKLEDROPS.save(storage, drop_id, &drop)?;

    Ok(released)
}
