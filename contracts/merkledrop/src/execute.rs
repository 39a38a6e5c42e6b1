use cosmwasm_std::{BankMsg, Coin, DepsMut, Env, Event, MessageInfo, Response};
use merkledrop_common::merkle::{decode_hash, verify_claim};

use crate::error::ContractError;
use crate::ledger::{EscrowHandle, Ledger};
use crate::msg::{ClaimParams, CreateParams, UpdateConfigParams};
use crate::registry::{self, NewDrop};
use crate::state::CONFIG;

/// Validate optional config values shared by instantiate and update_config.
pub fn validate_max_duration(max_duration_blocks: Option<u64>) -> Result<(), ContractError> {
    if max_duration_blocks == Some(0) {
        return Err(ContractError::InvalidConfig {
            reason: "max_duration_blocks must be positive".to_string(),
        });
    }
    Ok(())
}

/// A zero-amount fee is the same as no fee.
pub fn normalize_fee(fee: Option<Coin>) -> Option<Coin> {
    fee.filter(|f| !f.amount.is_zero())
}

fn validate_denom(denom: &str) -> Result<(), ContractError> {
    if denom.is_empty() || denom.chars().any(char::is_whitespace) {
        return Err(ContractError::InvalidDenom {
            denom: denom.to_string(),
        });
    }
    Ok(())
}

/// Create a merkledrop, escrowing `total_amount` from the sender.
pub fn create(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    ledger: &impl Ledger,
    params: CreateParams,
) -> Result<Response, ContractError> {
    let CreateParams {
        merkle_root,
        leaf_count,
        total_amount,
        denom,
        start_height,
        end_height,
    } = params;

    let config = CONFIG.load(deps.storage)?;

    let root = decode_hash(&merkle_root).ok_or(ContractError::InvalidMerkleRoot)?;
    if leaf_count == 0 {
        return Err(ContractError::InvalidLeafCount);
    }
    if total_amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }
    validate_denom(&denom)?;

    let height = env.block.height;
    let start_height = if start_height == 0 {
        height
    } else {
        start_height
    };
    if start_height < height {
        return Err(ContractError::StartHeightInPast {
            start_height,
            height,
        });
    }
    if end_height < start_height {
        return Err(ContractError::InvalidHeights {
            start_height,
            end_height,
        });
    }
    if let Some(max) = config.max_duration_blocks {
        let duration = end_height - start_height;
        if duration > max {
            return Err(ContractError::DurationTooLong { duration, max });
        }
    }

    let escrow = ledger.escrow(
        &info.funds,
        total_amount,
        &denom,
        config.creation_fee.as_ref(),
    )?;

    let drop = registry::create(
        deps.storage,
        NewDrop {
            merkle_root: hex::encode(root),
            leaf_count,
            denom: escrow.denom,
            total_amount: escrow.amount,
            start_height,
            end_height,
            creator: info.sender.clone(),
            created_at_height: height,
        },
    )?;

    let mut response = Response::new();
    if let Some(fee) = &config.creation_fee {
        response = response.add_message(BankMsg::Send {
            to_address: config.fee_collector.to_string(),
            amount: vec![fee.clone()],
        });
    }

    Ok(response
        .add_attribute("action", "create")
        .add_attribute("drop_id", drop.id.to_string())
        .add_attribute("creator", info.sender.to_string())
        .add_event(
            Event::new("merkledrop_created")
                .add_attribute("drop_id", drop.id.to_string())
                .add_attribute("merkle_root", drop.merkle_root.clone())
                .add_attribute("leaf_count", drop.leaf_count.to_string())
                .add_attribute("total_amount", drop.total_amount.to_string())
                .add_attribute("denom", drop.denom.clone())
                .add_attribute("start_height", drop.start_height.to_string())
                .add_attribute("end_height", drop.end_height.to_string()),
        ))
}

/// Claim the sender's allocation.
///
/// Order of checks: drop exists and is open, height is inside the window,
/// index not yet claimed, proof verifies for `(index, sender, amount)`. The
/// bitmap is written before the payout message is emitted, so a replayed
/// claim hits `AlreadyClaimed` whether or not its proof is valid.
pub fn claim(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    ledger: &impl Ledger,
    params: ClaimParams,
) -> Result<Response, ContractError> {
    let ClaimParams {
        drop_id,
        index,
        amount,
        proof,
    } = params;

    let drop = registry::load(deps.storage, drop_id)?;
    if drop.closed {
        return Err(ContractError::DropClosed { drop_id });
    }

    let height = env.block.height;
    if height < drop.start_height || height > drop.end_height {
        return Err(ContractError::NotActive {
            drop_id,
            start_height: drop.start_height,
            end_height: drop.end_height,
            height,
        });
    }

    if registry::is_claimed(deps.storage, drop_id, index)? {
        return Err(ContractError::AlreadyClaimed { drop_id, index });
    }

    if amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }

    if !verify_claim(
        &drop.merkle_root,
        drop.leaf_count,
        index,
        info.sender.as_str(),
        amount.u128(),
        &proof,
    ) {
        return Err(ContractError::InvalidProof);
    }

    let handle = EscrowHandle::held_by(&drop);
    let drop = match registry::mark_claimed(deps.storage, drop_id, index, amount) {
        Ok(drop) => drop,
        Err(err @ ContractError::InsufficientRemaining { .. }) => {
            deps.api.debug(&format!("merkledrop integrity violation: {err}"));
            return Err(err);
        }
        Err(err) => return Err(err),
    };

    let payout = ledger.payout(&handle, &info.sender, amount)?;

    Ok(Response::new()
        .add_messages(payout)
        .add_attribute("action", "claim")
        .add_attribute("drop_id", drop_id.to_string())
        .add_attribute("index", index.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("merkledrop_claimed")
                .add_attribute("drop_id", drop_id.to_string())
                .add_attribute("index", index.to_string())
                .add_attribute("recipient", info.sender.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("denom", drop.denom.clone())
                .add_attribute("remaining_amount", drop.remaining_amount.to_string())
                .add_attribute("height", height.to_string()),
        ))
}

/// Return the unclaimed remainder to the creator and close the drop.
/// Creator only, after `end_height`.
pub fn withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    ledger: &impl Ledger,
    drop_id: u64,
) -> Result<Response, ContractError> {
    let drop = registry::load(deps.storage, drop_id)?;
    if drop.closed {
        return Err(ContractError::DropClosed { drop_id });
    }

    if info.sender != drop.creator {
        return Err(ContractError::Unauthorized {
            reason: "only the creator can withdraw".to_string(),
        });
    }

    let height = env.block.height;
    if height <= drop.end_height {
        return Err(ContractError::NotExpiredYet {
            drop_id,
            end_height: drop.end_height,
            height,
        });
    }

    let handle = EscrowHandle::held_by(&drop);
    let released = registry::close(deps.storage, drop_id)?;
    let payout = ledger.payout(&handle, &drop.creator, released)?;

    Ok(Response::new()
        .add_messages(payout)
        .add_attribute("action", "withdraw")
        .add_attribute("drop_id", drop_id.to_string())
        .add_attribute("amount", released.to_string())
        .add_event(
            Event::new("merkledrop_withdrawn")
                .add_attribute("drop_id", drop_id.to_string())
                .add_attribute("creator", drop.creator.to_string())
                .add_attribute("amount", released.to_string())
                .add_attribute("denom", drop.denom)
                .add_attribute("claimed_amount", (drop.total_amount - released).to_string())
                .add_attribute("height", height.to_string()),
        ))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    params: UpdateConfigParams,
) -> Result<Response, ContractError> {
    let UpdateConfigParams {
        admin,
        creation_fee,
        clear_creation_fee,
        fee_collector,
        max_duration_blocks,
    } = params;

    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }

    if let Some(admin) = admin {
        config.admin = deps.api.addr_validate(&admin)?;
    }
    if clear_creation_fee.unwrap_or(false) {
        config.creation_fee = None;
    } else if creation_fee.is_some() {
        config.creation_fee = normalize_fee(creation_fee);
    }
    if let Some(collector) = fee_collector {
        config.fee_collector = deps.api.addr_validate(&collector)?;
    }
    if max_duration_blocks.is_some() {
        validate_max_duration(max_duration_blocks)?;
        config.max_duration_blocks = max_duration_blocks;
    }

    CONFIG.save(deps.storage, &config)?;

    let fee = config
        .creation_fee
        .as_ref()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string());

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_event(
            Event::new("merkledrop_config_updated")
                .add_attribute("admin", config.admin.to_string())
                .add_attribute("fee_collector", config.fee_collector.to_string())
                .add_attribute("creation_fee", fee),
        ))
}
