#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::ledger::BankLedger;
use crate::msg::{
    ClaimParams, CreateParams, ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg,
    UpdateConfigParams,
};
use crate::query;
use crate::registry::FIRST_DROP_ID;
use crate::state::{Config, CONFIG, NEXT_DROP_ID};

const CONTRACT_NAME: &str = "crates.io:merkledrop";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    execute::validate_max_duration(msg.max_duration_blocks)?;

    let admin = match msg.admin {
        Some(admin) => deps.api.addr_validate(&admin)?,
        None => info.sender.clone(),
    };
    let fee_collector = match msg.fee_collector {
        Some(collector) => deps.api.addr_validate(&collector)?,
        None => admin.clone(),
    };

    let config = Config {
        admin: admin.clone(),
        creation_fee: execute::normalize_fee(msg.creation_fee),
        fee_collector,
        max_duration_blocks: msg.max_duration_blocks,
    };
    CONFIG.save(deps.storage, &config)?;
    NEXT_DROP_ID.save(deps.storage, &FIRST_DROP_ID)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "merkledrop")
        .add_attribute("admin", admin.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Create {
            merkle_root,
            leaf_count,
            total_amount,
            denom,
            start_height,
            end_height,
        } => execute::create(
            deps,
            env,
            info,
            &BankLedger,
            CreateParams {
                merkle_root,
                leaf_count,
                total_amount,
                denom,
                start_height,
                end_height,
            },
        ),
        ExecuteMsg::Claim {
            drop_id,
            index,
            amount,
            proof,
        } => execute::claim(
            deps,
            env,
            info,
            &BankLedger,
            ClaimParams {
                drop_id,
                index,
                amount,
                proof,
            },
        ),
        ExecuteMsg::Withdraw { drop_id } => {
            execute::withdraw(deps, env, info, &BankLedger, drop_id)
        }
        ExecuteMsg::UpdateConfig {
            admin,
            creation_fee,
            clear_creation_fee,
            fee_collector,
            max_duration_blocks,
        } => execute::update_config(
            deps,
            env,
            info,
            UpdateConfigParams {
                admin,
                creation_fee,
                clear_creation_fee,
                fee_collector,
                max_duration_blocks,
            },
        ),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Merkledrop { drop_id } => query::query_merkledrop(deps, drop_id),
        QueryMsg::Status { drop_id } => query::query_status(deps, env, drop_id),
        QueryMsg::IsClaimed { drop_id, index } => query::query_is_claimed(deps, drop_id, index),
        QueryMsg::Merkledrops { start_after, limit } => {
            query::query_merkledrops(deps, start_after, limit)
        }
        QueryMsg::MerkledropsByCreator {
            creator,
            start_after,
            limit,
        } => query::query_merkledrops_by_creator(deps, creator, start_after, limit),
        QueryMsg::VerifyClaim {
            drop_id,
            index,
            address,
            amount,
            proof,
        } => query::query_verify_claim(deps, drop_id, index, address, amount, proof),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
