//! Escrow and payout against the chain's bank module.
//!
//! The contract never touches balances directly: funds enter with the
//! `Create` message and leave as `BankMsg::Send`. The bank messages run after
//! the contract's own writes within the same transaction, so a failed
//! transfer reverts the claim or withdrawal that requested it.

use cosmwasm_std::{coin, Addr, BankMsg, Coin, CosmosMsg, Uint128};

use crate::error::ContractError;
use crate::state::Merkledrop;

/// Funds locked for one drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscrowHandle {
    pub denom: String,
    pub amount: Uint128,
}

impl EscrowHandle {
    /// What a stored drop still holds in escrow.
    pub fn held_by(drop: &Merkledrop) -> Self {
        EscrowHandle {
            denom: drop.denom.clone(),
            amount: drop.remaining_amount,
        }
    }
}

pub trait Ledger {
    /// Check that `funds` lock exactly `amount` of `denom`, plus `fee` when
    /// one is charged, and nothing else.
    fn escrow(
        &self,
        funds: &[Coin],
        amount: Uint128,
        denom: &str,
        fee: Option<&Coin>,
    ) -> Result<EscrowHandle, ContractError>;

    /// Transfer out of an escrow. `Ok(None)` when there is nothing to send;
    /// `EscrowExceeded` when `amount` is more than the handle holds.
    fn payout(
        &self,
        handle: &EscrowHandle,
        recipient: &Addr,
        amount: Uint128,
    ) -> Result<Option<CosmosMsg>, ContractError>;
}

pub struct BankLedger;

impl Ledger for BankLedger {
    fn escrow(
        &self,
        funds: &[Coin],
        amount: Uint128,
        denom: &str,
        fee: Option<&Coin>,
    ) -> Result<EscrowHandle, ContractError> {
        let mut expected = vec![coin(amount.u128(), denom)];
        if let Some(fee) = fee.filter(|f| !f.amount.is_zero()) {
            match expected.iter_mut().find(|c| c.denom == fee.denom) {
                Some(c) => c.amount += fee.amount,
                None => expected.push(fee.clone()),
            }
        }

        let matches = funds.len() == expected.len()
            && expected.iter().all(|want| {
                funds
                    .iter()
                    .any(|sent| sent.denom == want.denom && sent.amount == want.amount)
            });
        if !matches {
            let expected = expected
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(",");
            return Err(ContractError::InvalidFunds { expected });
        }

        Ok(EscrowHandle {
            denom: denom.to_string(),
            amount,
        })
    }

    fn payout(
        &self,
        handle: &EscrowHandle,
        recipient: &Addr,
        amount: Uint128,
    ) -> Result<Option<CosmosMsg>, ContractError> {
        if amount > handle.amount {
            return Err(ContractError::EscrowExceeded {
                amount,
                available: handle.amount,
            });
        }
        if amount.is_zero() {
            return Ok(None);
        }
        Ok(Some(
            BankMsg::Send {
                to_address: recipient.to_string(),
                amount: vec![coin(amount.u128(), &handle.denom)],
            }
            .into(),
        ))
    }
}
