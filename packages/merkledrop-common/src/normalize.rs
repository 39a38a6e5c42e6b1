use std::collections::BTreeMap;
use std::str::FromStr;

use bech32::Bech32;
use cosmwasm_std::Uint128;
use thiserror::Error;

use crate::types::Leaf;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("recipient list is empty")]
    EmptyList,

    #[error("invalid address: {address:?}")]
    InvalidAddress { address: String },

    #[error("invalid amount {amount:?} for {address}")]
    InvalidAmount { address: String, amount: String },

    #[error("amount for {address} must be positive")]
    ZeroAmount { address: String },

    #[error("amount overflow while merging {address}")]
    AmountOverflow { address: String },
}

/// Canonical leaf set: sorted by address, duplicates merged, indices assigned
/// by position.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedList {
    pub leaves: Vec<Leaf>,
    pub total_amount: Uint128,
}

/// Decode a bech32 address and re-encode it in lowercase.
///
/// Uppercase and lowercase spellings of one account map to the same string,
/// which is also the form the chain reports as the message sender.
pub fn canonical_address(raw: &str) -> Result<String, NormalizeError> {
    let invalid = || NormalizeError::InvalidAddress {
        address: raw.to_string(),
    };
    let (hrp, data) = bech32::decode(raw.trim()).map_err(|_| invalid())?;
    if data.is_empty() {
        return Err(invalid());
    }
    bech32::encode::<Bech32>(hrp, &data).map_err(|_| invalid())
}

/// Turn raw `(address, amount)` entries into the canonical leaf set.
///
/// Addresses are canonicalized first, then duplicates are summed. Ordering is
/// byte-lexicographic over the canonical address, so the same input always
/// yields the same indices no matter how it was ordered or cased. The whole
/// batch is rejected on the first bad entry.
pub fn normalize<I, A, S>(entries: I) -> Result<NormalizedList, NormalizeError>
where
    I: IntoIterator<Item = (A, S)>,
    A: AsRef<str>,
    S: AsRef<str>,
{
    let mut merged: BTreeMap<String, Uint128> = BTreeMap::new();

    for (address, amount) in entries {
        let address = canonical_address(address.as_ref())?;

        let raw = amount.as_ref().trim();
        let parsed = Uint128::from_str(raw).map_err(|_| NormalizeError::InvalidAmount {
            address: address.clone(),
            amount: raw.to_string(),
        })?;

        let slot = merged.entry(address.clone()).or_default();
        *slot = slot
            .checked_add(parsed)
            .map_err(|_| NormalizeError::AmountOverflow { address })?;
    }

    if merged.is_empty() {
        return Err(NormalizeError::EmptyList);
    }

    let mut total_amount = Uint128::zero();
    let mut leaves = Vec::with_capacity(merged.len());
    for (index, (address, amount)) in merged.into_iter().enumerate() {
        if amount.is_zero() {
            return Err(NormalizeError::ZeroAmount { address });
        }
        total_amount = total_amount
            .checked_add(amount)
            .map_err(|_| NormalizeError::AmountOverflow {
                address: address.clone(),
            })?;
        leaves.push(Leaf {
            index: index as u64,
            address,
            amount,
        });
    }

    Ok(NormalizedList {
        leaves,
        total_amount,
    })
}
