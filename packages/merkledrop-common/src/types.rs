use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// Lifecycle of a merkledrop, derived lazily from the block height except for
/// `Closed`, which is stored.
#[cw_serde]
pub enum DropStatus {
    Pending,
    Active,
    Expired,
    Closed,
}

impl DropStatus {
    pub fn at_height(start_height: u64, end_height: u64, closed: bool, height: u64) -> Self {
        if closed {
            DropStatus::Closed
        } else if height < start_height {
            DropStatus::Pending
        } else if height <= end_height {
            DropStatus::Active
        } else {
            DropStatus::Expired
        }
    }
}

/// A single recipient committed into the tree.
#[cw_serde]
pub struct Leaf {
    pub index: u64,
    pub address: String,
    pub amount: Uint128,
}

/// One entry of the proof file handed to recipients.
/// `proof` is the exact hex sibling list submitted with a claim.
#[cw_serde]
pub struct ClaimEntry {
    pub index: u64,
    pub amount: Uint128,
    pub proof: Vec<String>,
}

/// Raw `address -> amount` input list as written by a creator.
///
/// Keeps every entry in document order, duplicates included, so the
/// normalizer can merge them instead of the JSON reader silently keeping the
/// last one. Amounts may be decimal strings or JSON integers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAccountList(pub Vec<(String, String)>);

struct RawAmount(String);

impl<'de> Deserialize<'de> for RawAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl<'de> Visitor<'de> for AmountVisitor {
            type Value = RawAmount;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an amount as a decimal string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RawAmount, E> {
                Ok(RawAmount(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawAmount, E> {
                Ok(RawAmount(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawAmount, E> {
                Ok(RawAmount(v.to_string()))
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<RawAmount, E> {
                Ok(RawAmount(v.to_string()))
            }

            // JSON integers past u64::MAX arrive here already rounded.
            fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawAmount, E> {
                Err(E::custom(format!(
                    "amount {v} is not a u64 integer; write larger amounts as decimal strings"
                )))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

impl<'de> Deserialize<'de> for RawAccountList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ListVisitor;

        impl<'de> Visitor<'de> for ListVisitor {
            type Value = RawAccountList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of address to amount")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawAccountList, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((address, amount)) = map.next_entry::<String, RawAmount>()? {
                    entries.push((address, amount.0));
                }
                Ok(RawAccountList(entries))
            }
        }

        deserializer.deserialize_map(ListVisitor)
    }
}
