pub mod contract;
pub mod error;
pub mod execute;
pub mod ledger;
pub mod msg;
pub mod query;
pub mod registry;
pub mod state;

pub use crate::error::ContractError;
