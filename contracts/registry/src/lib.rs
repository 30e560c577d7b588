pub mod contract;
pub mod error;
pub mod payout;
pub mod resolver;
pub mod state;

#[cfg(test)]
mod tests;

pub use crate::error::ContractError;
