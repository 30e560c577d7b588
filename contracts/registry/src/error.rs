use cw_ownable::OwnershipError;
use cw_utils::PaymentError;
use thiserror::Error;

use cosmwasm_std::{Decimal, StdError, Uint128};

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("Fee sharing is disabled")]
    FeeShareDisabled {},

    #[error("This address is not allowed to execute this action")]
    Unauthorized {},

    #[error("Factory contracts can only be registered with themselves as withdrawer")]
    InvalidWithdrawer {},

    #[error("{0} is not a deployed contract")]
    NotAContract(String),

    #[error("Contract {0} is already registered")]
    AlreadyRegistered(String),

    #[error("Contract {0} is not registered")]
    NotRegistered(String),

    #[error("The new withdrawer is the same as the current one")]
    SameWithdrawer {},

    #[error("Developer shares must be between 0 and 1, got {0}")]
    InvalidShares(Decimal),

    #[error("Allowed denoms cannot contain blank entries")]
    EmptyDenom {},

    #[error("Insufficient pool balance for {denom}: needed {needed}, available {available}")]
    InsufficientPoolBalance {
        denom: String,
        needed: Uint128,
        available: Uint128,
    },
}
