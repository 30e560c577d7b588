use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Coin, Decimal};
use cw_ownable::cw_ownable_query;

/// Default nesting depth up to which authz wrappers are unwrapped when
/// discovering contract invocations in a transaction.
pub const DEFAULT_AUTHZ_UNWRAP_DEPTH: u32 = 8;

#[cw_serde]
pub struct InstantiateMsg {
    /// Governance authority: owns the contract and is the only account
    /// allowed to update the params.
    pub owner: String,
    /// The ante-pipeline hook account, the only caller of `ProcessFees`.
    pub fee_processor: String,
    pub params: Params,
    /// Overrides [`DEFAULT_AUTHZ_UNWRAP_DEPTH`] when set.
    pub authz_unwrap_depth: Option<u32>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Register a contract for fee sharing. The sender must be the contract's
    /// admin (or creator when no admin is set), except for factory-spawned
    /// contracts which anyone may register with the contract itself as
    /// withdrawer.
    Register {
        contract_address: String,
        /// Account that receives the contract's share of transaction fees.
        /// Omitting it registers the contract as not currently payable.
        withdrawer_address: Option<String>,
    },
    /// Change the withdrawer of an already registered contract. Rejected when
    /// the new withdrawer equals the stored one.
    UpdateWithdrawer {
        contract_address: String,
        withdrawer_address: String,
    },
    /// Remove a contract's registration entirely.
    Cancel { contract_address: String },
    /// Replace the module params. Only the owner can do this.
    UpdateParams { params: Params },
    /// Split the developer share of an already collected fee between the
    /// withdrawers of every registered contract invoked by the transaction.
    /// Only the fee processor can call this, once per transaction, after the
    /// fee has been deposited to this contract.
    ProcessFees {
        fee: Vec<Coin>,
        msgs: Vec<TxMessage>,
    },
    UpdateOwnership(cw_ownable::Action),
}

#[cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Gets the registration for a single contract
    #[returns(FeeShareResponse)]
    FeeShare { contract_address: String },
    /// Gets all registrations, key-ordered
    #[returns(FeeSharesResponse)]
    FeeShares {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Gets the contracts registered by a deployer
    #[returns(FeeShareContractsResponse)]
    DeployerFeeShares {
        deployer_address: String,
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Gets the contracts paying out to a withdrawer
    #[returns(FeeShareContractsResponse)]
    WithdrawerFeeShares {
        withdrawer_address: String,
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(Params)]
    Params {},
    #[returns(Config)]
    Config {},
}

/// A single contract registration.
#[cw_serde]
pub struct FeeShare {
    pub contract_address: Addr,
    /// The account that controls the registration: the contract's admin, its
    /// creator when no admin is set, or the contract itself for factory
    /// children.
    pub deployer_address: Addr,
    /// `None` means registered but not payable.
    pub withdrawer_address: Option<Addr>,
}

#[cw_serde]
pub struct Params {
    /// Master switch: when false, registrations and payouts are rejected and
    /// the whole fee stays in the pool.
    pub enabled: bool,
    /// Fraction of the collected fee paid out to withdrawers, in [0, 1].
    pub developer_shares: Decimal,
    /// Denoms eligible for payout. Empty means every denom is eligible.
    pub allowed_denoms: Vec<String>,
}

#[cw_serde]
pub struct Config {
    pub fee_processor: Addr,
    pub authz_unwrap_depth: u32,
}

/// Closed view over the transaction's messages, as far as payee discovery is
/// concerned. The ante hook maps every message kind it does not recognize to
/// `Other`, which is ignored rather than treated as a dispatch error.
#[cw_serde]
pub enum TxMessage {
    /// A contract execution with its canonical target contract.
    ExecuteContract { contract: String },
    /// An authz exec wrapper: a grantee executing messages approved by a
    /// granter. Contract executions may hide arbitrarily deep inside these.
    AuthzExec {
        grantee: String,
        msgs: Vec<TxMessage>,
    },
    Other {},
}

#[cw_serde]
pub struct FeeShareResponse {
    pub contract_address: Addr,
    pub deployer_address: Addr,
    /// Displays the deployer when no withdrawer is set. Display only: a
    /// registration without a withdrawer never receives payouts.
    pub withdrawer_address: Addr,
}

impl From<FeeShare> for FeeShareResponse {
    fn from(share: FeeShare) -> Self {
        let withdrawer_address = share
            .withdrawer_address
            .unwrap_or_else(|| share.deployer_address.clone());
        FeeShareResponse {
            contract_address: share.contract_address,
            deployer_address: share.deployer_address,
            withdrawer_address,
        }
    }
}

#[cw_serde]
pub struct FeeSharesResponse {
    pub fee_shares: Vec<FeeShareResponse>,
}

#[cw_serde]
pub struct FeeShareContractsResponse {
    pub contracts: Vec<Addr>,
}
