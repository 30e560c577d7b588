use cosmwasm_std::{ensure, Addr, QuerierWrapper};

use crate::error::ContractError;

/// Provenance of a deployed contract, as reported by the chain's contract
/// info: the optional migration admin and the instantiating creator.
pub struct ContractOrigin {
    pub admin: Option<Addr>,
    pub creator: Addr,
}

impl ContractOrigin {
    /// The account that controls the contract's registration: its admin, or
    /// its creator when no admin was set.
    pub fn controller(&self) -> &Addr {
        self.admin.as_ref().unwrap_or(&self.creator)
    }
}

pub fn contract_origin(
    querier: &QuerierWrapper,
    contract: &Addr,
) -> Result<ContractOrigin, ContractError> {
    let info = querier
        .query_wasm_contract_info(contract)
        .map_err(|_| ContractError::NotAContract(contract.to_string()))?;
    Ok(ContractOrigin {
        admin: info.admin,
        creator: info.creator,
    })
}

/// Strict authority check used by Register (outside the factory exception),
/// UpdateWithdrawer and Cancel.
pub fn assert_contract_controller(
    origin: &ContractOrigin,
    sender: &Addr,
) -> Result<(), ContractError> {
    ensure!(origin.controller() == sender, ContractError::Unauthorized {});
    Ok(())
}

fn is_contract(querier: &QuerierWrapper, addr: &Addr) -> bool {
    querier.query_wasm_contract_info(addr).is_ok()
}

/// Heuristic for factory-spawned contracts: the admin is the governance
/// authority, or the admin is itself a deployed contract, or there is no
/// admin and the creator is itself a deployed contract. Such contracts have
/// no external account that could pass the strict controller check, so
/// registration is open to anyone with the withdrawer forced to the contract
/// itself.
///
/// Kept as a single predicate so the heuristic can be swapped without
/// touching the registration flow.
pub fn is_factory_contract(
    querier: &QuerierWrapper,
    origin: &ContractOrigin,
    authority: Option<&Addr>,
) -> bool {
    match &origin.admin {
        Some(admin) => authority.is_some_and(|auth| auth == admin) || is_contract(querier, admin),
        None => is_contract(querier, &origin.creator),
    }
}
