#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    ensure, to_json_binary, Binary, Decimal, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::state::{CONFIG, PARAMS};
use revshare_utils::{
    Config, ExecuteMsg, InstantiateMsg, Params, QueryMsg, DEFAULT_AUTHZ_UNWRAP_DEPTH,
};

// version info for migration info
const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

// pagination info for the list queries
const DEFAULT_PAGE_LIMIT: u32 = 30;
const MAX_PAGE_LIMIT: u32 = 250;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    cw_ownable::initialize_owner(deps.storage, deps.api, Some(&msg.owner))?;

    validate_params(&msg.params)?;
    PARAMS.save(deps.storage, &msg.params)?;

    let config = Config {
        fee_processor: deps.api.addr_validate(&msg.fee_processor)?,
        authz_unwrap_depth: msg
            .authz_unwrap_depth
            .unwrap_or(DEFAULT_AUTHZ_UNWRAP_DEPTH),
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner", msg.owner)
        .add_attribute("fee_processor", config.fee_processor))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Register {
            contract_address,
            withdrawer_address,
        } => execute::register(deps, &info, contract_address, withdrawer_address),
        ExecuteMsg::UpdateWithdrawer {
            contract_address,
            withdrawer_address,
        } => execute::update_withdrawer(deps, &info, contract_address, withdrawer_address),
        ExecuteMsg::Cancel { contract_address } => execute::cancel(deps, &info, contract_address),
        ExecuteMsg::UpdateParams { params } => execute::update_params(deps, &info, params),
        ExecuteMsg::ProcessFees { fee, msgs } => {
            execute::process_fees(deps, &env, &info, fee, msgs)
        }
        ExecuteMsg::UpdateOwnership(action) => {
            let ownership = cw_ownable::update_ownership(deps, &env.block, &info.sender, action)?;
            Ok(Response::new().add_attributes(ownership.into_attributes()))
        }
    }
}

fn validate_params(params: &Params) -> Result<(), ContractError> {
    ensure!(
        params.developer_shares <= Decimal::one(),
        ContractError::InvalidShares(params.developer_shares)
    );
    ensure!(
        params.allowed_denoms.iter().all(|d| !d.trim().is_empty()),
        ContractError::EmptyDenom {}
    );
    Ok(())
}

mod execute {
    use cosmwasm_std::{ensure, Coin, DepsMut, Env, MessageInfo, Response};
    use cw_ownable::assert_owner;
    use cw_utils::nonpayable;
    use revshare_utils::{FeeShare, Params, TxMessage};

    use super::validate_params;
    use crate::state::{self, CONFIG, FEE_SHARES, PARAMS};
    use crate::{payout, resolver, ContractError};

    pub fn register(
        deps: DepsMut,
        info: &MessageInfo,
        contract_address: String,
        withdrawer_address: Option<String>,
    ) -> Result<Response, ContractError> {
        nonpayable(info)?;

        let params = PARAMS.load(deps.storage)?;
        ensure!(params.enabled, ContractError::FeeShareDisabled {});

        let contract = deps.api.addr_validate(&contract_address)?;
        ensure!(
            !FEE_SHARES.has(deps.storage, &contract),
            ContractError::AlreadyRegistered(contract_address)
        );

        let withdrawer = withdrawer_address
            .as_deref()
            .map(|w| deps.api.addr_validate(w))
            .transpose()?;

        let origin = resolver::contract_origin(&deps.querier, &contract)?;
        let authority = cw_ownable::get_ownership(deps.storage)?.owner;

        let share = if resolver::is_factory_contract(&deps.querier, &origin, authority.as_ref()) {
            // Factory children are registered permissionlessly, but only ever
            // to themselves: anything else would let a stranger redirect the
            // payout.
            match &withdrawer {
                Some(w) if *w == contract => {}
                _ => return Err(ContractError::InvalidWithdrawer {}),
            }
            FeeShare {
                contract_address: contract.clone(),
                deployer_address: contract.clone(),
                withdrawer_address: Some(contract.clone()),
            }
        } else {
            resolver::assert_contract_controller(&origin, &info.sender)?;
            FeeShare {
                contract_address: contract.clone(),
                deployer_address: info.sender.clone(),
                withdrawer_address: withdrawer,
            }
        };
        state::save_fee_share(deps.storage, &share)?;

        Ok(Response::new()
            .add_attribute("method", "register_fee_share")
            .add_attribute("contract", contract)
            .add_attribute("deployer", share.deployer_address)
            .add_attribute(
                "withdrawer",
                share
                    .withdrawer_address
                    .map(String::from)
                    .unwrap_or_default(),
            ))
    }

    pub fn update_withdrawer(
        deps: DepsMut,
        info: &MessageInfo,
        contract_address: String,
        withdrawer_address: String,
    ) -> Result<Response, ContractError> {
        nonpayable(info)?;

        let params = PARAMS.load(deps.storage)?;
        ensure!(params.enabled, ContractError::FeeShareDisabled {});

        let contract = deps.api.addr_validate(&contract_address)?;
        let mut share = FEE_SHARES
            .may_load(deps.storage, &contract)?
            .ok_or(ContractError::NotRegistered(contract_address))?;

        let new_withdrawer = deps.api.addr_validate(&withdrawer_address)?;
        ensure!(
            share.withdrawer_address.as_ref() != Some(&new_withdrawer),
            ContractError::SameWithdrawer {}
        );

        // Strict path only: the factory exception does not apply here.
        let origin = resolver::contract_origin(&deps.querier, &contract)?;
        resolver::assert_contract_controller(&origin, &info.sender)?;

        state::swap_withdrawer(deps.storage, &mut share, new_withdrawer.clone())?;

        Ok(Response::new()
            .add_attribute("method", "update_fee_share_withdrawer")
            .add_attribute("contract", contract)
            .add_attribute("withdrawer", new_withdrawer))
    }

    pub fn cancel(
        deps: DepsMut,
        info: &MessageInfo,
        contract_address: String,
    ) -> Result<Response, ContractError> {
        nonpayable(info)?;

        let params = PARAMS.load(deps.storage)?;
        ensure!(params.enabled, ContractError::FeeShareDisabled {});

        let contract = deps.api.addr_validate(&contract_address)?;
        let share = FEE_SHARES
            .may_load(deps.storage, &contract)?
            .ok_or(ContractError::NotRegistered(contract_address))?;

        let origin = resolver::contract_origin(&deps.querier, &contract)?;
        resolver::assert_contract_controller(&origin, &info.sender)?;

        state::remove_fee_share(deps.storage, &share);

        Ok(Response::new()
            .add_attribute("method", "cancel_fee_share")
            .add_attribute("contract", contract))
    }

    pub fn update_params(
        deps: DepsMut,
        info: &MessageInfo,
        params: Params,
    ) -> Result<Response, ContractError> {
        assert_owner(deps.storage, &info.sender)?;

        validate_params(&params)?;
        PARAMS.save(deps.storage, &params)?;

        Ok(Response::new()
            .add_attribute("method", "update_params")
            .add_attribute("enabled", params.enabled.to_string())
            .add_attribute("developer_shares", params.developer_shares.to_string()))
    }

    pub fn process_fees(
        deps: DepsMut,
        env: &Env,
        info: &MessageInfo,
        fee: Vec<Coin>,
        msgs: Vec<TxMessage>,
    ) -> Result<Response, ContractError> {
        let config = CONFIG.load(deps.storage)?;
        ensure!(
            info.sender == config.fee_processor,
            ContractError::Unauthorized {}
        );

        // Params are loaded once here and threaded through the whole payout.
        let params = PARAMS.load(deps.storage)?;
        payout::process_fees(
            deps.as_ref(),
            env,
            &params,
            config.authz_unwrap_depth,
            fee,
            &msgs,
        )
    }
}

mod query {
    use cosmwasm_std::{Addr, Deps, Order, StdResult};
    use cw_storage_plus::{Bound, Map};
    use revshare_utils::{FeeShareContractsResponse, FeeShareResponse, FeeSharesResponse};

    use super::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
    use crate::state::{DEPLOYER_SHARES, FEE_SHARES, WITHDRAWER_SHARES};

    pub fn all_fee_shares(
        deps: Deps,
        start_after: Option<String>,
        limit: Option<u32>,
    ) -> StdResult<FeeSharesResponse> {
        let start_after = start_after
            .map(|s| deps.api.addr_validate(&s))
            .transpose()?;
        let start = start_after.as_ref().map(Bound::exclusive);
        let limit = page_limit(limit);

        let fee_shares = FEE_SHARES
            .range(deps.storage, start, None, Order::Ascending)
            .take(limit)
            .map(|entry| entry.map(|(_, share)| share.into()))
            .collect::<StdResult<Vec<FeeShareResponse>>>()?;

        Ok(FeeSharesResponse { fee_shares })
    }

    pub fn deployer_fee_shares(
        deps: Deps,
        deployer_address: String,
        start_after: Option<String>,
        limit: Option<u32>,
    ) -> StdResult<FeeShareContractsResponse> {
        let deployer = deps.api.addr_validate(&deployer_address)?;
        marker_contracts(deps, &DEPLOYER_SHARES, &deployer, start_after, limit)
    }

    pub fn withdrawer_fee_shares(
        deps: Deps,
        withdrawer_address: String,
        start_after: Option<String>,
        limit: Option<u32>,
    ) -> StdResult<FeeShareContractsResponse> {
        let withdrawer = deps.api.addr_validate(&withdrawer_address)?;
        marker_contracts(deps, &WITHDRAWER_SHARES, &withdrawer, start_after, limit)
    }

    /// Pages through one of the (owner, contract) marker tables under a fixed
    /// owner prefix.
    fn marker_contracts(
        deps: Deps,
        markers: &Map<(&Addr, &Addr), cosmwasm_std::Empty>,
        owner: &Addr,
        start_after: Option<String>,
        limit: Option<u32>,
    ) -> StdResult<FeeShareContractsResponse> {
        let start_after = start_after
            .map(|s| deps.api.addr_validate(&s))
            .transpose()?;
        let start = start_after.as_ref().map(Bound::exclusive);
        let limit = page_limit(limit);

        let contracts = markers
            .prefix(owner)
            .keys(deps.storage, start, None, Order::Ascending)
            .take(limit)
            .collect::<StdResult<Vec<Addr>>>()?;

        Ok(FeeShareContractsResponse { contracts })
    }

    fn page_limit(limit: Option<u32>) -> usize {
        limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT) as usize
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Ownership {} => to_json_binary(&cw_ownable::get_ownership(deps.storage)?),
        QueryMsg::FeeShare { contract_address } => {
            let contract = deps.api.addr_validate(&contract_address)?;
            let share = crate::state::FEE_SHARES.load(deps.storage, &contract)?;
            to_json_binary(&revshare_utils::FeeShareResponse::from(share))
        }
        QueryMsg::FeeShares { start_after, limit } => {
            to_json_binary(&query::all_fee_shares(deps, start_after, limit)?)
        }
        QueryMsg::DeployerFeeShares {
            deployer_address,
            start_after,
            limit,
        } => to_json_binary(&query::deployer_fee_shares(
            deps,
            deployer_address,
            start_after,
            limit,
        )?),
        QueryMsg::WithdrawerFeeShares {
            withdrawer_address,
            start_after,
            limit,
        } => to_json_binary(&query::withdrawer_fee_shares(
            deps,
            withdrawer_address,
            start_after,
            limit,
        )?),
        QueryMsg::Params {} => to_json_binary(&PARAMS.load(deps.storage)?),
        QueryMsg::Config {} => to_json_binary(&CONFIG.load(deps.storage)?),
    }
}
