use cosmwasm_std::{
    to_json_binary, Addr, Binary, Coin, Decimal, Deps, DepsMut, Empty, Env, MessageInfo, Response,
    StdResult, Uint128,
};
use cw_multi_test::{error::AnyResult, App, AppResponse, Contract, ContractWrapper, Executor};
use revshare_utils::{
    ExecuteMsg, FeeShareContractsResponse, FeeShareResponse, FeeSharesResponse, InstantiateMsg,
    Params, QueryMsg, TxMessage,
};

use crate::ContractError;

pub const NTRN: &str = "untrn";
pub const ATOM: &str = "uatom";

pub struct RegistryTestSuite {
    pub app: App,
    pub owner: Addr,
    pub fee_processor: Addr,
    pub user: Addr,
    pub registry: Addr,
    target_code_id: u64,
}

impl Default for RegistryTestSuite {
    fn default() -> Self {
        Self::new(default_params(), None)
    }
}

impl RegistryTestSuite {
    pub fn new(params: Params, authz_unwrap_depth: Option<u32>) -> Self {
        let mut app = App::default();

        let owner = app.api().addr_make("owner");
        let fee_processor = app.api().addr_make("fee_processor");
        let user = app.api().addr_make("user");

        let registry_code = ContractWrapper::new(
            crate::contract::execute,
            crate::contract::instantiate,
            crate::contract::query,
        );
        let registry_code_id = app.store_code(Box::new(registry_code));
        let target_code_id = app.store_code(target_contract());

        let registry = app
            .instantiate_contract(
                registry_code_id,
                owner.clone(),
                &InstantiateMsg {
                    owner: owner.to_string(),
                    fee_processor: fee_processor.to_string(),
                    params,
                    authz_unwrap_depth,
                },
                &[],
                "revshare-registry",
                None,
            )
            .unwrap();

        Self {
            app,
            owner,
            fee_processor,
            user,
            registry,
            target_code_id,
        }
    }

    pub fn addr(&self, name: &str) -> Addr {
        self.app.api().addr_make(name)
    }

    /// Instantiates a target contract; with `admin == None` the creator stays
    /// in control.
    pub fn deploy_target(&mut self, creator: &Addr, admin: Option<&Addr>) -> Addr {
        self.app
            .instantiate_contract(
                self.target_code_id,
                creator.clone(),
                &Empty {},
                &[],
                "target",
                admin.map(|a| a.to_string()),
            )
            .unwrap()
    }

    pub fn register(
        &mut self,
        sender: &Addr,
        contract: &Addr,
        withdrawer: Option<&Addr>,
    ) -> AnyResult<AppResponse> {
        let registry = self.registry.clone();
        self.app.execute_contract(
            sender.clone(),
            registry,
            &ExecuteMsg::Register {
                contract_address: contract.to_string(),
                withdrawer_address: withdrawer.map(|w| w.to_string()),
            },
            &[],
        )
    }

    pub fn update_withdrawer(
        &mut self,
        sender: &Addr,
        contract: &Addr,
        withdrawer: &Addr,
    ) -> AnyResult<AppResponse> {
        let registry = self.registry.clone();
        self.app.execute_contract(
            sender.clone(),
            registry,
            &ExecuteMsg::UpdateWithdrawer {
                contract_address: contract.to_string(),
                withdrawer_address: withdrawer.to_string(),
            },
            &[],
        )
    }

    pub fn cancel(&mut self, sender: &Addr, contract: &Addr) -> AnyResult<AppResponse> {
        let registry = self.registry.clone();
        self.app.execute_contract(
            sender.clone(),
            registry,
            &ExecuteMsg::Cancel {
                contract_address: contract.to_string(),
            },
            &[],
        )
    }

    pub fn update_params(&mut self, sender: &Addr, params: Params) -> AnyResult<AppResponse> {
        let registry = self.registry.clone();
        self.app.execute_contract(
            sender.clone(),
            registry,
            &ExecuteMsg::UpdateParams { params },
            &[],
        )
    }

    pub fn process_fees(
        &mut self,
        sender: &Addr,
        fee: Vec<Coin>,
        msgs: Vec<TxMessage>,
    ) -> AnyResult<AppResponse> {
        let registry = self.registry.clone();
        self.app.execute_contract(
            sender.clone(),
            registry,
            &ExecuteMsg::ProcessFees { fee, msgs },
            &[],
        )
    }

    /// Seeds the collector pool, standing in for the upstream fee deduction.
    pub fn fund_pool(&mut self, coins: Vec<Coin>) {
        let registry = self.registry.clone();
        self.app
            .init_modules(|router, _, storage| router.bank.init_balance(storage, &registry, coins))
            .unwrap();
    }

    pub fn balance(&self, addr: &Addr, denom: &str) -> Uint128 {
        self.app.wrap().query_balance(addr, denom).unwrap().amount
    }

    pub fn pool_balance(&self, denom: &str) -> Uint128 {
        self.balance(&self.registry, denom)
    }

    pub fn query_fee_share(&self, contract: &Addr) -> StdResult<FeeShareResponse> {
        self.app.wrap().query_wasm_smart(
            &self.registry,
            &QueryMsg::FeeShare {
                contract_address: contract.to_string(),
            },
        )
    }

    pub fn query_fee_shares(
        &self,
        start_after: Option<&Addr>,
        limit: Option<u32>,
    ) -> FeeSharesResponse {
        self.app
            .wrap()
            .query_wasm_smart(
                &self.registry,
                &QueryMsg::FeeShares {
                    start_after: start_after.map(|a| a.to_string()),
                    limit,
                },
            )
            .unwrap()
    }

    pub fn query_deployer_contracts(&self, deployer: &Addr) -> Vec<Addr> {
        self.query_deployer_contracts_page(deployer, None, None)
    }

    pub fn query_deployer_contracts_page(
        &self,
        deployer: &Addr,
        start_after: Option<&Addr>,
        limit: Option<u32>,
    ) -> Vec<Addr> {
        let res: FeeShareContractsResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.registry,
                &QueryMsg::DeployerFeeShares {
                    deployer_address: deployer.to_string(),
                    start_after: start_after.map(|a| a.to_string()),
                    limit,
                },
            )
            .unwrap();
        res.contracts
    }

    pub fn query_withdrawer_contracts(&self, withdrawer: &Addr) -> Vec<Addr> {
        self.query_withdrawer_contracts_page(withdrawer, None, None)
    }

    pub fn query_withdrawer_contracts_page(
        &self,
        withdrawer: &Addr,
        start_after: Option<&Addr>,
        limit: Option<u32>,
    ) -> Vec<Addr> {
        let res: FeeShareContractsResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.registry,
                &QueryMsg::WithdrawerFeeShares {
                    withdrawer_address: withdrawer.to_string(),
                    start_after: start_after.map(|a| a.to_string()),
                    limit,
                },
            )
            .unwrap();
        res.contracts
    }

    pub fn query_params(&self) -> Params {
        self.app
            .wrap()
            .query_wasm_smart(&self.registry, &QueryMsg::Params {})
            .unwrap()
    }
}

/// Number of distribution events emitted by a payout execution.
pub fn distribution_events(res: &AppResponse) -> usize {
    res.events
        .iter()
        .filter(|e| e.ty == format!("wasm-{}", crate::payout::DISTRIBUTION_EVENT))
        .count()
}

pub fn default_params() -> Params {
    Params {
        enabled: true,
        developer_shares: Decimal::percent(50),
        allowed_denoms: vec![],
    }
}

pub fn unwrap_contract_err(res: AnyResult<AppResponse>) -> ContractError {
    res.unwrap_err().downcast().unwrap()
}

pub fn execute_msg(contract: &Addr) -> TxMessage {
    TxMessage::ExecuteContract {
        contract: contract.to_string(),
    }
}

/// Wraps a message in `levels` nested authz exec envelopes.
pub fn wrap_in_authz(mut msg: TxMessage, grantee: &Addr, levels: u32) -> TxMessage {
    for _ in 0..levels {
        msg = TxMessage::AuthzExec {
            grantee: grantee.to_string(),
            msgs: vec![msg],
        };
    }
    msg
}

fn target_contract() -> Box<dyn Contract<Empty>> {
    fn instantiate(_: DepsMut, _: Env, _: MessageInfo, _: Empty) -> StdResult<Response> {
        Ok(Response::new())
    }
    fn execute(_: DepsMut, _: Env, _: MessageInfo, _: Empty) -> StdResult<Response> {
        Ok(Response::new())
    }
    fn query(_: Deps, _: Env, _: Empty) -> StdResult<Binary> {
        to_json_binary(&Empty {})
    }
    Box::new(ContractWrapper::new(execute, instantiate, query))
}
