use cosmwasm_std::{
    coin, ensure, Addr, BankMsg, Coin, Deps, Env, Event, Response, StdResult, Storage, Uint128,
};
use cw_utils::NativeBalance;
use revshare_utils::{Params, TxMessage};

use crate::{error::ContractError, state::FEE_SHARES};

pub const DISTRIBUTION_EVENT: &str = "revshare";

/// One payout slot per registered contract invocation found in the
/// transaction. The same withdrawer holds several slots when its contract is
/// invoked more than once.
struct PayeeSlot {
    contract: Addr,
    withdrawer: Addr,
}

/// Splits the developer share of an already collected fee between the
/// withdrawers of every registered contract the transaction invoked. Runs at
/// most once per transaction, after the fee has been deposited to this
/// contract and before the caller's signature-heavy ante work.
///
/// Either every transfer is emitted or the whole execution fails; there is no
/// partial payout.
pub fn process_fees(
    deps: Deps,
    env: &Env,
    params: &Params,
    unwrap_depth: u32,
    fee: Vec<Coin>,
    msgs: &[TxMessage],
) -> Result<Response, ContractError> {
    let response = Response::new().add_attribute("method", "process_fees");

    if !params.enabled || params.developer_shares.is_zero() {
        return Ok(response);
    }

    let fee = restrict_to_allowed(fee, &params.allowed_denoms);
    if fee.is_empty() {
        return Ok(response);
    }

    let mut slots = vec![];
    collect_payee_slots(deps.storage, msgs, unwrap_depth, &mut slots)?;
    if slots.is_empty() {
        // No eligible invocations: the full fee stays in the pool.
        return Ok(response);
    }

    // Integer floor at both steps. The remainder of each division is not
    // distributed: the pool must never pay out more than the configured
    // share.
    let num_slots = Uint128::new(slots.len() as u128);
    let mut per_slot: Vec<Coin> = vec![];
    for Coin { denom, amount } in fee {
        let payable = amount.mul_floor(params.developer_shares);
        let each = payable / num_slots;
        if !each.is_zero() {
            per_slot.push(coin(each.u128(), denom));
        }
    }
    if per_slot.is_empty() {
        return Ok(response);
    }

    // The pool was funded by the upstream fee deduction, so this should never
    // trip; failing here is still better than an over-draw.
    for per_slot_coin in &per_slot {
        let needed = per_slot_coin.amount * num_slots;
        let pool_balance = deps
            .querier
            .query_balance(&env.contract.address, &per_slot_coin.denom)?;
        ensure!(
            pool_balance.amount >= needed,
            ContractError::InsufficientPoolBalance {
                denom: per_slot_coin.denom.clone(),
                needed,
                available: pool_balance.amount,
            }
        );
    }

    let amount_attr = per_slot
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",");

    let mut response = response;
    for slot in slots {
        response = response
            .add_message(BankMsg::Send {
                to_address: slot.withdrawer.to_string(),
                amount: per_slot.clone(),
            })
            .add_event(
                Event::new(DISTRIBUTION_EVENT)
                    .add_attribute("payer", &env.contract.address)
                    .add_attribute("contract", slot.contract)
                    .add_attribute("withdrawer", slot.withdrawer)
                    .add_attribute("amount", amount_attr.clone()),
            );
    }

    Ok(response)
}

fn restrict_to_allowed(fee: Vec<Coin>, allowed_denoms: &[String]) -> Vec<Coin> {
    // Merge duplicate denoms and drop zero amounts first, so the split and
    // the pool check see each denom exactly once and the transfers never
    // carry a repeated denom.
    let mut fee = NativeBalance(fee);
    fee.normalize();
    let NativeBalance(fee) = fee;

    if allowed_denoms.is_empty() {
        return fee;
    }
    fee.into_iter()
        .filter(|fee_coin| allowed_denoms.contains(&fee_coin.denom))
        .collect()
}

/// Walks the transaction's messages and appends one slot per invocation of a
/// registered, payable contract. Contract executions can hide inside authz
/// exec wrappers, so those are unwrapped recursively until `depth_left` runs
/// out; anything nested deeper is ignored rather than erroring, to keep the
/// payout total and deterministic.
fn collect_payee_slots(
    storage: &dyn Storage,
    msgs: &[TxMessage],
    depth_left: u32,
    slots: &mut Vec<PayeeSlot>,
) -> StdResult<()> {
    for msg in msgs {
        match msg {
            TxMessage::ExecuteContract { contract } => {
                // Lookup by the literal target address; an unknown or
                // unregistered address simply contributes no slot.
                let contract = Addr::unchecked(contract.as_str());
                if let Some(share) = FEE_SHARES.may_load(storage, &contract)? {
                    if let Some(withdrawer) = share.withdrawer_address {
                        slots.push(PayeeSlot {
                            contract,
                            withdrawer,
                        });
                    }
                }
            }
            TxMessage::AuthzExec { msgs: inner, .. } => {
                if depth_left > 0 {
                    collect_payee_slots(storage, inner, depth_left - 1, slots)?;
                }
            }
            TxMessage::Other {} => {}
        }
    }
    Ok(())
}
