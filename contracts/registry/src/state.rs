use cosmwasm_std::{Addr, Empty, StdResult, Storage};
use cw_storage_plus::{Item, Map};
use revshare_utils::{Config, FeeShare, Params};

pub const CONFIG: Item<Config> = Item::new("config");
pub const PARAMS: Item<Params> = Item::new("params");

/// Primary table, keyed by contract address.
pub const FEE_SHARES: Map<&Addr, FeeShare> = Map::new("fee_shares");
/// (deployer, contract) markers, exactly one per registration.
pub const DEPLOYER_SHARES: Map<(&Addr, &Addr), Empty> = Map::new("deployer_shares");
/// (withdrawer, contract) markers, present only while a withdrawer is set.
pub const WITHDRAWER_SHARES: Map<(&Addr, &Addr), Empty> = Map::new("withdrawer_shares");

/// Writes the primary record together with its marker entries. The host
/// commits or discards the whole execution as a unit, so the three tables
/// never diverge.
pub fn save_fee_share(storage: &mut dyn Storage, share: &FeeShare) -> StdResult<()> {
    FEE_SHARES.save(storage, &share.contract_address, share)?;
    DEPLOYER_SHARES.save(
        storage,
        (&share.deployer_address, &share.contract_address),
        &Empty {},
    )?;
    if let Some(withdrawer) = &share.withdrawer_address {
        WITHDRAWER_SHARES.save(storage, (withdrawer, &share.contract_address), &Empty {})?;
    }
    Ok(())
}

/// Removes the primary record and every marker entry pointing at it.
pub fn remove_fee_share(storage: &mut dyn Storage, share: &FeeShare) {
    FEE_SHARES.remove(storage, &share.contract_address);
    DEPLOYER_SHARES.remove(storage, (&share.deployer_address, &share.contract_address));
    if let Some(withdrawer) = &share.withdrawer_address {
        WITHDRAWER_SHARES.remove(storage, (withdrawer, &share.contract_address));
    }
}

/// Points the registration at a new withdrawer, swapping the marker entry.
pub fn swap_withdrawer(
    storage: &mut dyn Storage,
    share: &mut FeeShare,
    new_withdrawer: Addr,
) -> StdResult<()> {
    if let Some(old_withdrawer) = &share.withdrawer_address {
        WITHDRAWER_SHARES.remove(storage, (old_withdrawer, &share.contract_address));
    }
    WITHDRAWER_SHARES.save(storage, (&new_withdrawer, &share.contract_address), &Empty {})?;
    share.withdrawer_address = Some(new_withdrawer);
    FEE_SHARES.save(storage, &share.contract_address, share)
}
