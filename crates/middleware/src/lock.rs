//! One-way safety latch.
//!
//! Engaged when escrow bookkeeping and the escrow account balance disagree.
//! Nothing in this crate clears it; recovery is an operator action.

use cosmwasm_std::{StdResult, Storage};
use tracing::error;

use crate::state::MODULE_LOCKED;

pub fn is_locked(storage: &dyn Storage) -> StdResult<bool> {
    Ok(MODULE_LOCKED.may_load(storage)?.unwrap_or(false))
}

pub fn lock(storage: &mut dyn Storage) -> StdResult<()> {
    if is_locked(storage)? {
        return Ok(());
    }

    MODULE_LOCKED.save(storage, &true)?;
    relay_fee_telemetry::record_module_locked();
    error!("fee module locked: escrow account cannot cover recorded fees");
    Ok(())
}
