//! Per-pool busy flag.
//!
//! Every mutating entry point runs inside [`guarded`]. The flag lives in
//! temporary storage and is removed before the invocation returns, so it is
//! only ever observed by a call nested inside a running operation.

use soroban_sdk::{symbol_short, Env, Symbol};

use crate::ContractError;

const LOCK: Symbol = symbol_short!("LOCK");

pub fn enter(env: &Env, pool_id: u32) -> Result<(), ContractError> {
    let key = (LOCK, pool_id);
    if env.storage().temporary().has(&key) {
        return Err(ContractError::Reentrant);
    }
    env.storage().temporary().set(&key, &true);
    Ok(())
}

pub fn exit(env: &Env, pool_id: u32) {
    env.storage().temporary().remove(&(LOCK, pool_id));
}

pub fn is_locked(env: &Env, pool_id: u32) -> bool {
    env.storage().temporary().has(&(LOCK, pool_id))
}

/// Run `op` with the pool's busy flag held.
///
/// On error the whole invocation is rolled back, the flag included.
pub fn guarded<T>(
    env: &Env,
    pool_id: u32,
    op: impl FnOnce() -> Result<T, ContractError>,
) -> Result<T, ContractError> {
    enter(env, pool_id)?;
    let result = op();
    exit(env, pool_id);
    result
}
