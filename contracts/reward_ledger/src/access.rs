//! Admin gating for pool administration.
//!
//! The ledger never decides policy itself: it asks the configured authorizer
//! contract, or the local admin-tier registry when none is configured.

use common::{
    admin_tiers::{self, AdminTier},
    authorizer,
};
use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::ContractError;

const AUTHORIZER: Symbol = symbol_short!("AUTHZ");

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    CreatePool,
    AddRewardToken,
    SetRewardRates,
    SetPaused,
}

impl Action {
    /// Name passed to the external authorizer.
    pub fn symbol(&self) -> Symbol {
        match self {
            Action::CreatePool => symbol_short!("new_pool"),
            Action::AddRewardToken => symbol_short!("add_token"),
            Action::SetRewardRates => symbol_short!("set_rates"),
            Action::SetPaused => symbol_short!("set_pause"),
        }
    }

    /// Tier required when no external authorizer is configured.
    pub fn min_tier(&self) -> AdminTier {
        match self {
            Action::SetPaused => AdminTier::OperatorAdmin,
            _ => AdminTier::ContractAdmin,
        }
    }
}

pub fn authorizer(env: &Env) -> Option<Address> {
    env.storage().instance().get(&AUTHORIZER)
}

pub fn set_authorizer(env: &Env, policy: &Option<Address>) {
    match policy {
        Some(policy) => env.storage().instance().set(&AUTHORIZER, policy),
        None => env.storage().instance().remove(&AUTHORIZER),
    }
}

/// Guard: `caller` may perform `action`. `caller` must already be
/// authenticated.
pub fn require(env: &Env, caller: &Address, action: Action) -> Result<(), ContractError> {
    let policy = authorizer(env);
    if authorizer::is_authorized(
        env,
        policy.as_ref(),
        caller,
        &action.symbol(),
        &action.min_tier(),
    ) {
        Ok(())
    } else {
        Err(ContractError::Unauthorized)
    }
}

/// Guard for registry and authorizer management, which never defers to the
/// external authorizer.
pub fn require_super_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
    if admin_tiers::has_tier(env, caller, &AdminTier::SuperAdmin) {
        Ok(())
    } else {
        Err(ContractError::Unauthorized)
    }
}
