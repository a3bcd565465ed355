use soroban_sdk::{contractclient, Address, Env, Symbol};

use crate::admin_tiers::{self, AdminTier};

/// Interface of an external policy contract deciding who may run an
/// administrative action.
///
/// `action` is a short symbol naming the entry point, e.g. `new_pool`.
#[contractclient(name = "AuthorizerClient")]
pub trait AuthorizerInterface {
    fn is_authorized(env: Env, caller: Address, action: Symbol) -> bool;
}

/// Resolves whether `caller` may perform `action`.
///
/// With a policy contract configured its answer is final; a policy contract
/// that traps or returns a malformed value denies the action. Without one,
/// the caller must hold `min_tier` in the local tier registry.
pub fn is_authorized(
    env: &Env,
    policy: Option<&Address>,
    caller: &Address,
    action: &Symbol,
    min_tier: &AdminTier,
) -> bool {
    match policy {
        Some(policy) => matches!(
            AuthorizerClient::new(env, policy).try_is_authorized(caller, action),
            Ok(Ok(true))
        ),
        None => admin_tiers::has_tier(env, caller, min_tier),
    }
}
