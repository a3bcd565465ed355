use soroban_sdk::{contracttype, Address, Env, Vec};

const DAY_IN_LEDGERS: u32 = 17_280;
const TTL_THRESHOLD: u32 = 30 * DAY_IN_LEDGERS;
const TTL_EXTEND_TO: u32 = 60 * DAY_IN_LEDGERS;

// ── Storage keys ─────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone)]
enum TierKey {
    /// Tier held by one address (persistent).
    Tier(Address),
    /// Every address currently holding a tier (persistent).
    Roster,
    /// Address that bootstrapped the registry (instance).
    Root,
}

// ── Admin tier ───────────────────────────────────────────────────────────────

/// Three-tier admin hierarchy.
///
/// - `SuperAdmin`    – manages the registry itself and the authorizer hook.
/// - `ContractAdmin` – configures pools: creation, reward tokens, rates.
/// - `OperatorAdmin` – may only pause and unpause pools.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum AdminTier {
    OperatorAdmin = 1,
    ContractAdmin = 2,
    SuperAdmin = 3,
}

impl AdminTier {
    pub fn rank(&self) -> u32 {
        *self as u32
    }

    /// True if this tier is at least as high as `min_tier`.
    pub fn has_at_least(&self, min_tier: &AdminTier) -> bool {
        self.rank() >= min_tier.rank()
    }
}

fn bump(env: &Env, key: &TierKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Registry ─────────────────────────────────────────────────────────────────

/// Records `root` as the registry owner and grants it `SuperAdmin`.
/// Callers must make sure this runs exactly once.
pub fn bootstrap(env: &Env, root: &Address) {
    env.storage().instance().set(&TierKey::Root, root);
    grant(env, root, AdminTier::SuperAdmin);
}

pub fn root(env: &Env) -> Option<Address> {
    env.storage().instance().get(&TierKey::Root)
}

/// Assigns `tier` to `admin` without any permission check.
pub fn grant(env: &Env, admin: &Address, tier: AdminTier) {
    let key = TierKey::Tier(admin.clone());
    env.storage().persistent().set(&key, &tier);
    bump(env, &key);

    let mut roster = list_admins(env);
    if !roster.contains(admin) {
        roster.push_back(admin.clone());
        env.storage().persistent().set(&TierKey::Roster, &roster);
    }
}

/// Removes any tier held by `admin` without any permission check.
pub fn revoke(env: &Env, admin: &Address) {
    env.storage()
        .persistent()
        .remove(&TierKey::Tier(admin.clone()));

    let roster = list_admins(env);
    if let Some(idx) = roster.first_index_of(admin) {
        let mut roster = roster;
        roster.remove(idx);
        env.storage().persistent().set(&TierKey::Roster, &roster);
    }
}

pub fn tier_of(env: &Env, admin: &Address) -> Option<AdminTier> {
    let key = TierKey::Tier(admin.clone());
    let tier: Option<AdminTier> = env.storage().persistent().get(&key);
    if tier.is_some() {
        bump(env, &key);
    }
    tier
}

/// Returns `true` if `caller` holds `min_tier` or higher.
pub fn has_tier(env: &Env, caller: &Address, min_tier: &AdminTier) -> bool {
    tier_of(env, caller).is_some_and(|tier| tier.has_at_least(min_tier))
}

pub fn list_admins(env: &Env) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&TierKey::Roster)
        .unwrap_or(Vec::new(env))
}

// ── Promote / demote ─────────────────────────────────────────────────────────

/// Assigns `tier` to `target` on behalf of `caller`.
///
/// Returns `false` when `caller` is not a `SuperAdmin`. The caller must
/// already have been authenticated with `require_auth()`.
pub fn promote(env: &Env, caller: &Address, target: &Address, tier: AdminTier) -> bool {
    if !has_tier(env, caller, &AdminTier::SuperAdmin) {
        return false;
    }
    grant(env, target, tier);
    true
}

/// Strips every tier from `target` on behalf of `caller`.
///
/// The registry root can never be demoted, so the contract always keeps one
/// address able to repair the registry.
pub fn demote(env: &Env, caller: &Address, target: &Address) -> bool {
    if !has_tier(env, caller, &AdminTier::SuperAdmin) {
        return false;
    }
    if root(env).as_ref() == Some(target) {
        return false;
    }
    revoke(env, target);
    true
}
