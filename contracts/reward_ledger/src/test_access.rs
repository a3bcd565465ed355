extern crate std;

use common::{AdminTier, AuthorizerInterface};
use soroban_sdk::{
    contract, contractimpl, symbol_short, testutils::Address as _, vec, Address, Env, Symbol,
};

use crate::{ContractError, RewardLedgerContract, RewardLedgerContractClient};

const POOL: u32 = 1;

/// Authorizer that lets anyone pause pools and nobody do anything else.
#[contract]
pub struct PauseOnlyAuthorizer;

#[contractimpl]
impl AuthorizerInterface for PauseOnlyAuthorizer {
    fn is_authorized(_env: Env, _caller: Address, action: Symbol) -> bool {
        action == symbol_short!("set_pause")
    }
}

fn new_token(env: &Env) -> Address {
    env.register_stellar_asset_contract_v2(Address::generate(env))
        .address()
}

fn setup() -> (Env, RewardLedgerContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let ledger = env.register(RewardLedgerContract, ());
    let client = RewardLedgerContractClient::new(&env, &ledger);

    let admin = Address::generate(&env);
    client.initialize(&admin);

    (env, client, admin)
}

fn try_create(
    env: &Env,
    client: &RewardLedgerContractClient,
    caller: &Address,
    pool_id: u32,
) -> Result<(), ContractError> {
    let result = client.try_create_pool(
        caller,
        &pool_id,
        &new_token(env),
        &vec![env, new_token(env)],
        &vec![env, 10],
    );
    match result {
        Ok(_) => Ok(()),
        Err(Ok(e)) => Err(e),
        Err(Err(_)) => unreachable!("unexpected host error"),
    }
}

// ── Tier registry ────────────────────────────────────────────────────────────

#[test]
fn test_initializer_is_super_admin() {
    let (_env, client, admin) = setup();

    assert_eq!(client.get_admin_tier(&admin), Some(AdminTier::SuperAdmin));
    assert_eq!(client.list_admins().len(), 1);
}

#[test]
fn test_stranger_cannot_administer() {
    let (env, client, admin) = setup();
    let stranger = Address::generate(&env);

    assert_eq!(
        try_create(&env, &client, &stranger, POOL),
        Err(ContractError::Unauthorized)
    );

    try_create(&env, &client, &admin, POOL).unwrap();
    assert_eq!(
        client.try_set_paused(&stranger, &POOL, &true).unwrap_err().unwrap(),
        ContractError::Unauthorized
    );
    assert_eq!(
        client
            .try_set_reward_rates(&stranger, &POOL, &vec![&env, 1])
            .unwrap_err()
            .unwrap(),
        ContractError::Unauthorized
    );
    assert_eq!(
        client
            .try_add_reward_token(&stranger, &POOL, &new_token(&env), &1, &true)
            .unwrap_err()
            .unwrap(),
        ContractError::Unauthorized
    );
}

#[test]
fn test_contract_admin_configures_pools() {
    let (env, client, admin) = setup();
    let manager = Address::generate(&env);

    client.promote_admin(&admin, &manager, &AdminTier::ContractAdmin);
    assert_eq!(client.get_admin_tier(&manager), Some(AdminTier::ContractAdmin));

    try_create(&env, &client, &manager, POOL).unwrap();
    client.set_reward_rates(&manager, &POOL, &vec![&env, 3]);
    client.set_paused(&manager, &POOL, &true);

    // Registry management stays with super admins.
    let other = Address::generate(&env);
    assert_eq!(
        client
            .try_promote_admin(&manager, &other, &AdminTier::OperatorAdmin)
            .unwrap_err()
            .unwrap(),
        ContractError::Unauthorized
    );
    assert_eq!(
        client
            .try_set_authorizer(&manager, &Some(other))
            .unwrap_err()
            .unwrap(),
        ContractError::Unauthorized
    );
}

#[test]
fn test_operator_can_only_pause() {
    let (env, client, admin) = setup();
    let operator = Address::generate(&env);

    try_create(&env, &client, &admin, POOL).unwrap();
    client.promote_admin(&admin, &operator, &AdminTier::OperatorAdmin);

    client.set_paused(&operator, &POOL, &true);
    assert!(client.get_pool(&POOL).paused);
    client.set_paused(&operator, &POOL, &false);

    assert_eq!(
        try_create(&env, &client, &operator, 2),
        Err(ContractError::Unauthorized)
    );
    assert_eq!(
        client
            .try_set_reward_rates(&operator, &POOL, &vec![&env, 1])
            .unwrap_err()
            .unwrap(),
        ContractError::Unauthorized
    );
}

#[test]
fn test_demoted_admin_loses_access() {
    let (env, client, admin) = setup();
    let manager = Address::generate(&env);

    client.promote_admin(&admin, &manager, &AdminTier::ContractAdmin);
    client.demote_admin(&admin, &manager);

    assert_eq!(client.get_admin_tier(&manager), None);
    assert_eq!(
        try_create(&env, &client, &manager, POOL),
        Err(ContractError::Unauthorized)
    );
}

#[test]
fn test_root_admin_cannot_be_demoted() {
    let (env, client, admin) = setup();
    let deputy = Address::generate(&env);

    client.promote_admin(&admin, &deputy, &AdminTier::SuperAdmin);
    assert_eq!(
        client.try_demote_admin(&deputy, &admin).unwrap_err().unwrap(),
        ContractError::Unauthorized
    );
    assert_eq!(client.get_admin_tier(&admin), Some(AdminTier::SuperAdmin));
}

// ── External authorizer ──────────────────────────────────────────────────────

#[test]
fn test_authorizer_replaces_tier_checks() {
    let (env, client, admin) = setup();
    try_create(&env, &client, &admin, POOL).unwrap();

    let policy = env.register(PauseOnlyAuthorizer, ());
    client.set_authorizer(&admin, &Some(policy.clone()));
    assert_eq!(client.get_authorizer(), Some(policy));

    // Anyone may pause now.
    let stranger = Address::generate(&env);
    client.set_paused(&stranger, &POOL, &true);
    assert!(client.get_pool(&POOL).paused);

    // Even the super admin is refused what the policy refuses.
    assert_eq!(
        try_create(&env, &client, &admin, 2),
        Err(ContractError::Unauthorized)
    );

    // Clearing the policy restores the tier registry.
    client.set_authorizer(&admin, &None);
    assert_eq!(client.get_authorizer(), None);
    try_create(&env, &client, &admin, 2).unwrap();
    assert_eq!(
        client.try_set_paused(&stranger, &POOL, &false).unwrap_err().unwrap(),
        ContractError::Unauthorized
    );
}

#[test]
fn test_unreachable_authorizer_denies() {
    let (env, client, admin) = setup();
    try_create(&env, &client, &admin, POOL).unwrap();

    let not_a_contract = Address::generate(&env);
    client.set_authorizer(&admin, &Some(not_a_contract));

    assert_eq!(
        client.try_set_paused(&admin, &POOL, &true).unwrap_err().unwrap(),
        ContractError::Unauthorized
    );
    assert!(!client.get_pool(&POOL).paused);
}

#[test]
fn test_authorizer_cannot_manage_registry() {
    let (env, client, admin) = setup();

    let policy = env.register(PauseOnlyAuthorizer, ());
    client.set_authorizer(&admin, &Some(policy));

    let stranger = Address::generate(&env);
    assert_eq!(
        client
            .try_set_authorizer(&stranger, &None)
            .unwrap_err()
            .unwrap(),
        ContractError::Unauthorized
    );
    assert_eq!(
        client
            .try_promote_admin(&stranger, &stranger, &AdminTier::SuperAdmin)
            .unwrap_err()
            .unwrap(),
        ContractError::Unauthorized
    );
}
