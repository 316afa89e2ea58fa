extern crate std;

use soroban_sdk::{testutils::Address as _, vec, Address, Env, String};

use crate::invariants::assert_sequential_ids;
use crate::{CrowdfundLedger, CrowdfundLedgerClient, Error, ONE_UNIT};

fn setup() -> (Env, CrowdfundLedgerClient<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(CrowdfundLedger, ());
    let client = CrowdfundLedgerClient::new(&env, &contract_id);
    (env, client)
}

fn setup_with_init() -> (Env, CrowdfundLedgerClient<'static>, Address, Address) {
    let (env, client) = setup();
    let owner = Address::generate(&env);
    let token = Address::generate(&env);
    client.init(&owner, &token);
    (env, client, owner, token)
}

fn text(env: &Env, s: &str) -> String {
    String::from_str(env, s)
}

#[test]
fn test_init_once() {
    let (env, client, owner, token) = setup_with_init();
    assert_eq!(client.owner(), Some(owner.clone()));
    assert_eq!(client.token(), token);

    let other = Address::generate(&env);
    assert_eq!(
        client.try_init(&other, &token),
        Err(Ok(Error::AlreadyInitialized))
    );
    assert_eq!(client.owner(), Some(owner));
}

#[test]
fn test_create_requires_init() {
    let (env, client) = setup();
    let creator = Address::generate(&env);
    let result = client.try_create_campaign(
        &creator,
        &text(&env, "Orchard"),
        &text(&env, "Fruit trees"),
        &text(&env, "ORCH"),
        &ONE_UNIT,
    );
    assert_eq!(result, Err(Ok(Error::NotInitialized)));
    assert_eq!(client.try_token(), Err(Ok(Error::NotInitialized)));
    assert_eq!(client.campaign_count(), 0);
}

#[test]
fn test_two_creators_get_sequential_indices() {
    let (env, client, _, _) = setup_with_init();
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);

    let first = client.create_campaign(
        &alice,
        &text(&env, "Bridge"),
        &text(&env, "Footbridge over the creek"),
        &text(&env, "BRDG"),
        &(5 * ONE_UNIT),
    );
    let second = client.create_campaign(
        &bob,
        &text(&env, "Mural"),
        &text(&env, "Paint the underpass"),
        &text(&env, "MURL"),
        &(2 * ONE_UNIT),
    );

    assert_eq!((first, second), (0, 1));
    assert_eq!(client.campaign_count(), 2);
    assert_eq!(client.campaign_at(&0).creator, alice);
    assert_eq!(client.campaign_at(&1).creator, bob);
    assert_eq!(client.campaign_indices_of(&alice), vec![&env, 0u64]);
    assert_eq!(client.campaign_indices_of(&bob), vec![&env, 1u64]);

    let campaigns = [client.campaign_at(&0), client.campaign_at(&1)];
    assert_sequential_ids(&campaigns);
    assert_eq!(client.try_campaign_at(&2), Err(Ok(Error::CampaignNotFound)));
}

#[test]
fn test_creator_list_keeps_order() {
    let (env, client, _, _) = setup_with_init();
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);

    for creator in [&alice, &bob, &alice, &alice] {
        client.create_campaign(
            creator,
            &text(&env, "Run"),
            &text(&env, "Charity run"),
            &text(&env, "RUN"),
            &ONE_UNIT,
        );
    }

    assert_eq!(client.campaign_indices_of(&alice), vec![&env, 0u64, 2, 3]);
    assert_eq!(client.campaign_indices_of(&bob), vec![&env, 1u64]);
    assert_eq!(
        client.campaign_indices_of(&Address::generate(&env)),
        vec![&env]
    );
}

#[test]
fn test_invalid_parameters_rejected() {
    let (env, client, _, _) = setup_with_init();
    let creator = Address::generate(&env);

    let zero_goal = client.try_create_campaign(
        &creator,
        &text(&env, "Pool"),
        &text(&env, "Public pool"),
        &text(&env, "POOL"),
        &0,
    );
    assert_eq!(zero_goal, Err(Ok(Error::InvalidParameters)));

    let empty_name = client.try_create_campaign(
        &creator,
        &text(&env, ""),
        &text(&env, "Public pool"),
        &text(&env, "POOL"),
        &ONE_UNIT,
    );
    assert_eq!(empty_name, Err(Ok(Error::InvalidParameters)));

    assert_eq!(client.campaign_count(), 0);
    assert_eq!(client.campaign_indices_of(&creator), vec![&env]);
}

#[test]
fn test_registry_ownership() {
    let (env, client, owner, _) = setup_with_init();
    let successor = Address::generate(&env);
    let stranger = Address::generate(&env);

    assert_eq!(
        client.try_transfer_ownership(&stranger, &successor),
        Err(Ok(Error::AccessDenied))
    );

    client.transfer_ownership(&owner, &successor);
    assert_eq!(client.owner(), Some(successor.clone()));
    assert_eq!(
        client.try_renounce_ownership(&owner),
        Err(Ok(Error::AccessDenied))
    );

    client.renounce_ownership(&successor);
    assert_eq!(client.owner(), None);
    assert_eq!(
        client.try_transfer_ownership(&successor, &owner),
        Err(Ok(Error::AccessDenied))
    );
}

#[test]
fn test_campaign_ownership_is_independent_of_registry() {
    let (env, client, owner, _) = setup_with_init();
    let creator = Address::generate(&env);
    let id = client.create_campaign(
        &creator,
        &text(&env, "Shelter"),
        &text(&env, "Animal shelter"),
        &text(&env, "SHLT"),
        &ONE_UNIT,
    );

    assert_eq!(client.campaign_owner(&id), Some(creator.clone()));
    assert_eq!(
        client.try_transfer_campaign_ownership(&id, &owner, &owner),
        Err(Ok(Error::AccessDenied))
    );

    let heir = Address::generate(&env);
    client.transfer_campaign_ownership(&id, &creator, &heir);
    let campaign = client.get_campaign(&id);
    assert_eq!(campaign.owner, Some(heir));
    assert_eq!(campaign.creator, creator);
    assert_eq!(client.owner(), Some(owner));
}

#[test]
fn test_error_reasons() {
    assert_eq!(Error::AccessDenied.reason(), "Ownable: caller is not the owner");
    assert_eq!(Error::Expired.reason(), "Project: time limit for project expired");
    assert_eq!(Error::Cancelled.reason(), Error::AlreadyCancelled.reason());
    assert_eq!(
        Error::BelowMinimumContribution.reason(),
        "Project: contribution must be >= 0.01 unit"
    );
}
