extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    token, vec, Address, Env, IntoVal, String, TryIntoVal,
};

use crate::events::{
    BadgeMinted, CampaignCancelled, CampaignCreated, Contribution, OwnershipTransferred, Refund,
    Withdraw,
};
use crate::{CrowdfundLedger, CrowdfundLedgerClient, FUNDRAISING_WINDOW, ONE_UNIT};

fn setup() -> (Env, CrowdfundLedgerClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_700_000_000);
    let contract_id = env.register(CrowdfundLedger, ());
    let client = CrowdfundLedgerClient::new(&env, &contract_id);

    let token_admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(token_admin);
    client.init(&Address::generate(&env), &sac.address());
    (env, client, sac.address())
}

fn mint(env: &Env, token: &Address, to: &Address, amount: i128) {
    token::StellarAssetClient::new(env, token).mint(to, &amount);
}

fn open(env: &Env, client: &CrowdfundLedgerClient, creator: &Address, goal: i128) -> u64 {
    client.create_campaign(
        creator,
        &String::from_str(env, "Night School"),
        &String::from_str(env, "Evening classes for adults"),
        &String::from_str(env, "NITE"),
        &goal,
    )
}

#[test]
fn test_campaign_created_event() {
    let (env, client, _) = setup();
    let creator = Address::generate(&env);
    let goal = 4 * ONE_UNIT;
    let id = open(&env, &client, &creator, goal);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: CampaignCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CampaignCreated {
            creator,
            campaign_id: id,
            index: 0,
            fundraising_goal: goal,
            end_time: 1_700_000_000 + FUNDRAISING_WINDOW,
        }
    );
}

#[test]
fn test_contribution_event() {
    let (env, client, token) = setup();
    let creator = Address::generate(&env);
    let alice = Address::generate(&env);
    let id = open(&env, &client, &creator, 4 * ONE_UNIT);
    mint(&env, &token, &alice, ONE_UNIT);

    client.contribute(&id, &alice, &ONE_UNIT);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    assert_eq!(
        last_event.1,
        vec![
            &env,
            symbol_short!("contrib").into_val(&env),
            id.into_val(&env)
        ]
    );
    let event_data: Contribution = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        Contribution {
            from: alice,
            campaign_id: id,
            amount: ONE_UNIT,
        }
    );
}

#[test]
fn test_cancel_and_refund_events() {
    let (env, client, token) = setup();
    let creator = Address::generate(&env);
    let bob = Address::generate(&env);
    let id = open(&env, &client, &creator, 4 * ONE_UNIT);
    mint(&env, &token, &bob, ONE_UNIT);
    client.contribute(&id, &bob, &ONE_UNIT);

    client.cancel(&id, &creator);
    let last_event = env.events().all().last().expect("No events found");
    assert_eq!(
        last_event.1,
        vec![
            &env,
            symbol_short!("cancelled").into_val(&env),
            id.into_val(&env)
        ]
    );
    let cancelled: CampaignCancelled = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        cancelled,
        CampaignCancelled {
            owner: creator,
            campaign_id: id,
        }
    );

    client.refund(&id, &bob);
    let last_event = env.events().all().last().expect("No events found");
    assert_eq!(
        last_event.1,
        vec![
            &env,
            symbol_short!("refunded").into_val(&env),
            id.into_val(&env)
        ]
    );
    let refund: Refund = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        refund,
        Refund {
            to: bob,
            campaign_id: id,
            amount: ONE_UNIT,
        }
    );
}

#[test]
fn test_withdraw_event() {
    let (env, client, token) = setup();
    let creator = Address::generate(&env);
    let alice = Address::generate(&env);
    let id = open(&env, &client, &creator, ONE_UNIT);
    mint(&env, &token, &alice, 2 * ONE_UNIT);
    client.contribute(&id, &alice, &(2 * ONE_UNIT));

    client.withdraw(&id, &creator);

    let last_event = env.events().all().last().expect("No events found");
    assert_eq!(last_event.0, client.address);
    assert_eq!(
        last_event.1,
        vec![
            &env,
            symbol_short!("withdrawn").into_val(&env),
            id.into_val(&env)
        ]
    );
    let event_data: Withdraw = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        Withdraw {
            to: creator,
            campaign_id: id,
            amount: 2 * ONE_UNIT,
        }
    );
}

#[test]
fn test_badge_minted_event() {
    let (env, client, token) = setup();
    let creator = Address::generate(&env);
    let alice = Address::generate(&env);
    let id = open(&env, &client, &creator, 4 * ONE_UNIT);
    mint(&env, &token, &alice, ONE_UNIT);
    client.contribute(&id, &alice, &ONE_UNIT);

    let badge_id = client.mint_badge(&id, &alice);

    let last_event = env.events().all().last().expect("No events found");
    assert_eq!(
        last_event.1,
        vec![
            &env,
            symbol_short!("badge").into_val(&env),
            id.into_val(&env)
        ]
    );
    let event_data: BadgeMinted = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        BadgeMinted {
            to: alice,
            campaign_id: id,
            badge_id,
        }
    );
}

#[test]
fn test_campaign_ownership_events() {
    let (env, client, _) = setup();
    let creator = Address::generate(&env);
    let heir = Address::generate(&env);
    let id = open(&env, &client, &creator, ONE_UNIT);

    client.transfer_campaign_ownership(&id, &creator, &heir);
    let last_event = env.events().all().last().expect("No events found");
    assert_eq!(
        last_event.1,
        vec![
            &env,
            symbol_short!("owner_set").into_val(&env),
            id.into_val(&env)
        ]
    );
    let transferred: OwnershipTransferred = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        transferred,
        OwnershipTransferred {
            campaign_id: Some(id),
            previous_owner: Some(creator),
            new_owner: Some(heir.clone()),
        }
    );

    client.renounce_campaign_ownership(&id, &heir);
    let last_event = env.events().all().last().expect("No events found");
    let renounced: OwnershipTransferred = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(renounced.previous_owner, Some(heir));
    assert_eq!(renounced.new_owner, None);
}

#[test]
fn test_registry_ownership_event() {
    let (env, client, _) = setup();
    let owner = client.owner().unwrap();
    let successor = Address::generate(&env);

    client.transfer_ownership(&owner, &successor);

    let last_event = env.events().all().last().expect("No events found");
    assert_eq!(
        last_event.1,
        vec![&env, symbol_short!("owner_set").into_val(&env)]
    );
    let event_data: OwnershipTransferred = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        OwnershipTransferred {
            campaign_id: None,
            previous_owner: Some(owner),
            new_owner: Some(successor),
        }
    );
}
