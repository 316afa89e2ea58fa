extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, Env, String,
};

use crate::{CrowdfundLedger, CrowdfundLedgerClient, Error, FUNDRAISING_WINDOW, ONE_UNIT};

fn setup() -> (Env, CrowdfundLedgerClient<'static>, token::StellarAssetClient<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_700_000_000);

    let token_admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(token_admin);
    let sac_admin = token::StellarAssetClient::new(&env, &sac.address());

    let client = CrowdfundLedgerClient::new(&env, &env.register(CrowdfundLedger, ()));
    client.init(&Address::generate(&env), &sac.address());
    (env, client, sac_admin)
}

fn open(env: &Env, client: &CrowdfundLedgerClient, goal: i128) -> (u64, Address) {
    let creator = Address::generate(env);
    let id = client.create_campaign(
        &creator,
        &String::from_str(env, "Library Roof"),
        &String::from_str(env, "Patch the leaks before winter"),
        &String::from_str(env, "ROOF"),
        &goal,
    );
    (id, creator)
}

#[test]
fn test_one_badge_per_whole_unit() {
    let (env, client, sac) = setup();
    let (id, _) = open(&env, &client, 10 * ONE_UNIT);
    let alice = Address::generate(&env);
    sac.mint(&alice, &(3 * ONE_UNIT));

    client.contribute(&id, &alice, &ONE_UNIT);
    client.contribute(&id, &alice, &(2 * ONE_UNIT));
    assert_eq!(client.eligible_badges(&id, &alice), 3);

    for _ in 0..3 {
        client.mint_badge(&id, &alice);
    }
    assert_eq!(client.minted_badges_of(&id, &alice), 3);
    assert_eq!(client.badge_balance(&id, &alice), 3);
    assert_eq!(client.eligible_badges(&id, &alice), 0);
    assert_eq!(client.try_mint_badge(&id, &alice), Err(Ok(Error::NoEligibleBadge)));
}

#[test]
fn test_fractional_units_do_not_earn_badges() {
    let (env, client, sac) = setup();
    let (id, _) = open(&env, &client, 10 * ONE_UNIT);
    let alice = Address::generate(&env);
    sac.mint(&alice, &(2 * ONE_UNIT));

    client.contribute(&id, &alice, &(ONE_UNIT - 1));
    assert_eq!(client.try_mint_badge(&id, &alice), Err(Ok(Error::NoEligibleBadge)));

    // Topping up past the unit boundary unlocks the first badge.
    client.contribute(&id, &alice, &(ONE_UNIT / 2));
    assert_eq!(client.eligible_badges(&id, &alice), 1);
    client.mint_badge(&id, &alice);
    assert_eq!(client.try_mint_badge(&id, &alice), Err(Ok(Error::NoEligibleBadge)));
}

#[test]
fn test_minting_allowed_after_cancel() {
    let (env, client, sac) = setup();
    let (id, creator) = open(&env, &client, 10 * ONE_UNIT);
    let alice = Address::generate(&env);
    sac.mint(&alice, &(2 * ONE_UNIT));

    client.contribute(&id, &alice, &(2 * ONE_UNIT));
    client.cancel(&id, &creator);

    client.mint_badge(&id, &alice);
    client.mint_badge(&id, &alice);
    assert_eq!(client.badge_balance(&id, &alice), 2);
}

#[test]
fn test_minting_allowed_after_withdraw_and_expiry() {
    let (env, client, sac) = setup();
    let (id, creator) = open(&env, &client, ONE_UNIT);
    let alice = Address::generate(&env);
    sac.mint(&alice, &ONE_UNIT);

    client.contribute(&id, &alice, &ONE_UNIT);
    client.withdraw(&id, &creator);
    env.ledger().set_timestamp(1_700_000_000 + FUNDRAISING_WINDOW + 1);

    client.mint_badge(&id, &alice);
    assert_eq!(client.badge_balance(&id, &alice), 1);
}

#[test]
fn test_refund_forfeits_unclaimed_badges() {
    let (env, client, sac) = setup();
    let (id, creator) = open(&env, &client, 10 * ONE_UNIT);
    let alice = Address::generate(&env);
    sac.mint(&alice, &(2 * ONE_UNIT));

    client.contribute(&id, &alice, &(2 * ONE_UNIT));
    client.mint_badge(&id, &alice);
    client.cancel(&id, &creator);
    client.refund(&id, &alice);

    // The badge already claimed stays with its holder.
    assert_eq!(client.badge_balance(&id, &alice), 1);
    assert_eq!(client.eligible_badges(&id, &alice), 0);
    assert_eq!(client.try_mint_badge(&id, &alice), Err(Ok(Error::NoEligibleBadge)));
}

#[test]
fn test_badge_ids_unique_across_campaigns() {
    let (env, client, sac) = setup();
    let (first, _) = open(&env, &client, 10 * ONE_UNIT);
    let (second, _) = open(&env, &client, 10 * ONE_UNIT);
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);
    sac.mint(&alice, &ONE_UNIT);
    sac.mint(&bob, &(2 * ONE_UNIT));

    client.contribute(&first, &alice, &ONE_UNIT);
    client.contribute(&second, &bob, &(2 * ONE_UNIT));

    let a0 = client.mint_badge(&first, &alice);
    let b0 = client.mint_badge(&second, &bob);
    let b1 = client.mint_badge(&second, &bob);
    assert_eq!((a0, b0, b1), (0, 1, 2));

    let record = client.badge_owner(&b0).unwrap();
    assert_eq!(record.owner, bob);
    assert_eq!(record.campaign_id, second);
    assert_eq!(client.badge_owner(&a0).unwrap().campaign_id, first);
    assert_eq!(client.badge_owner(&99), None);

    // Collections are per campaign.
    assert_eq!(client.badge_balance(&first, &bob), 0);
    assert_eq!(client.badge_balance(&second, &alice), 0);
}

#[test]
fn test_mint_on_unknown_campaign() {
    let (env, client, _) = setup();
    let alice = Address::generate(&env);
    assert_eq!(client.try_mint_badge(&3, &alice), Err(Ok(Error::CampaignNotFound)));
}
