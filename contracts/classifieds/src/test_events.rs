extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    token, vec, Address, Env, IntoVal, TryIntoVal,
};

use crate::events::{AdCancelled, AdCreated, AdResolved};
use crate::{Asset, Classifieds, ClassifiedsClient, TokenLot};

fn setup() -> (Env, ClassifiedsClient<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(Classifieds, ());
    let client = ClassifiedsClient::new(&env, &contract_id);
    (env, client)
}

fn funded_account<'a>(env: &Env, amount: i128) -> (Address, token::Client<'a>) {
    let token_admin = Address::generate(env);
    let sac = env.register_stellar_asset_contract_v2(token_admin);
    let poster = Address::generate(env);
    token::StellarAssetClient::new(env, &sac.address()).mint(&poster, &amount);
    (poster, token::Client::new(env, &sac.address()))
}

fn lot(token: &token::Client, amount: i128) -> Asset {
    Asset::Fungible(TokenLot {
        contract: token.address.clone(),
        amount,
    })
}

#[test]
fn test_ad_created_event() {
    let (env, client) = setup();
    let (poster, token) = funded_account(&env, 1_000);

    let hash = client.new_ad(&poster, &lot(&token, 1_000), &0);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("created"), ad hash)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        hash.clone().into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    // Data: AdCreated struct
    let event_data: AdCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        AdCreated {
            ad: hash,
            poster: poster.clone(),
            minute: env.ledger().timestamp() / 60,
        }
    );
}

#[test]
fn test_ad_resolved_event() {
    let (env, client) = setup();
    let (poster, token_a) = funded_account(&env, 1_000);
    let (filler, token_b) = funded_account(&env, 250);

    let ad_hash = client.new_ad(&poster, &lot(&token_a, 1_000), &0);
    let filler_hash = client.fill_ad(&filler, &ad_hash, &lot(&token_b, 250));
    client.resolve_ad(&poster, &ad_hash, &filler_hash);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("resolved").into_val(&env),
        ad_hash.clone().into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: AdResolved = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        AdResolved {
            ad: ad_hash,
            filler: filler_hash,
        }
    );
}

#[test]
fn test_ad_cancelled_event() {
    let (env, client) = setup();
    let (poster, token) = funded_account(&env, 1_000);

    let ad_hash = client.new_ad(&poster, &lot(&token, 1_000), &0);
    client.cancel_ad(&poster, &ad_hash);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("cancelled").into_val(&env),
        ad_hash.clone().into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: AdCancelled = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        AdCancelled {
            ad: ad_hash,
            poster,
        }
    );
}
