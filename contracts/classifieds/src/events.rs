//! Typed event payloads and emission helpers.
//!
//! Every state-mutating entry point publishes exactly one event after its
//! storage writes, keyed by a short symbol topic plus the ad hash so
//! off-chain consumers can filter per ad.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env};

/// Published by `new_ad` once the ad is recorded and indexed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdCreated {
    pub ad: BytesN<32>,
    pub poster: Address,
    /// Minute bucket the ad was indexed under (`created_at / 60`).
    pub minute: u64,
}

/// Published by `fill_ad` once the candidate is recorded.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdFilled {
    pub ad: BytesN<32>,
    pub filler: BytesN<32>,
    pub account: Address,
}

/// Published by `resolve_ad` after the swap and refund loop.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdResolved {
    pub ad: BytesN<32>,
    /// The selected candidate.
    pub filler: BytesN<32>,
}

/// Published by `cancel_ad` after all deposits are returned.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdCancelled {
    pub ad: BytesN<32>,
    pub poster: Address,
}

pub fn emit_ad_created(env: &Env, ad: BytesN<32>, poster: Address, minute: u64) {
    env.events().publish(
        (symbol_short!("created"), ad.clone()),
        AdCreated { ad, poster, minute },
    );
}

pub fn emit_ad_filled(env: &Env, ad: BytesN<32>, filler: BytesN<32>, account: Address) {
    env.events().publish(
        (symbol_short!("filled"), ad.clone()),
        AdFilled {
            ad,
            filler,
            account,
        },
    );
}

pub fn emit_ad_resolved(env: &Env, ad: BytesN<32>, filler: BytesN<32>) {
    env.events().publish(
        (symbol_short!("resolved"), ad.clone()),
        AdResolved { ad, filler },
    );
}

pub fn emit_ad_cancelled(env: &Env, ad: BytesN<32>, poster: Address) {
    env.events().publish(
        (symbol_short!("cancelled"), ad.clone()),
        AdCancelled { ad, poster },
    );
}
