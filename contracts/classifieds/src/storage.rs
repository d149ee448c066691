//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers used by the classifieds
//! market:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key        | Type  | Description                                 |
//! |------------|-------|---------------------------------------------|
//! | `AdNonce`  | `u64` | Salt counter mixed into ad and filler hashes |
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                | Type               | Description                      |
//! |--------------------|--------------------|----------------------------------|
//! | `Ad(hash)`         | `Ad`               | Ad record keyed by content hash  |
//! | `Filler(hash)`     | `Filler`           | Candidate counter-offer          |
//! | `AdsByMinute(min)` | `Vec<BytesN<32>>`  | Ads created in that minute       |
//! | `FillersByAd(ad)`  | `Vec<BytesN<32>>`  | Filler hashes in insertion order |
//!
//! The index vectors are append-only: entries are never removed, even after
//! an ad closes, so sequence positions handed to off-chain callers stay
//! stable forever.

use soroban_sdk::{contracttype, BytesN, Env, Vec};

use crate::types::{Ad, Filler};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Global salt counter for content hashes (Instance).
    AdNonce,
    /// Ad record keyed by its content hash (Persistent).
    Ad(BytesN<32>),
    /// Filler record keyed by its content hash (Persistent).
    Filler(BytesN<32>),
    /// Hashes of ads created during a given minute (Persistent).
    AdsByMinute(u64),
    /// Filler hashes registered against a given ad (Persistent).
    FillersByAd(BytesN<32>),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Atomically reads, increments, and stores the hash-salt counter.
/// Returns the value to mix into the *current* record's hash.
pub fn next_nonce(env: &Env) -> u64 {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::AdNonce)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::AdNonce, &(current + 1));
    current
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Store an ad record under its content hash.
pub fn save_ad(env: &Env, hash: &BytesN<32>, ad: &Ad) {
    let key = DataKey::Ad(hash.clone());
    env.storage().persistent().set(&key, ad);
    bump_persistent(env, &key);
}

/// Load an ad record, or `None` if the hash is unknown.
pub fn load_ad(env: &Env, hash: &BytesN<32>) -> Option<Ad> {
    let key = DataKey::Ad(hash.clone());
    let ad: Option<Ad> = env.storage().persistent().get(&key);
    if ad.is_some() {
        bump_persistent(env, &key);
    }
    ad
}

/// Store a filler record under its content hash.
pub fn save_filler(env: &Env, hash: &BytesN<32>, filler: &Filler) {
    let key = DataKey::Filler(hash.clone());
    env.storage().persistent().set(&key, filler);
    bump_persistent(env, &key);
}

/// Load a filler record, or `None` if the hash is unknown.
pub fn load_filler(env: &Env, hash: &BytesN<32>) -> Option<Filler> {
    let key = DataKey::Filler(hash.clone());
    let filler: Option<Filler> = env.storage().persistent().get(&key);
    if filler.is_some() {
        bump_persistent(env, &key);
    }
    filler
}

/// Append an ad hash to its creation-minute bucket.
pub fn push_minute_index(env: &Env, minute: u64, hash: &BytesN<32>) {
    let key = DataKey::AdsByMinute(minute);
    let mut bucket: Vec<BytesN<32>> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env));
    bucket.push_back(hash.clone());
    env.storage().persistent().set(&key, &bucket);
    bump_persistent(env, &key);
}

/// All ads created during `minute`, in creation order.
pub fn minute_index(env: &Env, minute: u64) -> Vec<BytesN<32>> {
    let key = DataKey::AdsByMinute(minute);
    env.storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env))
}

/// Append a filler hash to an ad's sequential index.
pub fn push_ad_filler(env: &Env, ad_hash: &BytesN<32>, filler_hash: &BytesN<32>) {
    let key = DataKey::FillersByAd(ad_hash.clone());
    let mut index: Vec<BytesN<32>> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env));
    index.push_back(filler_hash.clone());
    env.storage().persistent().set(&key, &index);
    bump_persistent(env, &key);
}

/// All filler hashes registered against `ad_hash`, in insertion order.
pub fn ad_fillers(env: &Env, ad_hash: &BytesN<32>) -> Vec<BytesN<32>> {
    let key = DataKey::FillersByAd(ad_hash.clone());
    env.storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env))
}
