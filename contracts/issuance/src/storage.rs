//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers used by the issuance:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type           | Description                          |
//! |----------------|----------------|--------------------------------------|
//! | `Config`       | `IssuanceConfig` | Immutable wiring from `init`       |
//! | `Terms`        | `Terms`        | Economic terms (frozen after setup)  |
//! | `Machine`      | `StateMachine` | Lifecycle graph + current state      |
//! | `AmountRaised` | `i128`         | Total accepted-token custody         |
//! | `Investors`    | `Vec<Address>` | First-investment order               |
//! | `NextInvestor` | `u32`          | Distribution cursor                  |
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                   | Type   | Description                      |
//! |-----------------------|--------|----------------------------------|
//! | `Investment(account)` | `i128` | Outstanding investment; zeroed on refund or distribution |

use soroban_sdk::{contracttype, Address, Env, Vec};

use state_machine::StateMachine;

use crate::types::{IssuanceConfig, Terms};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    Terms,
    Machine,
    AmountRaised,
    Investors,
    NextInvestor,
    Investment(Address),
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

// ── Config / Terms / Machine ─────────────────────────────────────────

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn save_config(env: &Env, config: &IssuanceConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn load_config(env: &Env) -> Option<IssuanceConfig> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Config)
}

pub fn save_terms(env: &Env, terms: &Terms) {
    env.storage().instance().set(&DataKey::Terms, terms);
    bump_instance(env);
}

pub fn load_terms(env: &Env) -> Option<Terms> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Terms)
}

pub fn save_machine(env: &Env, machine: &StateMachine) {
    env.storage().instance().set(&DataKey::Machine, machine);
    bump_instance(env);
}

pub fn load_machine(env: &Env) -> Option<StateMachine> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Machine)
}

// ── Raise bookkeeping ────────────────────────────────────────────────

pub fn amount_raised(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::AmountRaised)
        .unwrap_or(0)
}

pub fn add_amount_raised(env: &Env, amount: i128) {
    let total = amount_raised(env) + amount;
    env.storage().instance().set(&DataKey::AmountRaised, &total);
    bump_instance(env);
}

pub fn sub_amount_raised(env: &Env, amount: i128) {
    let total = amount_raised(env) - amount;
    env.storage().instance().set(&DataKey::AmountRaised, &total);
    bump_instance(env);
}

// ── Investor queue ───────────────────────────────────────────────────

pub fn investors(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::Investors)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn push_investor(env: &Env, investor: &Address) {
    let mut queue = investors(env);
    queue.push_back(investor.clone());
    env.storage().instance().set(&DataKey::Investors, &queue);
    bump_instance(env);
}

pub fn next_investor(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::NextInvestor)
        .unwrap_or(0)
}

pub fn set_next_investor(env: &Env, cursor: u32) {
    env.storage()
        .instance()
        .set(&DataKey::NextInvestor, &cursor);
    bump_instance(env);
}

// ── Per-investor records ─────────────────────────────────────────────

/// Outstanding investment of `investor`; zero when none recorded.
pub fn investment(env: &Env, investor: &Address) -> i128 {
    let key = DataKey::Investment(investor.clone());
    let amount: i128 = env.storage().persistent().get(&key).unwrap_or(0);
    if amount != 0 {
        bump_persistent(env, &key);
    }
    amount
}

pub fn set_investment(env: &Env, investor: &Address, amount: i128) {
    let key = DataKey::Investment(investor.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}
