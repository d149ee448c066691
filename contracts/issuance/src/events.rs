//! Typed event payloads and emission helpers.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

/// Published when the machine leaves setup and investments open.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IssuanceOpened {
    pub at: u64,
}

/// Published on every accepted investment.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvestmentMade {
    pub investor: Address,
    pub amount: i128,
}

/// Published when an investor reclaims their outstanding investment.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvestmentCancelled {
    pub investor: Address,
    pub amount: i128,
}

/// Published when the machine enters the live state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributionStarted {
    pub amount_raised: i128,
}

/// Published for each investor paid out during distribution.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensDistributed {
    pub investor: Address,
    /// Issuance-token units minted.
    pub amount: i128,
}

/// Published when the machine enters the failed state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IssuanceFailed {
    pub at: u64,
}

pub fn emit_issuance_opened(env: &Env) {
    env.events().publish(
        (symbol_short!("opened"),),
        IssuanceOpened {
            at: env.ledger().timestamp(),
        },
    );
}

pub fn emit_investment_made(env: &Env, investor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("invested"), investor.clone()),
        InvestmentMade { investor, amount },
    );
}

pub fn emit_investment_cancelled(env: &Env, investor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("refunded"), investor.clone()),
        InvestmentCancelled { investor, amount },
    );
}

pub fn emit_distribution_started(env: &Env, amount_raised: i128) {
    env.events().publish(
        (symbol_short!("live"),),
        DistributionStarted { amount_raised },
    );
}

pub fn emit_tokens_distributed(env: &Env, investor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("issued"), investor.clone()),
        TokensDistributed { investor, amount },
    );
}

pub fn emit_issuance_failed(env: &Env) {
    env.events().publish(
        (symbol_short!("failed"),),
        IssuanceFailed {
            at: env.ledger().timestamp(),
        },
    );
}
