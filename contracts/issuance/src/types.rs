//! Shared data structures of the issuance lifecycle.
//!
//! Config and terms are stored separately: [`IssuanceConfig`] is written once
//! at `init` and never mutated, while [`Terms`] is writable during the setup
//! phase and frozen once the issuance opens (leaving setup requires a
//! positive issue price).

use soroban_sdk::{contracttype, Address};

/// Immutable wiring, written once at `init`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IssuanceConfig {
    /// External access-control registry consulted for admin actions.
    pub access: Address,
    /// Token minted to investors at distribution.
    pub issuance_token: Address,
    /// Token investors pay with.
    pub accepted_token: Address,
}

/// Economic terms, adjustable while the machine rests on the setup state.
///
/// Zero means "unset" for every field; `issue_price` must be set before the
/// issuance can open, the rest are optional.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Terms {
    /// Accepted-token units per issuance-token unit. Investments must be an
    /// exact multiple.
    pub issue_price: i128,
    /// Smallest acceptable single investment.
    pub min_investment: i128,
    /// Minimum total raised before distribution may start.
    pub soft_cap: i128,
    /// Earliest ledger timestamp at which the issuance may open.
    pub opening_date: u64,
    /// Ledger timestamp after which no new investments are taken.
    pub closing_date: u64,
}

impl Terms {
    /// All-unset terms recorded at `init`.
    pub fn unset() -> Self {
        Terms {
            issue_price: 0,
            min_investment: 0,
            soft_cap: 0,
            opening_date: 0,
            closing_date: 0,
        }
    }
}
