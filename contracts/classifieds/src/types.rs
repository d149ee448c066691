//! # Types
//!
//! Shared data structures of the classifieds market.
//!
//! ## Design decisions
//!
//! ### Asset as a tagged enum
//!
//! An [`Asset`] is either a fungible-token lot (contract + amount) or a
//! single non-fungible token (contract + id). Both sides of a trade pick
//! their kind independently, so an ad offering fungible units can be filled
//! with an NFT and vice versa. These are the only two kinds; there is no
//! generic asset abstraction.
//!
//! ### Status as a Finite-State Machine
//!
//! [`AdStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Open ──► Filled ──► Resolved
//!   │         └─────► Cancelled
//!   ├──► Resolved
//!   └──► Cancelled
//! ```
//!
//! `Resolved` and `Cancelled` are terminal. Exactly one of them is ever
//! reached per ad, and [`AdStatus::can_become`] is the single source of
//! truth for which moves are legal.

use soroban_sdk::{contracttype, Address, BytesN};

/// Lifecycle status of an ad.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AdStatus {
    /// Accepting fillers; no candidate registered yet.
    Open,
    /// At least one filler registered; still accepting more.
    Filled,
    /// Poster picked a filler; custody swapped, everyone else refunded.
    Resolved,
    /// Poster withdrew the ad; all deposits returned.
    Cancelled,
}

impl AdStatus {
    /// Whether the ad still accepts fillers and poster actions.
    pub fn is_open(&self) -> bool {
        matches!(self, AdStatus::Open | AdStatus::Filled)
    }

    /// The legal-transition table of the ad lifecycle.
    pub fn can_become(&self, next: &AdStatus) -> bool {
        matches!(
            (self, next),
            (AdStatus::Open, AdStatus::Filled)
                | (AdStatus::Open, AdStatus::Resolved)
                | (AdStatus::Open, AdStatus::Cancelled)
                | (AdStatus::Filled, AdStatus::Resolved)
                | (AdStatus::Filled, AdStatus::Cancelled)
        )
    }
}

/// A quantity of a fungible token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenLot {
    /// Token ledger contract.
    pub contract: Address,
    /// Exact amount traded; no partial fills.
    pub amount: i128,
}

/// A single non-fungible token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NftLot {
    /// Token ledger contract.
    pub contract: Address,
    /// Token id within the ledger.
    pub id: u64,
}

/// One side of a trade: what an account deposits into contract custody.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Asset {
    Fungible(TokenLot),
    NonFungible(NftLot),
}

/// An open offer to trade, identified by a 32-byte content hash.
///
/// The offered asset is held by the contract from `new_ad` until the ad is
/// resolved or cancelled.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ad {
    /// Account that opened the ad and owns the custodied offer.
    pub poster: Address,
    /// The custodied lot.
    pub offer: Asset,
    /// Ledger timestamp after which the ad no longer accepts fillers;
    /// `0` means no expiry. Expiry never blocks poster actions.
    pub expiry: u64,
    /// Ledger timestamp at creation; `created_at / 60` is the minute bucket
    /// the ad is indexed under.
    pub created_at: u64,
    /// Current lifecycle status.
    pub status: AdStatus,
}

/// A candidate counter-offer registered against an ad, identified by its own
/// content hash and indexed per ad in insertion order.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Filler {
    /// Account that deposited the counter-offer.
    pub account: Address,
    /// The custodied counter-lot.
    pub offer: Asset,
    /// Hash of the ad this candidate belongs to.
    pub ad: BytesN<32>,
}
