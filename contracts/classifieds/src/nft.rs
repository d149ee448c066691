//! Client-side interface of an external non-fungible token ledger.
//!
//! The market only needs custody movement and ownership lookup, so the
//! interface is deliberately minimal. Any contract implementing these two
//! entry points can back the non-fungible side of a trade.

use soroban_sdk::{contractclient, Address, Env};

#[contractclient(name = "NonFungibleClient")]
pub trait NonFungible {
    /// Move token `id` from `from` to `to`. `from` must authorize.
    fn transfer(env: Env, from: Address, to: Address, id: u64);

    /// Current owner of token `id`.
    fn owner_of(env: Env, id: u64) -> Address;
}
