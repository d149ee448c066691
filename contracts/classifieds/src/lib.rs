//! # Classifieds Market Contract
//!
//! A peer-to-peer escrow market: an account posts an ad offering an asset,
//! any number of candidates fill it with counter-offers, and the poster
//! settles by picking exactly one — or by cancelling. The contract holds
//! every deposited asset in custody between those points.
//!
//! | Phase      | Entry Point(s)                                     |
//! |------------|----------------------------------------------------|
//! | Posting    | [`Classifieds::new_ad`]                            |
//! | Filling    | [`Classifieds::fill_ad`]                           |
//! | Settlement | [`Classifieds::resolve_ad`], [`Classifieds::cancel_ad`] |
//! | Queries    | `get_ad`, `get_filler`, `ads_by_creation_date_in_min`, `fillers_by_ad` |
//!
//! ## Discovery
//!
//! Ads and fillers are keyed by content hashes, not sequential ids. Off-chain
//! callers enumerate through the minute-bucket index (ads created in a given
//! minute, by sequence) and the per-ad filler index. There is deliberately no
//! "list all open ads" entry point.
//!
//! ## Custody discipline
//!
//! `resolve_ad` and `cancel_ad` persist the terminal status *before* issuing
//! any token-ledger call, so a malicious ledger re-entering the contract
//! observes the ad as closed. Deposit paths pull custody first and record
//! after; their records are salted by a global nonce, so re-entry can only
//! create independent records. Every ledger call goes through a `try_` client
//! and a failure aborts the whole invocation, which the host then rolls back.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, token, xdr::ToXdr, Address, Bytes, BytesN, Env,
};

mod events;
mod nft;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use nft::{NonFungible, NonFungibleClient};
pub use types::{Ad, AdStatus, Asset, Filler, NftLot, TokenLot};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// No ad is recorded under the given hash.
    AdNotFound = 1,
    /// No filler is recorded under the given hash, or it belongs to a
    /// different ad.
    FillerNotFound = 2,
    /// The ad was already resolved or cancelled.
    AdClosed = 3,
    /// The ad's expiry passed; it no longer accepts fillers.
    AdExpired = 4,
    /// Caller is not the ad's poster.
    NotPoster = 5,
    /// Fungible lots must carry a positive amount.
    InvalidAmount = 6,
    /// A non-zero expiry must lie in the future.
    InvalidExpiry = 7,
    /// An external token ledger rejected a custody movement.
    TransferFailed = 8,
    /// Sequence index past the end of an enumeration bucket.
    IndexOutOfRange = 9,
}

#[contract]
pub struct Classifieds;

#[contractimpl]
impl Classifieds {
    // ─────────────────────────────────────────────────────────
    // Posting
    // ─────────────────────────────────────────────────────────

    /// Open a new ad offering `offer`, pulling it into contract custody.
    ///
    /// - `poster` must authorize; the offered lot is transferred from the
    ///   poster to the contract (the poster keeps no access to it until the
    ///   ad closes).
    /// - `expiry` is a ledger timestamp after which the ad stops accepting
    ///   fillers; `0` means the ad never expires.
    ///
    /// Returns the ad's content hash, which is also appended to the
    /// creation-minute bucket for discovery.
    pub fn new_ad(
        env: Env,
        poster: Address,
        offer: Asset,
        expiry: u64,
    ) -> Result<BytesN<32>, Error> {
        poster.require_auth();

        if let Asset::Fungible(lot) = &offer {
            if lot.amount <= 0 {
                return Err(Error::InvalidAmount);
            }
        }
        let now = env.ledger().timestamp();
        if expiry != 0 && expiry <= now {
            return Err(Error::InvalidExpiry);
        }

        pull_custody(&env, &poster, &offer)?;

        let nonce = storage::next_nonce(&env);
        let hash = ad_content_hash(&env, &poster, &offer, expiry, nonce);
        let ad = Ad {
            poster: poster.clone(),
            offer,
            expiry,
            created_at: now,
            status: AdStatus::Open,
        };
        storage::save_ad(&env, &hash, &ad);

        let minute = now / 60;
        storage::push_minute_index(&env, minute, &hash);

        events::emit_ad_created(&env, hash.clone(), poster, minute);
        Ok(hash)
    }

    // ─────────────────────────────────────────────────────────
    // Filling
    // ─────────────────────────────────────────────────────────

    /// Register a counter-offer against an open ad, pulling `offer` into
    /// contract custody.
    ///
    /// Filling is non-exclusive: any number of candidates may register until
    /// the poster settles. The first fill moves the ad from `Open` to
    /// `Filled`; later fills leave the status alone.
    ///
    /// Returns the filler record's content hash.
    pub fn fill_ad(
        env: Env,
        filler: Address,
        ad_hash: BytesN<32>,
        offer: Asset,
    ) -> Result<BytesN<32>, Error> {
        filler.require_auth();

        let ad = storage::load_ad(&env, &ad_hash).ok_or(Error::AdNotFound)?;
        if !ad.status.is_open() {
            return Err(Error::AdClosed);
        }
        let now = env.ledger().timestamp();
        if ad.expiry != 0 && now >= ad.expiry {
            return Err(Error::AdExpired);
        }
        if let Asset::Fungible(lot) = &offer {
            if lot.amount <= 0 {
                return Err(Error::InvalidAmount);
            }
        }

        pull_custody(&env, &filler, &offer)?;

        // Re-read: the pull ran ledger code that could have re-entered and
        // closed the ad. The stale copy must not overwrite that.
        let mut ad = storage::load_ad(&env, &ad_hash).ok_or(Error::AdNotFound)?;
        if !ad.status.is_open() {
            return Err(Error::AdClosed);
        }

        let nonce = storage::next_nonce(&env);
        let hash = filler_content_hash(&env, &filler, &offer, &ad_hash, nonce);
        let record = Filler {
            account: filler.clone(),
            offer,
            ad: ad_hash.clone(),
        };
        storage::save_filler(&env, &hash, &record);
        storage::push_ad_filler(&env, &ad_hash, &hash);

        if ad.status == AdStatus::Open {
            close_toward(&mut ad, AdStatus::Filled)?;
            storage::save_ad(&env, &ad_hash, &ad);
        }

        events::emit_ad_filled(&env, ad_hash, hash.clone(), filler);
        Ok(hash)
    }

    // ─────────────────────────────────────────────────────────
    // Settlement
    // ─────────────────────────────────────────────────────────

    /// Settle an ad by picking one registered filler. Poster only.
    ///
    /// Atomically: the poster's custodied lot goes to the selected filler,
    /// the selected filler's lot goes to the poster, and every *other*
    /// registered filler gets their deposit back. This is the only path by
    /// which a trade completes; selection is entirely at the poster's
    /// discretion.
    ///
    /// Works on expired ads too — expiry gates filling, not settlement.
    pub fn resolve_ad(
        env: Env,
        caller: Address,
        ad_hash: BytesN<32>,
        filler_hash: BytesN<32>,
    ) -> Result<(), Error> {
        caller.require_auth();

        let mut ad = storage::load_ad(&env, &ad_hash).ok_or(Error::AdNotFound)?;
        if caller != ad.poster {
            return Err(Error::NotPoster);
        }

        let selected = storage::load_filler(&env, &filler_hash).ok_or(Error::FillerNotFound)?;
        if selected.ad != ad_hash {
            return Err(Error::FillerNotFound);
        }

        // Terminal status lands in storage before any ledger call.
        close_toward(&mut ad, AdStatus::Resolved)?;
        storage::save_ad(&env, &ad_hash, &ad);

        release_custody(&env, &selected.account, &ad.offer)?;
        release_custody(&env, &ad.poster, &selected.offer)?;

        for other_hash in storage::ad_fillers(&env, &ad_hash).iter() {
            if other_hash == filler_hash {
                continue;
            }
            let other = storage::load_filler(&env, &other_hash).ok_or(Error::FillerNotFound)?;
            release_custody(&env, &other.account, &other.offer)?;
        }

        events::emit_ad_resolved(&env, ad_hash, filler_hash);
        Ok(())
    }

    /// Withdraw an ad. Poster only, at most once, mutually exclusive with
    /// `resolve_ad`.
    ///
    /// Returns the poster's custodied lot and refunds every registered
    /// filler. An ad with no fillers cancels trivially. Works on expired
    /// ads too.
    pub fn cancel_ad(env: Env, caller: Address, ad_hash: BytesN<32>) -> Result<(), Error> {
        caller.require_auth();

        let mut ad = storage::load_ad(&env, &ad_hash).ok_or(Error::AdNotFound)?;
        if caller != ad.poster {
            return Err(Error::NotPoster);
        }

        // Terminal status lands in storage before any ledger call.
        close_toward(&mut ad, AdStatus::Cancelled)?;
        storage::save_ad(&env, &ad_hash, &ad);

        release_custody(&env, &ad.poster, &ad.offer)?;

        for filler_hash in storage::ad_fillers(&env, &ad_hash).iter() {
            let filler = storage::load_filler(&env, &filler_hash).ok_or(Error::FillerNotFound)?;
            release_custody(&env, &filler.account, &filler.offer)?;
        }

        events::emit_ad_cancelled(&env, ad_hash, ad.poster);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// The ad recorded under `ad_hash`.
    pub fn get_ad(env: Env, ad_hash: BytesN<32>) -> Result<Ad, Error> {
        storage::load_ad(&env, &ad_hash).ok_or(Error::AdNotFound)
    }

    /// The filler recorded under `filler_hash`.
    pub fn get_filler(env: Env, filler_hash: BytesN<32>) -> Result<Filler, Error> {
        storage::load_filler(&env, &filler_hash).ok_or(Error::FillerNotFound)
    }

    /// Hash of the `seq`-th ad created during `minute`
    /// (a Unix timestamp divided by 60).
    pub fn ads_by_creation_date_in_min(
        env: Env,
        minute: u64,
        seq: u32,
    ) -> Result<BytesN<32>, Error> {
        storage::minute_index(&env, minute)
            .get(seq)
            .ok_or(Error::IndexOutOfRange)
    }

    /// Hash of the `seq`-th filler registered against `ad_hash`.
    pub fn fillers_by_ad(env: Env, ad_hash: BytesN<32>, seq: u32) -> Result<BytesN<32>, Error> {
        storage::ad_fillers(&env, &ad_hash)
            .get(seq)
            .ok_or(Error::IndexOutOfRange)
    }
}

// ─────────────────────────────────────────────────────────────
// Internals
// ─────────────────────────────────────────────────────────────

/// Advance an ad's status along the legal-transition table, or fail with
/// `AdClosed` when the ad is already terminal.
fn close_toward(ad: &mut Ad, next: AdStatus) -> Result<(), Error> {
    if !ad.status.can_become(&next) {
        return Err(Error::AdClosed);
    }
    ad.status = next;
    Ok(())
}

/// Pull `asset` from `from` into contract custody.
fn pull_custody(env: &Env, from: &Address, asset: &Asset) -> Result<(), Error> {
    move_asset(env, asset, from, &env.current_contract_address())
}

/// Release `asset` from contract custody to `to`.
fn release_custody(env: &Env, to: &Address, asset: &Asset) -> Result<(), Error> {
    move_asset(env, asset, &env.current_contract_address(), to)
}

/// Move an asset between two accounts on its external ledger. Any ledger
/// failure surfaces as `TransferFailed`.
fn move_asset(env: &Env, asset: &Asset, from: &Address, to: &Address) -> Result<(), Error> {
    match asset {
        Asset::Fungible(lot) => {
            let client = token::Client::new(env, &lot.contract);
            match client.try_transfer(from, to, &lot.amount) {
                Ok(Ok(())) => Ok(()),
                _ => Err(Error::TransferFailed),
            }
        }
        Asset::NonFungible(lot) => {
            let client = NonFungibleClient::new(env, &lot.contract);
            match client.try_transfer(from, to, &lot.id) {
                Ok(Ok(())) => Ok(()),
                _ => Err(Error::TransferFailed),
            }
        }
    }
}

/// Content hash identifying an ad: keccak-256 over the immutable fields plus
/// a global nonce, so otherwise-identical ads never collide.
fn ad_content_hash(
    env: &Env,
    poster: &Address,
    offer: &Asset,
    expiry: u64,
    nonce: u64,
) -> BytesN<32> {
    let mut payload = Bytes::new(env);
    payload.append(&poster.clone().to_xdr(env));
    payload.append(&offer.clone().to_xdr(env));
    payload.append(&expiry.to_xdr(env));
    payload.append(&nonce.to_xdr(env));
    env.crypto().keccak256(&payload).into()
}

/// Content hash identifying a filler record; includes the ad hash so a
/// candidate is bound to the ad it was registered against.
fn filler_content_hash(
    env: &Env,
    account: &Address,
    offer: &Asset,
    ad_hash: &BytesN<32>,
    nonce: u64,
) -> BytesN<32> {
    let mut payload = Bytes::new(env);
    payload.append(&account.clone().to_xdr(env));
    payload.append(&offer.clone().to_xdr(env));
    payload.append(&ad_hash.clone().to_xdr(env));
    payload.append(&nonce.to_xdr(env));
    env.crypto().keccak256(&payload).into()
}
