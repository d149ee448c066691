#![allow(dead_code)]

extern crate std;

use crate::types::{Ad, AdStatus, Asset};

/// INV-1: Fungible lots always carry a positive amount once recorded.
pub fn assert_ad_well_formed(ad: &Ad) {
    if let Asset::Fungible(lot) = &ad.offer {
        assert!(
            lot.amount > 0,
            "INV-1 violated: recorded ad carries non-positive amount {}",
            lot.amount
        );
    }
}

/// INV-2: Status moves only along the legal-transition table.
pub fn assert_status_transition_valid(from: &AdStatus, to: &AdStatus) {
    assert!(
        from.can_become(to),
        "INV-2 violated: invalid status transition from {:?} to {:?}",
        from,
        to
    );
}

/// INV-3: Terminal statuses have no outgoing transitions at all.
pub fn assert_terminal(status: &AdStatus) {
    for next in [
        AdStatus::Open,
        AdStatus::Filled,
        AdStatus::Resolved,
        AdStatus::Cancelled,
    ] {
        assert!(
            !status.can_become(&next),
            "INV-3 violated: terminal status {:?} can still become {:?}",
            status,
            next
        );
    }
}

/// INV-4: Custody conservation over a settled ad — everything deposited was
/// released, nothing more.
pub fn assert_custody_conserved(deposited: i128, released: i128) {
    assert_eq!(
        deposited, released,
        "INV-4 violated: deposited {} but released {}",
        deposited, released
    );
}
