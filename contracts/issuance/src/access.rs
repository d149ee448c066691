//! Client-side interface of the external access-control registry.
//!
//! Authorization is fully delegated: this contract never stores roles, it
//! only asks the registry configured at `init` whether an account holds one.

use soroban_sdk::{contractclient, symbol_short, Address, Env, Symbol};

use crate::Error;

/// Role required for lifecycle administration (terms, transitions).
pub const ADMIN_ROLE: Symbol = symbol_short!("ADMIN");

#[contractclient(name = "AccessControlClient")]
pub trait AccessControl {
    /// Whether `account` currently holds `role`.
    fn has_role(env: Env, account: Address, role: Symbol) -> bool;
}

/// Fail with `NotAuthorized` unless the registry confirms the role.
pub fn require_role(
    env: &Env,
    registry: &Address,
    account: &Address,
    role: &Symbol,
) -> Result<(), Error> {
    let client = AccessControlClient::new(env, registry);
    if !client.has_role(account, role) {
        return Err(Error::NotAuthorized);
    }
    Ok(())
}
