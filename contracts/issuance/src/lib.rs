//! # Issuance Contract
//!
//! A crowdfunding issuance whose lifecycle is driven by a composed
//! [`state_machine::StateMachine`]: investor actions are gated on the
//! machine's current state, admin actions are gated on an external
//! access-control registry, and custody moves through external token
//! ledgers.
//!
//! | Phase        | Entry Point(s)                                       |
//! |--------------|------------------------------------------------------|
//! | Bootstrap    | [`Issuance::init`]                                   |
//! | Setup        | `set_issue_price`, `set_min_investment`, `set_soft_cap`, `set_opening_date`, `set_closing_date` |
//! | Graph admin  | `create_state`, `create_transition`, `transition`    |
//! | Investing    | [`Issuance::open_issuance`], [`Issuance::invest`], [`Issuance::cancel_investment`], [`Issuance::cancel_all_investments`] |
//! | Distribution | [`Issuance::start_distribution`], [`Issuance::send_to_next_investor`] |
//! | Queries      | `current_state`, `state_exists`, `amount_raised`, `investment`, `get_terms`, `get_config` |
//!
//! ## Lifecycle
//!
//! ```text
//! SETUP ──► OPEN ──► LIVE
//!             └────► FAILED
//! ```
//!
//! The graph is built at `init` and may be extended (never shrunk) through
//! the graph-admin entry points. Every action follows the same shape:
//! assert state, act, maybe transition.
//!
//! ## Hooks
//!
//! Transitions run two host-side hooks around the machine's pointer move:
//! leaving `SETUP` requires complete terms (a positive issue price), and
//! entering `LIVE` rewinds the distribution cursor to the head of the
//! investor queue. A hook failure aborts the call and the ledger rolls the
//! whole invocation back.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, token, Address, Env, Symbol,
};

use state_machine::{StateMachine, SETUP_STATE};

pub mod access;
mod events;
mod storage;
mod types;


pub use access::{AccessControl, AccessControlClient, ADMIN_ROLE};
pub use types::{IssuanceConfig, Terms};

/// Investments are accepted while the machine rests here.
pub const OPEN_STATE: Symbol = symbol_short!("OPEN");
/// Distribution runs while the machine rests here.
pub const LIVE_STATE: Symbol = symbol_short!("LIVE");
/// Terminal state in which investors reclaim their deposits.
pub const FAILED_STATE: Symbol = symbol_short!("FAILED");

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    /// The registry does not grant the caller the required role.
    NotAuthorized = 3,
    /// `create_state` with a label that is already registered.
    StateAlreadyExists = 4,
    /// `create_transition` naming an unregistered endpoint.
    UnknownState = 5,
    /// No edge from the current state to the requested target.
    InvalidTransition = 6,
    /// The action requires a different current state.
    InvalidState = 7,
    /// Leaving setup requires a positive issue price.
    TermsNotSet = 8,
    /// The opening date has not been reached yet.
    NotYetOpen = 9,
    /// The closing date has passed; no new investments.
    IssuanceClosed = 10,
    InvalidAmount = 11,
    BelowMinimum = 12,
    /// Investments must be exact multiples of the issue price.
    NotAMultipleOfPrice = 13,
    SoftCapNotReached = 14,
    NothingToRefund = 15,
    /// The distribution queue is exhausted.
    NoMoreInvestors = 16,
    /// An external token ledger rejected a custody movement.
    TransferFailed = 17,
}

fn map_machine_err(err: state_machine::Error) -> Error {
    match err {
        state_machine::Error::AlreadyExists => Error::StateAlreadyExists,
        state_machine::Error::UnknownState => Error::UnknownState,
        state_machine::Error::InvalidTransition => Error::InvalidTransition,
    }
}

#[contract]
pub struct Issuance;

#[contractimpl]
impl Issuance {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Wire the contract and build the lifecycle graph.
    ///
    /// Must be called exactly once after deployment. `access` is the
    /// external registry consulted for the `ADMIN` role; `issuance_token`
    /// must have this contract as its mint admin before distribution starts.
    pub fn init(
        env: Env,
        access: Address,
        issuance_token: Address,
        accepted_token: Address,
    ) -> Result<(), Error> {
        if storage::has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }

        let mut machine = StateMachine::new(&env);
        machine.create_state(OPEN_STATE).map_err(map_machine_err)?;
        machine.create_state(LIVE_STATE).map_err(map_machine_err)?;
        machine
            .create_state(FAILED_STATE)
            .map_err(map_machine_err)?;
        machine
            .create_transition(SETUP_STATE, OPEN_STATE)
            .map_err(map_machine_err)?;
        machine
            .create_transition(OPEN_STATE, LIVE_STATE)
            .map_err(map_machine_err)?;
        machine
            .create_transition(OPEN_STATE, FAILED_STATE)
            .map_err(map_machine_err)?;
        storage::save_machine(&env, &machine);

        storage::save_config(
            &env,
            &IssuanceConfig {
                access,
                issuance_token,
                accepted_token,
            },
        );
        storage::save_terms(&env, &Terms::unset());
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Graph administration
    // ─────────────────────────────────────────────────────────

    /// Register an additional lifecycle state. Admin only.
    pub fn create_state(env: Env, caller: Address, state: Symbol) -> Result<(), Error> {
        Self::require_admin(&env, &caller)?;
        let mut machine = storage::load_machine(&env).ok_or(Error::NotInitialized)?;
        machine.create_state(state).map_err(map_machine_err)?;
        storage::save_machine(&env, &machine);
        Ok(())
    }

    /// Register an additional transition edge. Admin only.
    pub fn create_transition(
        env: Env,
        caller: Address,
        origin: Symbol,
        target: Symbol,
    ) -> Result<(), Error> {
        Self::require_admin(&env, &caller)?;
        let mut machine = storage::load_machine(&env).ok_or(Error::NotInitialized)?;
        machine
            .create_transition(origin, target)
            .map_err(map_machine_err)?;
        storage::save_machine(&env, &machine);
        Ok(())
    }

    /// Drive the machine along an existing edge. Admin only; runs the
    /// lifecycle hooks.
    pub fn transition(env: Env, caller: Address, target: Symbol) -> Result<(), Error> {
        Self::require_admin(&env, &caller)?;
        Self::apply_transition(&env, target)
    }

    // ─────────────────────────────────────────────────────────
    // Setup-phase terms
    // ─────────────────────────────────────────────────────────

    /// Set the accepted-token price per issuance-token unit. Admin only,
    /// setup only.
    pub fn set_issue_price(env: Env, caller: Address, issue_price: i128) -> Result<(), Error> {
        Self::require_admin(&env, &caller)?;
        Self::require_state(&env, &SETUP_STATE)?;
        if issue_price <= 0 {
            return Err(Error::InvalidAmount);
        }
        let mut terms = storage::load_terms(&env).ok_or(Error::NotInitialized)?;
        terms.issue_price = issue_price;
        storage::save_terms(&env, &terms);
        Ok(())
    }

    /// Set the smallest acceptable investment. Admin only, setup only.
    pub fn set_min_investment(
        env: Env,
        caller: Address,
        min_investment: i128,
    ) -> Result<(), Error> {
        Self::require_admin(&env, &caller)?;
        Self::require_state(&env, &SETUP_STATE)?;
        if min_investment < 0 {
            return Err(Error::InvalidAmount);
        }
        let mut terms = storage::load_terms(&env).ok_or(Error::NotInitialized)?;
        terms.min_investment = min_investment;
        storage::save_terms(&env, &terms);
        Ok(())
    }

    /// Set the minimum raise required before distribution. Admin only,
    /// setup only.
    pub fn set_soft_cap(env: Env, caller: Address, soft_cap: i128) -> Result<(), Error> {
        Self::require_admin(&env, &caller)?;
        Self::require_state(&env, &SETUP_STATE)?;
        if soft_cap < 0 {
            return Err(Error::InvalidAmount);
        }
        let mut terms = storage::load_terms(&env).ok_or(Error::NotInitialized)?;
        terms.soft_cap = soft_cap;
        storage::save_terms(&env, &terms);
        Ok(())
    }

    /// Set the earliest opening timestamp (0 = immediately). Admin only,
    /// setup only.
    pub fn set_opening_date(env: Env, caller: Address, opening_date: u64) -> Result<(), Error> {
        Self::require_admin(&env, &caller)?;
        Self::require_state(&env, &SETUP_STATE)?;
        let mut terms = storage::load_terms(&env).ok_or(Error::NotInitialized)?;
        terms.opening_date = opening_date;
        storage::save_terms(&env, &terms);
        Ok(())
    }

    /// Set the investment deadline (0 = none). Admin only, setup only.
    pub fn set_closing_date(env: Env, caller: Address, closing_date: u64) -> Result<(), Error> {
        Self::require_admin(&env, &caller)?;
        Self::require_state(&env, &SETUP_STATE)?;
        let mut terms = storage::load_terms(&env).ok_or(Error::NotInitialized)?;
        terms.closing_date = closing_date;
        storage::save_terms(&env, &terms);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Investing
    // ─────────────────────────────────────────────────────────

    /// Open the issuance for investments: SETUP → OPEN. Admin only.
    ///
    /// Fails with `NotYetOpen` before the opening date and with
    /// `TermsNotSet` if no issue price was configured.
    pub fn open_issuance(env: Env, caller: Address) -> Result<(), Error> {
        Self::require_admin(&env, &caller)?;
        let terms = storage::load_terms(&env).ok_or(Error::NotInitialized)?;
        if terms.opening_date != 0 && env.ledger().timestamp() < terms.opening_date {
            return Err(Error::NotYetOpen);
        }
        Self::apply_transition(&env, OPEN_STATE)?;
        events::emit_issuance_opened(&env);
        Ok(())
    }

    /// Invest `amount` of the accepted token.
    ///
    /// Requires the machine to rest on `OPEN` and the closing date (when
    /// set) not to have passed. The amount must meet the minimum and be an
    /// exact multiple of the issue price; custody moves into the contract.
    pub fn invest(env: Env, investor: Address, amount: i128) -> Result<(), Error> {
        investor.require_auth();
        Self::require_state(&env, &OPEN_STATE)?;

        let config = storage::load_config(&env).ok_or(Error::NotInitialized)?;
        let terms = storage::load_terms(&env).ok_or(Error::NotInitialized)?;
        if terms.closing_date != 0 && env.ledger().timestamp() >= terms.closing_date {
            return Err(Error::IssuanceClosed);
        }
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if amount < terms.min_investment {
            return Err(Error::BelowMinimum);
        }
        if amount % terms.issue_price != 0 {
            return Err(Error::NotAMultipleOfPrice);
        }

        let client = token::Client::new(&env, &config.accepted_token);
        match client.try_transfer(&investor, &env.current_contract_address(), &amount) {
            Ok(Ok(())) => {}
            _ => return Err(Error::TransferFailed),
        }

        let previous = storage::investment(&env, &investor);
        if previous == 0 && !storage::investors(&env).contains(&investor) {
            storage::push_investor(&env, &investor);
        }
        storage::set_investment(&env, &investor, previous + amount);
        storage::add_amount_raised(&env, amount);

        events::emit_investment_made(&env, investor, amount);
        Ok(())
    }

    /// Reclaim the caller's outstanding investment, allowed while `OPEN`
    /// or after the issuance `FAILED`.
    pub fn cancel_investment(env: Env, investor: Address) -> Result<(), Error> {
        investor.require_auth();

        let machine = storage::load_machine(&env).ok_or(Error::NotInitialized)?;
        let current = machine.current_state();
        if current != OPEN_STATE && current != FAILED_STATE {
            return Err(Error::InvalidState);
        }

        let amount = storage::investment(&env, &investor);
        if amount == 0 {
            return Err(Error::NothingToRefund);
        }

        // The record is zeroed before the refund call leaves the contract.
        storage::set_investment(&env, &investor, 0);
        storage::sub_amount_raised(&env, amount);

        let config = storage::load_config(&env).ok_or(Error::NotInitialized)?;
        let client = token::Client::new(&env, &config.accepted_token);
        match client.try_transfer(&env.current_contract_address(), &investor, &amount) {
            Ok(Ok(())) => {}
            _ => return Err(Error::TransferFailed),
        }

        events::emit_investment_cancelled(&env, investor, amount);
        Ok(())
    }

    /// Abort the issuance: OPEN → FAILED. Admin only. Investors then
    /// reclaim their deposits individually through `cancel_investment`.
    pub fn cancel_all_investments(env: Env, caller: Address) -> Result<(), Error> {
        Self::require_admin(&env, &caller)?;
        Self::apply_transition(&env, FAILED_STATE)?;
        events::emit_issuance_failed(&env);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Distribution
    // ─────────────────────────────────────────────────────────

    /// Close the raise and start distribution: OPEN → LIVE. Admin only;
    /// requires the soft cap to be met.
    pub fn start_distribution(env: Env, caller: Address) -> Result<(), Error> {
        Self::require_admin(&env, &caller)?;
        Self::require_state(&env, &OPEN_STATE)?;
        let terms = storage::load_terms(&env).ok_or(Error::NotInitialized)?;
        if storage::amount_raised(&env) < terms.soft_cap {
            return Err(Error::SoftCapNotReached);
        }
        Self::apply_transition(&env, LIVE_STATE)?;
        events::emit_distribution_started(&env, storage::amount_raised(&env));
        Ok(())
    }

    /// Mint issuance tokens to the next investor in the queue.
    ///
    /// Anyone may crank the queue while the machine rests on `LIVE`. Each
    /// crank consumes one outstanding investment, minting
    /// `investment / issue_price` issuance-token units. Returns whether any
    /// queue entries remain (later entries may already be consumed).
    pub fn send_to_next_investor(env: Env, caller: Address) -> Result<bool, Error> {
        caller.require_auth();
        Self::require_state(&env, &LIVE_STATE)?;

        let config = storage::load_config(&env).ok_or(Error::NotInitialized)?;
        let terms = storage::load_terms(&env).ok_or(Error::NotInitialized)?;
        let queue = storage::investors(&env);
        let mut cursor = storage::next_investor(&env);

        while let Some(investor) = queue.get(cursor) {
            let amount = storage::investment(&env, &investor);
            if amount == 0 {
                // Refunded before distribution started; skip.
                cursor += 1;
                continue;
            }

            let tokens = amount / terms.issue_price;

            // The investment is consumed before the mint call leaves the
            // contract.
            storage::set_investment(&env, &investor, 0);
            storage::set_next_investor(&env, cursor + 1);

            let issuer = token::StellarAssetClient::new(&env, &config.issuance_token);
            match issuer.try_mint(&investor, &tokens) {
                Ok(Ok(())) => {}
                _ => return Err(Error::TransferFailed),
            }

            events::emit_tokens_distributed(&env, investor, tokens);
            return Ok(cursor + 1 < queue.len());
        }

        Err(Error::NoMoreInvestors)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Label the lifecycle machine currently rests on.
    pub fn current_state(env: Env) -> Result<Symbol, Error> {
        let machine = storage::load_machine(&env).ok_or(Error::NotInitialized)?;
        Ok(machine.current_state())
    }

    /// Whether `state` is registered in the lifecycle graph.
    pub fn state_exists(env: Env, state: Symbol) -> Result<bool, Error> {
        let machine = storage::load_machine(&env).ok_or(Error::NotInitialized)?;
        Ok(machine.state_exists(&state))
    }

    /// Total accepted-token units currently raised.
    pub fn amount_raised(env: Env) -> i128 {
        storage::amount_raised(&env)
    }

    /// Outstanding investment of `investor`.
    pub fn investment(env: Env, investor: Address) -> i128 {
        storage::investment(&env, &investor)
    }

    pub fn get_terms(env: Env) -> Result<Terms, Error> {
        storage::load_terms(&env).ok_or(Error::NotInitialized)
    }

    pub fn get_config(env: Env) -> Result<IssuanceConfig, Error> {
        storage::load_config(&env).ok_or(Error::NotInitialized)
    }

    // ─────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────

    /// Authenticate `caller` and check the `ADMIN` role with the registry.
    fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
        caller.require_auth();
        let config = storage::load_config(env).ok_or(Error::NotInitialized)?;
        access::require_role(env, &config.access, caller, &ADMIN_ROLE)
    }

    /// Fail with `InvalidState` unless the machine rests on `state`.
    fn require_state(env: &Env, state: &Symbol) -> Result<(), Error> {
        let machine = storage::load_machine(env).ok_or(Error::NotInitialized)?;
        if machine.current_state() != *state {
            return Err(Error::InvalidState);
        }
        Ok(())
    }

    /// Move the machine with the lifecycle hooks wrapped around the pointer
    /// advance.
    fn apply_transition(env: &Env, target: Symbol) -> Result<(), Error> {
        let mut machine = storage::load_machine(env).ok_or(Error::NotInitialized)?;
        if !machine.can_transition(&target) {
            return Err(Error::InvalidTransition);
        }
        Self::before_exit(env, &machine.current_state())?;
        machine.transition(target.clone()).map_err(map_machine_err)?;
        storage::save_machine(env, &machine);
        Self::after_entry(env, &target)?;
        Ok(())
    }

    /// Leaving `SETUP` requires complete terms.
    fn before_exit(env: &Env, state: &Symbol) -> Result<(), Error> {
        if *state == SETUP_STATE {
            let terms = storage::load_terms(env).ok_or(Error::NotInitialized)?;
            if terms.issue_price <= 0 {
                return Err(Error::TermsNotSet);
            }
        }
        Ok(())
    }

    /// Entering `LIVE` opens distribution from the head of the queue.
    fn after_entry(env: &Env, state: &Symbol) -> Result<(), Error> {
        if *state == LIVE_STATE {
            storage::set_next_investor(env, 0);
        }
        Ok(())
    }
}
