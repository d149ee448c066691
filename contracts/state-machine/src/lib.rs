//! # State Machine
//!
//! A directed graph of named states with guarded transitions and a single
//! current-state pointer, packaged as a [`contracttype`] value so host
//! contracts can store a whole machine in one ledger entry.
//!
//! ## Model
//!
//! - States are identified by [`Symbol`] labels. The reserved [`SETUP_STATE`]
//!   label always exists and is the initial current state.
//! - States and transitions are monotonically added, never removed — the
//!   graph only grows.
//! - A state may transition to itself if that edge was added explicitly;
//!   no self-transition check is imposed here.
//!
//! ## Composition seam
//!
//! The machine validates graph structure only. Authorization (who may drive a
//! transition) and entry/exit side effects belong to the host contract, which
//! wraps [`StateMachine::transition`] in its own entry point:
//!
//! ```text
//! authorize caller ─► before-exit effects ─► machine.transition ─► after-entry effects
//! ```
//!
//! A failure anywhere aborts the host call and the ledger rolls the whole
//! invocation back, so hook effects and the pointer advance stay atomic.

#![no_std]

use soroban_sdk::{contracttype, symbol_short, Env, Symbol, Vec};

#[cfg(test)]
mod test;

/// Reserved label of the implicit initial state.
pub const SETUP_STATE: Symbol = symbol_short!("SETUP");

/// Graph-structure failures. Host contracts map these into their own
/// contract-error enums.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// `create_state` with a label that is already registered.
    AlreadyExists,
    /// `create_transition` naming an unregistered endpoint.
    UnknownState,
    /// `transition` to a target with no edge from the current state.
    InvalidTransition,
}

/// A directed edge of the transition graph.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Edge {
    pub origin: Symbol,
    pub target: Symbol,
}

/// The state graph plus the current-state pointer.
///
/// State sets for lifecycle contracts are small (a handful of labels), so
/// membership checks scan the vectors directly.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateMachine {
    current: Symbol,
    states: Vec<Symbol>,
    edges: Vec<Edge>,
}

impl StateMachine {
    /// A machine containing only [`SETUP_STATE`], which is also the current
    /// state.
    pub fn new(env: &Env) -> Self {
        let mut states = Vec::new(env);
        states.push_back(SETUP_STATE);
        StateMachine {
            current: SETUP_STATE,
            states,
            edges: Vec::new(env),
        }
    }

    /// Label the pointer currently rests on.
    pub fn current_state(&self) -> Symbol {
        self.current.clone()
    }

    /// Whether `state` is registered in the graph.
    pub fn state_exists(&self, state: &Symbol) -> bool {
        self.states.contains(state)
    }

    /// Register a new state with no outgoing edges.
    pub fn create_state(&mut self, state: Symbol) -> Result<(), Error> {
        if self.state_exists(&state) {
            return Err(Error::AlreadyExists);
        }
        self.states.push_back(state);
        Ok(())
    }

    /// Add the directed edge `origin -> target`. Re-adding an existing edge
    /// is a no-op.
    pub fn create_transition(&mut self, origin: Symbol, target: Symbol) -> Result<(), Error> {
        if !self.state_exists(&origin) || !self.state_exists(&target) {
            return Err(Error::UnknownState);
        }
        let edge = Edge { origin, target };
        if !self.edges.contains(&edge) {
            self.edges.push_back(edge);
        }
        Ok(())
    }

    /// Whether an edge exists from the current state to `target`.
    pub fn can_transition(&self, target: &Symbol) -> bool {
        self.edges.contains(&Edge {
            origin: self.current.clone(),
            target: target.clone(),
        })
    }

    /// Advance the pointer along an existing edge.
    pub fn transition(&mut self, target: Symbol) -> Result<(), Error> {
        if !self.can_transition(&target) {
            return Err(Error::InvalidTransition);
        }
        self.current = target;
        Ok(())
    }
}
