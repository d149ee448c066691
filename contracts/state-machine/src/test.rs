extern crate std;

use soroban_sdk::{symbol_short, Env};

use crate::{Error, StateMachine, SETUP_STATE};

#[test]
fn new_machine_starts_in_setup() {
    let env = Env::default();
    let machine = StateMachine::new(&env);

    assert_eq!(machine.current_state(), SETUP_STATE);
    assert!(machine.state_exists(&SETUP_STATE));
    assert!(!machine.state_exists(&symbol_short!("OPEN")));
}

#[test]
fn create_state_rejects_duplicates() {
    let env = Env::default();
    let mut machine = StateMachine::new(&env);

    machine.create_state(symbol_short!("OPEN")).unwrap();
    assert!(machine.state_exists(&symbol_short!("OPEN")));

    assert_eq!(
        machine.create_state(symbol_short!("OPEN")),
        Err(Error::AlreadyExists)
    );
    // The reserved initial state counts as registered too.
    assert_eq!(machine.create_state(SETUP_STATE), Err(Error::AlreadyExists));
}

#[test]
fn create_transition_requires_registered_endpoints() {
    let env = Env::default();
    let mut machine = StateMachine::new(&env);
    machine.create_state(symbol_short!("OPEN")).unwrap();

    assert_eq!(
        machine.create_transition(symbol_short!("LIVE"), symbol_short!("OPEN")),
        Err(Error::UnknownState)
    );
    assert_eq!(
        machine.create_transition(SETUP_STATE, symbol_short!("LIVE")),
        Err(Error::UnknownState)
    );
    machine
        .create_transition(SETUP_STATE, symbol_short!("OPEN"))
        .unwrap();
}

#[test]
fn create_transition_is_idempotent() {
    let env = Env::default();
    let mut machine = StateMachine::new(&env);
    machine.create_state(symbol_short!("OPEN")).unwrap();

    machine
        .create_transition(SETUP_STATE, symbol_short!("OPEN"))
        .unwrap();
    // Re-adding the same edge is a no-op, not an error.
    machine
        .create_transition(SETUP_STATE, symbol_short!("OPEN"))
        .unwrap();

    machine.transition(symbol_short!("OPEN")).unwrap();
    assert_eq!(machine.current_state(), symbol_short!("OPEN"));
}

#[test]
fn transition_requires_an_edge_from_current() {
    let env = Env::default();
    let mut machine = StateMachine::new(&env);
    machine.create_state(symbol_short!("OPEN")).unwrap();
    machine.create_state(symbol_short!("LIVE")).unwrap();
    machine
        .create_transition(symbol_short!("OPEN"), symbol_short!("LIVE"))
        .unwrap();

    // Edge exists, but not from the current state.
    assert!(!machine.can_transition(&symbol_short!("LIVE")));
    assert_eq!(
        machine.transition(symbol_short!("LIVE")),
        Err(Error::InvalidTransition)
    );
    assert_eq!(machine.current_state(), SETUP_STATE);
}

#[test]
fn transition_advances_the_pointer_exactly_once() {
    let env = Env::default();
    let mut machine = StateMachine::new(&env);
    machine.create_state(symbol_short!("OPEN")).unwrap();
    machine
        .create_transition(SETUP_STATE, symbol_short!("OPEN"))
        .unwrap();

    assert!(machine.can_transition(&symbol_short!("OPEN")));
    machine.transition(symbol_short!("OPEN")).unwrap();
    assert_eq!(machine.current_state(), symbol_short!("OPEN"));

    // The edge points out of SETUP, not out of OPEN: no second hop.
    assert_eq!(
        machine.transition(symbol_short!("OPEN")),
        Err(Error::InvalidTransition)
    );
}

#[test]
fn self_transition_allowed_when_explicitly_added() {
    let env = Env::default();
    let mut machine = StateMachine::new(&env);
    machine.create_state(symbol_short!("OPEN")).unwrap();
    machine
        .create_transition(SETUP_STATE, symbol_short!("OPEN"))
        .unwrap();
    machine
        .create_transition(symbol_short!("OPEN"), symbol_short!("OPEN"))
        .unwrap();

    machine.transition(symbol_short!("OPEN")).unwrap();
    machine.transition(symbol_short!("OPEN")).unwrap();
    assert_eq!(machine.current_state(), symbol_short!("OPEN"));
}
