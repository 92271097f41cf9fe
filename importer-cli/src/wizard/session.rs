//! Session runner for the import wizard
//!
//! Owns the state and the backend handle, and drives the message loop:
//! each dispatched message is applied via `update`, and any returned
//! command is awaited with its result fed back in, until the state
//! settles.

use std::sync::Arc;

use crate::backend::ImportBackend;

use super::app::update;
use super::command::Command;
use super::msg::Msg;
use super::state::State;

/// A running wizard: state plus the backend it talks to.
pub struct WizardSession {
    state: State,
    backend: Arc<dyn ImportBackend>,
}

impl WizardSession {
    pub fn new(backend: Arc<dyn ImportBackend>) -> Self {
        Self {
            state: State::default(),
            backend,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Apply a message and run any resulting backend calls to completion.
    pub async fn dispatch(&mut self, msg: Msg) {
        let mut cmd = update(&mut self.state, msg, &self.backend);
        while let Command::Perform(fut) = cmd {
            let msg = fut.await;
            cmd = update(&mut self.state, msg, &self.backend);
        }
    }
}
