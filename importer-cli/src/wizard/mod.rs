//! CSV import wizard core
//!
//! Elm-style state machine for the linear import flow: source selection →
//! validation preview → column mapping → configure → results. The core owns
//! the step cursor and all collected state, and talks to the outside world
//! only through the [`crate::backend::ImportBackend`] capability via
//! [`Command`] values returned from [`app::update`].

pub mod app;
pub mod command;
pub mod msg;
pub mod session;
pub mod state;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use app::update;
pub use command::Command;
pub use msg::Msg;
pub use session::WizardSession;
pub use state::State;
pub use types::WizardStep;
