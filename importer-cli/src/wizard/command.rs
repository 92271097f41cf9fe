//! Side effects returned from `update`
//!
//! The state machine never performs I/O itself; it returns a [`Command`]
//! describing the async work to run, and the session runner awaits it and
//! feeds the resulting message back into `update`.

use std::future::Future;

use futures::future::BoxFuture;

/// A side effect to execute after a state update.
pub enum Command<M> {
    /// No side effect
    None,
    /// Run an async task and feed its result back as a message
    Perform(BoxFuture<'static, M>),
}

impl<M: 'static> Command<M> {
    /// Run an async task, converting its output into a message.
    pub fn perform<T, Fut, F>(future: Fut, to_msg: F) -> Self
    where
        T: Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        F: FnOnce(T) -> M + Send + 'static,
    {
        Command::Perform(Box::pin(async move { to_msg(future.await) }))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }
}

impl<M> std::fmt::Debug for Command<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Perform(_) => write!(f, "Perform(..)"),
        }
    }
}
