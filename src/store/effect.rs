//! Side-effect procedures and the dispatch variant that carries them.

use std::future::Future;

use futures_core::future::BoxFuture;

use super::Store;
use crate::module::Action;

/// A deferred unit of work run against a store.
///
/// The procedure receives a [`Store`] handle, through which it can read
/// state, dispatch actions and reach the injected context. Its output is
/// returned to whoever dispatched it.
pub struct Effect<S, C, R> {
    procedure: Box<dyn FnOnce(Store<S, C>) -> BoxFuture<'static, R> + Send>,
}

impl<S, C, R> Effect<S, C, R>
where
    S: 'static,
    C: 'static,
    R: 'static,
{
    pub fn new<F, Fut>(procedure: F) -> Self
    where
        F: FnOnce(Store<S, C>) -> Fut + Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        Self {
            procedure: Box::new(move |store: Store<S, C>| -> BoxFuture<'static, R> {
                Box::pin(procedure(store))
            }),
        }
    }

    pub(crate) fn start(self, store: Store<S, C>) -> BoxFuture<'static, R> {
        (self.procedure)(store)
    }
}

/// Anything a store accepts: a plain action or a side-effect procedure.
pub enum Dispatch<S, C, R> {
    Action(Action),
    Effect(Effect<S, C, R>),
}

impl<S, C, R> From<Action> for Dispatch<S, C, R> {
    fn from(action: Action) -> Self {
        Dispatch::Action(action)
    }
}

impl<S, C, R> From<Effect<S, C, R>> for Dispatch<S, C, R> {
    fn from(effect: Effect<S, C, R>) -> Self {
        Dispatch::Effect(effect)
    }
}

/// Result of [`Store::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<R> {
    /// A plain action went through the middleware chain and the transition.
    Applied,
    /// An effect ran to completion with this output.
    Resolved(R),
}

impl<R> Outcome<R> {
    /// The effect's output, if this outcome came from an effect.
    pub fn into_resolved(self) -> Option<R> {
        match self {
            Outcome::Applied => None,
            Outcome::Resolved(value) => Some(value),
        }
    }
}
