//! Middleware chain for plain actions.
//!
//! Effects never reach middleware: the store runs them directly, and only
//! the actions they dispatch travel through the chain.

use std::sync::Arc;

use super::Store;
use crate::error::DispatchError;
use crate::module::{Action, ModuleState};

/// A link in the dispatch chain.
///
/// Implementations may inspect, rewrite, swallow or forward the action. To
/// forward it, call [`Next::run`]; to dispatch something else from the top
/// of the chain, call [`Store::dispatch`].
pub trait Middleware<S, C>: Send + Sync {
    fn handle(&self, store: &Store<S, C>, action: Action, next: Next<'_, S, C>)
        -> Result<(), DispatchError>;
}

/// The remainder of the chain after the current middleware.
pub struct Next<'a, S, C> {
    store: &'a Store<S, C>,
    remaining: &'a [Arc<dyn Middleware<S, C>>],
}

impl<'a, S, C> Next<'a, S, C>
where
    S: ModuleState,
    C: Send + Sync + 'static,
{
    pub(crate) fn new(store: &'a Store<S, C>, chain: &'a [Arc<dyn Middleware<S, C>>]) -> Self {
        Self {
            store,
            remaining: chain,
        }
    }

    /// Pass `action` to the next middleware, or commit it when none is left.
    pub fn run(self, action: Action) -> Result<(), DispatchError> {
        match self.remaining.split_first() {
            Some((middleware, rest)) => middleware.handle(
                self.store,
                action,
                Next {
                    store: self.store,
                    remaining: rest,
                },
            ),
            None => self.store.commit(&action),
        }
    }
}

/// Logs every action passing through the chain.
///
/// Emits one `debug` event per action naming its kind and whether the
/// snapshot changed.
#[derive(Debug, Default, Clone, Copy)]
pub struct ActionLogger;

impl<S, C> Middleware<S, C> for ActionLogger
where
    S: ModuleState,
    C: Send + Sync + 'static,
{
    fn handle(
        &self,
        store: &Store<S, C>,
        action: Action,
        next: Next<'_, S, C>,
    ) -> Result<(), DispatchError> {
        let kind = action.kind();
        let before = store.state();
        let result = next.run(action);
        match &result {
            Ok(()) => {
                let changed = !Arc::ptr_eq(&before, &store.state());
                tracing::debug!(kind, changed, "dispatched action");
            }
            Err(e) => tracing::warn!(kind, error = %e, "action rejected"),
        }
        result
    }
}
