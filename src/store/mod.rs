//! The dispatch container.
//!
//! A [`Store`] holds the current snapshot of the whole state tree and
//! replaces it wholesale on every successful dispatch. Plain actions run
//! through the middleware chain and the root transition synchronously;
//! effects are run directly and may dispatch further actions while they
//! await other work.

mod effect;
mod middleware;

pub use effect::{Dispatch, Effect, Outcome};
pub use middleware::{ActionLogger, Middleware, Next};

use std::sync::Arc;

use futures_core::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::trace;

use crate::compose::ComposedUnit;
use crate::error::DispatchError;
use crate::interface::Selector;
use crate::module::{Action, ModuleState};

/// Cheaply cloneable handle to a running store.
///
/// `C` is the side-effect context handed to effects (an API client, a
/// clock, ...).
pub struct Store<S, C = ()> {
    inner: Arc<StoreInner<S, C>>,
}

struct StoreInner<S, C> {
    root: ComposedUnit<S>,
    snapshot: watch::Sender<Arc<S>>,
    /// Serializes transition + replace so concurrent dispatches never lose updates.
    commit_lock: Mutex<()>,
    context: C,
    middleware: Vec<Arc<dyn Middleware<S, C>>>,
}

impl<S, C> Clone for Store<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Create a store with the root unit's initial state, no context and no
/// extra middleware.
pub fn create_store<S: ModuleState>(root: ComposedUnit<S>) -> Store<S> {
    Store::builder(root).build()
}

impl<S: ModuleState> Store<S> {
    pub fn builder(root: ComposedUnit<S>) -> StoreBuilder<S, ()> {
        StoreBuilder::new(root, ())
    }
}

impl<S, C> Store<S, C>
where
    S: ModuleState,
    C: Send + Sync + 'static,
{
    pub fn builder_with_context(root: ComposedUnit<S>, context: C) -> StoreBuilder<S, C> {
        StoreBuilder::new(root, context)
    }

    /// Latest committed snapshot.
    pub fn state(&self) -> Arc<S> {
        self.inner.snapshot.borrow().clone()
    }

    /// Apply a selector to the latest snapshot.
    pub fn select<R>(&self, selector: &Selector<S, R>) -> R {
        selector(&self.state())
    }

    /// Receiver notified whenever a dispatch commits a new snapshot.
    ///
    /// Actions that leave the state untouched do not wake subscribers.
    pub fn subscribe(&self) -> watch::Receiver<Arc<S>> {
        self.inner.snapshot.subscribe()
    }

    pub fn context(&self) -> &C {
        &self.inner.context
    }

    /// Dispatch a plain action through the middleware chain.
    ///
    /// Runs to completion before returning. On error (or a panic inside a
    /// handler) the previous snapshot stays in place.
    pub fn dispatch(&self, action: Action) -> Result<(), DispatchError> {
        Next::new(self, &self.inner.middleware).run(action)
    }

    /// Run a side-effect procedure and resolve to its output.
    pub fn run<R: 'static>(&self, effect: Effect<S, C, R>) -> BoxFuture<'static, R> {
        effect.start(self.clone())
    }

    /// Dispatch either variant of [`Dispatch`].
    pub async fn send<R: 'static>(
        &self,
        item: Dispatch<S, C, R>,
    ) -> Result<Outcome<R>, DispatchError> {
        match item {
            Dispatch::Action(action) => {
                self.dispatch(action)?;
                Ok(Outcome::Applied)
            }
            Dispatch::Effect(effect) => Ok(Outcome::Resolved(self.run(effect).await)),
        }
    }

    pub(crate) fn commit(&self, action: &Action) -> Result<(), DispatchError> {
        let _guard = self.inner.commit_lock.lock();
        let current = self.state();
        let next = self.inner.root.transition(&current, action)?;
        if Arc::ptr_eq(&current, &next) {
            trace!(kind = action.kind(), "no module handled action");
            return Ok(());
        }
        self.inner.snapshot.send_replace(next);
        trace!(kind = action.kind(), "committed snapshot");
        Ok(())
    }
}

/// Builder for a [`Store`].
pub struct StoreBuilder<S, C> {
    root: ComposedUnit<S>,
    initial_state: Option<S>,
    context: C,
    middleware: Vec<Arc<dyn Middleware<S, C>>>,
}

impl<S, C> StoreBuilder<S, C>
where
    S: ModuleState,
    C: Send + Sync + 'static,
{
    fn new(root: ComposedUnit<S>, context: C) -> Self {
        Self {
            root,
            initial_state: None,
            context,
            middleware: Vec::new(),
        }
    }

    /// Start from `state` instead of the root unit's initial state.
    pub fn initial_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Append a middleware; they run in the order added.
    pub fn middleware<W: Middleware<S, C> + 'static>(mut self, middleware: W) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn build(self) -> Store<S, C> {
        let initial = self
            .initial_state
            .unwrap_or_else(|| self.root.initial_state().clone());
        let (snapshot, _) = watch::channel(Arc::new(initial));
        tracing::debug!(
            actions = self.root.actions().len(),
            middleware = self.middleware.len(),
            "store created"
        );
        Store {
            inner: Arc::new(StoreInner {
                root: self.root,
                snapshot,
                commit_lock: Mutex::new(()),
                context: self.context,
                middleware: self.middleware,
            }),
        }
    }
}
