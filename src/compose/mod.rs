//! Transition composer.
//!
//! Merges a module's own handlers with the composed units of its child
//! modules into one transition function, leaf first:
//!
//! ```text
//! compose::<Metadata>(..).build() ──┐
//!                                   ├─→ compose::<Auth>(..).child("metadata", ..).build() ──┐
//!                                   │                                                      ├─→ root
//! compose::<Todos>(..).build() ─────┴──────────────────────────────────────────────────────┘
//! ```
//!
//! Routing for one action: the module's own handler wins; otherwise the
//! first child (in registration order) whose action set contains the kind
//! receives it; otherwise the state is left untouched.

mod lens;

pub use lens::Lens;

use std::any::Any;
use std::collections::BTreeSet;
use std::marker::PhantomData;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::error::{check_module_key, CompositionError, DispatchError};
use crate::module::{Action, ActionKind, Module, ModuleState};

/// Transition that reports `None` when the state is unchanged.
type TransitionFn<S> = dyn Fn(&S, &Action) -> Result<Option<S>, DispatchError> + Send + Sync;

type Handler<S> = Box<dyn Fn(&S, &Action) -> Result<S, DispatchError> + Send + Sync>;

/// The merged transition, initial state and action set of one module and
/// all of its descendants.
pub struct ComposedUnit<S> {
    initial_state: S,
    actions: BTreeSet<&'static str>,
    transition: Arc<TransitionFn<S>>,
}

impl<S: ModuleState> ComposedUnit<S> {
    /// Initial state with every child slice filled in from the child units.
    pub fn initial_state(&self) -> &S {
        &self.initial_state
    }

    /// Every kind this unit routes: its own plus all descendants'.
    ///
    /// Used for routing only; dispatching any other kind is a no-op.
    pub fn actions(&self) -> &BTreeSet<&'static str> {
        &self.actions
    }

    pub fn handles(&self, kind: &str) -> bool {
        self.actions.contains(kind)
    }

    /// Apply `action` to `state`, returning `None` when nothing handled it.
    pub fn reduce(&self, state: &S, action: &Action) -> Result<Option<S>, DispatchError> {
        (self.transition)(state, action)
    }

    /// Apply `action` to a shared snapshot.
    ///
    /// Returns the same `Arc` when the action is not handled anywhere.
    pub fn transition(&self, state: &Arc<S>, action: &Action) -> Result<Arc<S>, DispatchError> {
        Ok(match self.reduce(state, action)? {
            Some(next) => Arc::new(next),
            None => Arc::clone(state),
        })
    }
}

impl<S: Clone> Clone for ComposedUnit<S> {
    fn clone(&self) -> Self {
        Self {
            initial_state: self.initial_state.clone(),
            actions: self.actions.clone(),
            transition: Arc::clone(&self.transition),
        }
    }
}

struct ChildRoute<S> {
    key: &'static str,
    actions: BTreeSet<&'static str>,
    transition: Box<TransitionFn<S>>,
}

/// Start composing module `M` from a seed state.
///
/// Fields that hold child modules are overwritten with the child units'
/// initial states as children are registered.
pub fn compose<M: Module>(seed: M::State) -> Composer<M> {
    Composer {
        initial_state: seed,
        handlers: IndexMap::new(),
        children: Vec::new(),
        error: None,
        _module: PhantomData,
    }
}

/// Builder for a [`ComposedUnit`].
///
/// Construction errors are collected and reported by [`Composer::build`].
pub struct Composer<M: Module> {
    initial_state: M::State,
    handlers: IndexMap<&'static str, Handler<M::State>>,
    children: Vec<ChildRoute<M::State>>,
    error: Option<CompositionError>,
    _module: PhantomData<M>,
}

impl<M: Module> Composer<M> {
    /// Register the module's own handler for `kind`.
    ///
    /// Own handlers shadow any child handling the same kind.
    pub fn on<P, F>(mut self, kind: ActionKind<P>, handler: F) -> Self
    where
        P: Any + Send + Sync,
        F: Fn(&M::State, &P) -> M::State + Send + Sync + 'static,
    {
        if self.handlers.contains_key(kind.kind()) {
            self.fail(CompositionError::DuplicateHandler {
                module: M::NAME.to_string(),
                kind: kind.kind().to_string(),
            });
            return self;
        }
        self.handlers.insert(
            kind.kind(),
            Box::new(
                move |state: &M::State, action: &Action| -> Result<M::State, DispatchError> {
                    Ok(handler(state, kind.decode(action)?))
                },
            ),
        );
        self
    }

    /// Embed a child module under `key`.
    ///
    /// Registration order is routing order among children.
    pub fn child<C: ModuleState>(
        mut self,
        key: &'static str,
        unit: ComposedUnit<C>,
        lens: Lens<M::State, C>,
    ) -> Self {
        if let Err(err) = check_module_key(key) {
            self.fail(err);
            return self;
        }
        if self.children.iter().any(|child| child.key == key) {
            self.fail(CompositionError::DuplicateModuleKey {
                key: key.to_string(),
            });
            return self;
        }

        let ComposedUnit {
            initial_state,
            actions,
            transition,
        } = unit;
        lens.set(&mut self.initial_state, initial_state);

        let route = move |state: &M::State,
                          action: &Action|
              -> Result<Option<M::State>, DispatchError> {
            let Some(slice) = transition(lens.get(state), action)? else {
                return Ok(None);
            };
            let mut next = state.clone();
            lens.set(&mut next, slice);
            Ok(Some(next))
        };
        self.children.push(ChildRoute {
            key,
            actions,
            transition: Box::new(route),
        });
        self
    }

    pub fn build(self) -> Result<ComposedUnit<M::State>, CompositionError> {
        let Composer {
            initial_state,
            handlers,
            children,
            error,
            ..
        } = self;
        if let Some(err) = error {
            return Err(err);
        }

        for kind in handlers.keys().filter(|kind| !M::ACTIONS.contains(*kind)) {
            warn!(
                module = M::NAME,
                kind = *kind,
                "handler registered for an action kind the module does not declare"
            );
        }

        let mut actions: BTreeSet<&'static str> = handlers.keys().copied().collect();
        for child in &children {
            actions.extend(child.actions.iter().copied());
        }
        debug!(
            module = M::NAME,
            children = children.len(),
            actions = actions.len(),
            "composed module transitions"
        );

        let transition = move |state: &M::State,
                               action: &Action|
              -> Result<Option<M::State>, DispatchError> {
            if let Some(handler) = handlers.get(action.kind()) {
                trace!(module = M::NAME, kind = action.kind(), "applying own handler");
                return handler(state, action).map(Some);
            }
            match children
                .iter()
                .find(|child| child.actions.contains(action.kind()))
            {
                Some(child) => {
                    trace!(
                        module = M::NAME,
                        child = child.key,
                        kind = action.kind(),
                        "routing action to child module"
                    );
                    (child.transition)(state, action)
                }
                None => Ok(None),
            }
        };

        Ok(ComposedUnit {
            initial_state,
            actions,
            transition: Arc::new(transition),
        })
    }

    fn fail(&mut self, err: CompositionError) {
        self.error.get_or_insert(err);
    }
}
