//! Modular state container.
//!
//! Applications are assembled from [`module`]s, each owning a slice of one
//! immutable state tree. [`compose`] merges their transitions into a single
//! root transition, [`store`] holds the current snapshot and runs actions
//! and effects against it, and [`interface`] exposes every module's action
//! creators, selectors and thunks rewritten against the global snapshot.

pub mod compose;
pub mod config;
pub mod demo;
pub mod error;
pub mod interface;
pub mod logging;
pub mod module;
pub mod store;

pub use compose::{compose, ComposedUnit, Composer, Lens};
pub use error::{CompositionError, DispatchError, LookupError};
pub use interface::{complete, InterfaceCreator, InterfaceNode, InterfacePiece};
pub use module::{Action, ActionKind, Module, ModuleState};
pub use store::{create_store, Dispatch, Effect, Middleware, Next, Outcome, Store};
