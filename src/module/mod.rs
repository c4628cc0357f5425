//! Module descriptors: the building blocks of a store.
//!
//! A module owns a slice of state, the action kinds its own transitions
//! recognise, and the payload type of each kind.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ ComposedUnit::transition ──→ State ──→ Selector
//!    ↑                                                  │
//!    └────────────── Effect (dispatch, state) ──────────┘
//! ```
//!
//! - **State**: immutable snapshot of one module's slice
//! - **Action**: record naming a transition and carrying its payload
//! - **Module**: compile-time descriptor tying the two together

mod action;
mod state;

pub use action::{Action, ActionKind, Payload};
pub use state::ModuleState;

/// Compile-time descriptor of a module.
///
/// Implemented by unit structs; there is never a value of the implementing
/// type at runtime. The payload type of each action kind is carried by the
/// [`ActionKind`] constants the module exports.
pub trait Module: 'static {
    /// Shape of the module's local state.
    type State: ModuleState;

    /// Short name used in log fields.
    const NAME: &'static str;

    /// Action kinds this module's own transitions recognise.
    ///
    /// Kinds handled by nested child modules are not listed here.
    const ACTIONS: &'static [&'static str];
}
