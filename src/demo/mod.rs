//! Example modules built on the engine: settings at the root,
//! authentication with nested sign-in metadata, and a todo list.
//!
//! ```text
//! RootState
//! ├── settings        (plain field)
//! ├── auth            AuthModule
//! │   └── metadata    MetadataModule
//! └── todos           TodoModule
//! ```

pub mod api;
pub mod auth;
pub mod root;
pub mod todos;

pub use api::{Api, ApiError, FixtureApi, Todo, User};
pub use root::{RootModule, RootState, Settings, Theme};

use std::sync::Arc;

use thiserror::Error;

use crate::error::{CompositionError, DispatchError, LookupError};
use crate::interface::{self, InterfaceNode};
use crate::store::{ActionLogger, Store};

/// Context handed to every demo effect.
#[derive(Clone)]
pub struct DemoContext {
    pub api: Arc<dyn Api>,
}

impl DemoContext {
    pub fn new(api: impl Api + 'static) -> Self {
        Self { api: Arc::new(api) }
    }
}

impl Default for DemoContext {
    fn default() -> Self {
        Self::new(FixtureApi)
    }
}

/// Errors surfaced by demo effects and setup.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Composition error: {0}")]
    Composition(#[from] CompositionError),

    #[error("Interface lookup error: {0}")]
    Lookup(#[from] LookupError),
}

pub type DemoStore = Store<RootState, DemoContext>;
pub type DemoInterface = InterfaceNode<RootState, DemoContext>;

/// Build the demo store and its interface tree.
///
/// With `log_actions` the [`ActionLogger`] middleware is installed.
pub fn init_store(
    context: DemoContext,
    log_actions: bool,
) -> Result<(DemoStore, DemoInterface), CompositionError> {
    let unit = root::transitions()?;
    let interface = interface::complete(root::interface()?)?;

    let mut builder = Store::builder_with_context(unit, context);
    if log_actions {
        builder = builder.middleware(ActionLogger);
    }
    Ok((builder.build(), interface))
}
