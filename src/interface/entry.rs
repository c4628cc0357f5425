//! Type-erased interface entries.

use std::any::{type_name, Any};
use std::sync::Arc;

/// One action creator, selector or thunk, stored behind `Any`.
#[derive(Clone)]
pub(crate) struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Entry {
    pub(crate) fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    pub(crate) fn downcast<T: Any + Clone>(&self) -> Option<T> {
        (*self.value).downcast_ref::<T>().cloned()
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }
}
