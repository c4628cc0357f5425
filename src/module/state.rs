//! Marker trait for module state.

/// Marker trait for the local state of a module.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Shareable across tasks (snapshots are handed out as `Arc`)
/// - Self-contained (child module slices are plain fields)
pub trait ModuleState: Clone + Send + Sync + 'static {}
