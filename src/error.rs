//! Error types for module composition, dispatch and interface lookups.

use thiserror::Error;

/// Child-module keys that would collide with the sections of an interface node.
pub const RESERVED_MODULE_KEYS: [&str; 3] = ["actions", "thunks", "selectors"];

/// Selector name that every interface node defines on its own.
pub const ROOT_SELECTOR: &str = "root";

/// Errors raised while composing transitions or building an interface tree.
///
/// These are programmer errors: they surface at startup, before any store
/// exists, so a malformed module tree never reaches `dispatch`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    /// A module declared a selector named `root`.
    #[error("Selectors cannot be named 'root'")]
    ReservedSelectorName,

    /// A child module was keyed with one of [`RESERVED_MODULE_KEYS`].
    #[error("Modules cannot be named 'actions' or 'thunks' or 'selectors' (found '{key}')")]
    ReservedModuleKey { key: String },

    /// Two children of the same module share a key.
    #[error("Module key '{key}' is declared more than once")]
    DuplicateModuleKey { key: String },

    /// A module registered two handlers for one action kind.
    #[error("Action '{kind}' already has a handler in module '{module}'")]
    DuplicateHandler { module: String, kind: String },

    /// Two entries of one interface section share a name.
    #[error("'{name}' is declared more than once in {section}")]
    DuplicateName { section: &'static str, name: String },
}

/// Errors raised by a dispatched action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The matched handler expects a payload the action does not carry.
    #[error("Action '{kind}' does not carry a payload of type {expected}")]
    PayloadMismatch {
        kind: &'static str,
        expected: &'static str,
    },
}

/// Errors raised when reading entries out of a completed interface tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No child module exists under this key.
    #[error("Module '{path}' has no child module '{key}'")]
    MissingModule { path: String, key: String },

    /// The section has no entry with this name.
    #[error("Module '{path}' has no {section} entry '{name}'")]
    MissingEntry {
        path: String,
        section: &'static str,
        name: String,
    },

    /// The entry exists but was requested with a different signature.
    #[error("'{name}' in {section} of module '{path}' is {found}, not {expected}")]
    TypeMismatch {
        path: String,
        section: &'static str,
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Returns an error when `key` is reserved for interface sections.
pub(crate) fn check_module_key(key: &str) -> Result<(), CompositionError> {
    if RESERVED_MODULE_KEYS.contains(&key) {
        return Err(CompositionError::ReservedModuleKey {
            key: key.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_keys_are_rejected() {
        for key in RESERVED_MODULE_KEYS {
            assert_eq!(
                check_module_key(key),
                Err(CompositionError::ReservedModuleKey {
                    key: key.to_string()
                })
            );
        }
    }

    #[test]
    fn ordinary_keys_pass() {
        assert!(check_module_key("auth").is_ok());
        assert!(check_module_key("action").is_ok());
    }

    #[test]
    fn messages_name_the_offender() {
        let err = CompositionError::ReservedModuleKey {
            key: "thunks".to_string(),
        };
        assert!(err.to_string().contains("'thunks'"));
        assert_eq!(
            CompositionError::ReservedSelectorName.to_string(),
            "Selectors cannot be named 'root'"
        );
    }
}
