//! Actions and typed action kinds.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::DispatchError;

/// Type-erased payload carried by an [`Action`].
pub type Payload = Arc<dyn Any + Send + Sync>;

/// An immutable record naming an intended state transition.
///
/// Kinds must be unique across the whole store; namespace them by module
/// (e.g. `"auth/log-in"`).
#[derive(Clone)]
pub struct Action {
    kind: &'static str,
    payload: Option<Payload>,
    payload_type: Option<&'static str>,
}

impl Action {
    /// Action without a payload.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            payload: None,
            payload_type: None,
        }
    }

    /// Action carrying `payload`.
    pub fn with_payload<P: Any + Send + Sync>(kind: &'static str, payload: P) -> Self {
        Self {
            kind,
            payload: Some(Arc::new(payload)),
            payload_type: Some(type_name::<P>()),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Borrow the payload as `P`, if present and of that type.
    pub fn payload<P: Any>(&self) -> Option<&P> {
        self.payload.as_deref()?.downcast_ref::<P>()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Action");
        out.field("kind", &self.kind);
        if let Some(payload_type) = self.payload_type {
            out.field("payload", &payload_type);
        }
        out.finish()
    }
}

/// A typed action-kind constant.
///
/// `P` is the payload type of the kind; `ActionKind<()>` declares a kind
/// whose actions carry no payload.
///
/// ```ignore
/// pub const LOG_IN: ActionKind<User> = ActionKind::new("auth/log-in");
/// pub const LOG_OUT: ActionKind<()> = ActionKind::new("auth/log-out");
/// ```
pub struct ActionKind<P> {
    kind: &'static str,
    _payload: PhantomData<fn() -> P>,
}

impl<P> ActionKind<P> {
    pub const fn new(kind: &'static str) -> Self {
        Self {
            kind,
            _payload: PhantomData,
        }
    }

    pub const fn kind(&self) -> &'static str {
        self.kind
    }
}

impl<P> Clone for ActionKind<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for ActionKind<P> {}

impl<P> fmt::Debug for ActionKind<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionKind({}: {})", self.kind, type_name::<P>())
    }
}

impl<P: Any + Send + Sync> ActionKind<P> {
    /// Build an action of this kind.
    ///
    /// Void kinds produce an action without a payload.
    pub fn create(&self, payload: P) -> Action {
        if TypeId::of::<P>() == TypeId::of::<()>() {
            Action::new(self.kind)
        } else {
            Action::with_payload(self.kind, payload)
        }
    }

    /// Borrow the payload of `action` as this kind's payload type.
    ///
    /// A payload-less action decodes as `()` for void kinds.
    pub fn decode<'a>(&self, action: &'a Action) -> Result<&'a P, DispatchError> {
        const UNIT: &() = &();
        let decoded = match action.payload.as_deref() {
            Some(payload) => payload.downcast_ref::<P>(),
            None => (UNIT as &dyn Any).downcast_ref::<P>(),
        };
        decoded.ok_or(DispatchError::PayloadMismatch {
            kind: action.kind,
            expected: type_name::<P>(),
        })
    }
}
