//! Field accessors naming where a child module lives in its parent's state.

/// A pair of accessors for one field of `S` holding a `C`.
///
/// Usually built with the [`lens!`](crate::lens) macro.
pub struct Lens<S, C> {
    get: fn(&S) -> &C,
    get_mut: fn(&mut S) -> &mut C,
}

impl<S, C> Lens<S, C> {
    pub fn new(get: fn(&S) -> &C, get_mut: fn(&mut S) -> &mut C) -> Self {
        Self { get, get_mut }
    }

    pub fn get<'a>(&self, state: &'a S) -> &'a C {
        (self.get)(state)
    }

    pub fn get_mut<'a>(&self, state: &'a mut S) -> &'a mut C {
        (self.get_mut)(state)
    }

    /// Replace the field in `state`.
    pub fn set(&self, state: &mut S, value: C) {
        *(self.get_mut)(state) = value;
    }
}

impl<S, C> Clone for Lens<S, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, C> Copy for Lens<S, C> {}

/// Build a [`Lens`] for a named field.
///
/// ```ignore
/// let lens = lens!(AuthState, metadata);
/// ```
#[macro_export]
macro_rules! lens {
    ($state:ty, $field:ident) => {
        $crate::compose::Lens::new(
            |state: &$state| &state.$field,
            |state: &mut $state| &mut state.$field,
        )
    };
}
