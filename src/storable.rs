use std::fmt;
use std::rc::Rc;

/// A shared zero-argument computation producing a `T` on every call.
pub type Thunk<T> = Rc<dyn Fn() -> T>;

/// What a context slot holds: nothing, an immediate value, or a deferred
/// computation.
///
/// The variants are explicit so a value whose type is itself a closure is
/// never mistaken for a thunk: store it as `Storable::Literal(f)` and it is
/// handed back as-is, store it as `Storable::Thunk` and it is invoked on read.
pub enum Storable<T> {
    /// Explicitly unset. The slot exists but resolves to `None`.
    Unset,
    Literal(T),
    Thunk(Thunk<T>),
}

impl<T> Storable<T> {
    pub fn thunk<F>(f: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Storable::Thunk(Rc::new(f))
    }

    /// `None` becomes `Unset`, `Some(v)` a literal.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Storable::Literal(v),
            None => Storable::Unset,
        }
    }

    pub fn is_thunk(&self) -> bool {
        matches!(self, Storable::Thunk(_))
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Storable::Unset)
    }

    /// Resolves the slot. Literals are cloned, thunks are invoked fresh on
    /// each call with no memoization.
    pub fn resolve(&self) -> Option<T>
    where
        T: Clone,
    {
        match self {
            Storable::Unset => None,
            Storable::Literal(v) => Some(v.clone()),
            Storable::Thunk(f) => Some(f()),
        }
    }
}

impl<T> From<T> for Storable<T> {
    fn from(value: T) -> Self {
        Storable::Literal(value)
    }
}

impl<T: Clone> Clone for Storable<T> {
    fn clone(&self) -> Self {
        match self {
            Storable::Unset => Storable::Unset,
            Storable::Literal(v) => Storable::Literal(v.clone()),
            Storable::Thunk(f) => Storable::Thunk(Rc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Storable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Storable::Unset => f.write_str("Unset"),
            Storable::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Storable::Thunk(_) => f.write_str("Thunk(..)"),
        }
    }
}
