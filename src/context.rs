use crate::key::Key;
use crate::state::{self, Defaults, State};
use crate::storable::Storable;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

pub(crate) type Shared<S> = Rc<RefCell<State<S>>>;

pub(crate) fn shared<S: 'static>(defaults: Defaults<S>) -> Shared<S> {
    Rc::new(RefCell::new(State::new(defaults)))
}

// The borrow ends before the entry is resolved, so a thunk may read
// other keys of the same context.
pub(crate) fn read<K>(shared: &RefCell<State<K::Space>>) -> Option<K::Value>
where
    K: Key,
{
    let entry = shared.borrow().entry(K::NAME);
    state::resolve::<K>(entry)
}

/// A typed key-value context with per-key defaults.
///
/// Clones are handles onto the same state. `get` returns the stored literal,
/// or invokes the stored thunk, or `None` when the key has no entry.
pub struct Context<S: 'static> {
    pub(crate) shared: Shared<S>,
}

impl<S: 'static> Context<S> {
    pub fn new() -> Self {
        Self::with_defaults(Defaults::new())
    }

    pub fn with_defaults(defaults: Defaults<S>) -> Self {
        Self {
            shared: shared(defaults),
        }
    }

    pub fn get<K: Key<Space = S>>(&self) -> Option<K::Value> {
        read::<K>(&self.shared)
    }

    /// Replaces the entry for `K`. Plain values become literals; pass a
    /// `Storable` to store a thunk or to unset.
    pub fn set<K: Key<Space = S>>(&self, value: impl Into<Storable<K::Value>>) {
        self.shared.borrow_mut().insert::<K>(value.into());
    }

    pub fn set_thunk<K: Key<Space = S>>(&self, f: impl Fn() -> K::Value + 'static) {
        self.set::<K>(Storable::thunk(f));
    }

    /// Stores an explicit unset, hiding any default for `K`.
    pub fn unset<K: Key<Space = S>>(&self) {
        self.set::<K>(Storable::Unset);
    }

    /// Whether `K` has an entry, including an explicit unset.
    pub fn contains<K: Key<Space = S>>(&self) -> bool {
        self.shared.borrow().contains(K::NAME)
    }

    /// Drops every override and restores the defaults captured at
    /// construction.
    pub fn reset(&self) {
        self.shared.borrow_mut().reset();
    }

    /// A handle for thunks that read this context without keeping it alive.
    pub fn downgrade(&self) -> WeakContext<S> {
        WeakContext::from_shared(&self.shared)
    }

    /// Whether both handles point at the same state.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<S: 'static> Default for Context<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> Clone for Context<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<S: 'static> fmt::Debug for Context<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("keys", &self.shared.borrow().keys())
            .finish()
    }
}

/// A non-owning handle onto a context's state.
///
/// A thunk that captures a strong handle to its own context keeps that
/// context alive forever; capture one of these instead.
pub struct WeakContext<S: 'static> {
    shared: Weak<RefCell<State<S>>>,
}

impl<S: 'static> WeakContext<S> {
    pub(crate) fn from_shared(shared: &Shared<S>) -> Self {
        Self {
            shared: Rc::downgrade(shared),
        }
    }

    /// Reads `K`, or `None` once the context is gone.
    pub fn get<K: Key<Space = S>>(&self) -> Option<K::Value> {
        let shared = self.shared.upgrade()?;
        read::<K>(&shared)
    }

    pub fn upgrade(&self) -> Option<Context<S>> {
        self.shared.upgrade().map(|shared| Context { shared })
    }

    pub fn is_alive(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl<S: 'static> Clone for WeakContext<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<S: 'static> fmt::Debug for WeakContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakContext")
            .field("alive", &self.is_alive())
            .finish()
    }
}
